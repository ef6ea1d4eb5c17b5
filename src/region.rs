//! # Region Affinity
//! Location/communication fit for a profile pair, resolved through a
//! three-level fallback that must be preserved exactly:
//!
//! 1. merged corridor telemetry between the two regions,
//! 2. geography (identical label, then haversine distance tiers),
//! 3. neutral 0.5 when coordinates are unknown for either region.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};
use tracing::debug;

use crate::profile::clamp01;
use crate::telemetry::{normalize_region, TelemetryIndex};

// Telemetry sub-score shape: 50ms latency -> 1.0, 250ms -> 0.0;
// 0 retries -> 1.0, 3+ -> 0.0. Composite blend below.
const LATENCY_CEIL_MS: f32 = 250.0;
const LATENCY_SPAN_MS: f32 = 200.0;
const RETRY_CEIL: f32 = 3.0;
const W_LATENCY: f32 = 0.5;
const W_RETRY: f32 = 0.2;
const W_RELIABILITY: f32 = 0.3;

// Geographic fallback tiers (km -> score).
const TIER_NEAR_KM: f32 = 800.0;
const TIER_MID_KM: f32 = 2000.0;
const TIER_FAR_KM: f32 = 5000.0;
const TIER_NEAR: f32 = 0.9;
const TIER_MID: f32 = 0.75;
const TIER_FAR: f32 = 0.5;
const TIER_REMOTE: f32 = 0.2;

/// Fallback when neither telemetry nor coordinates are available.
const NEUTRAL: f32 = 0.5;

const EARTH_RADIUS_KM: f32 = 6371.0;

/// Anchor coordinates for a region label (approximate city centroid).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f32,
    pub lon: f32,
}

static DEFAULT_ANCHORS: Lazy<HashMap<String, Coordinates>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for (name, lat, lon) in [
        ("West US", 47.23, -119.85),      // Quincy, WA
        ("East US", 36.68, -78.38),       // Boydton, VA
        ("North Europe", 53.35, -6.26),   // Dublin
        ("West Europe", 52.37, 4.9),      // Amsterdam
        ("EU West", 52.37, 4.9),          // alias
        ("UK South", 51.51, -0.13),       // London
        ("Canada Central", 43.65, -79.38), // Toronto
        ("Brazil South", -23.55, -46.63), // Sao Paulo
        ("Japan East", 35.68, 139.65),    // Tokyo
        ("Australia East", -33.87, 151.21), // Sydney
    ] {
        m.insert(normalize_region(name), Coordinates { lat, lon });
    }
    m
});

/// Region label -> anchor coordinates, keyed by normalized label.
#[derive(Debug, Clone)]
pub struct RegionMap {
    anchors: HashMap<String, Coordinates>,
}

impl RegionMap {
    /// Built-in anchors for the dataset's ten regions.
    pub fn default_seed() -> Self {
        Self {
            anchors: DEFAULT_ANCHORS.clone(),
        }
    }

    /// Empty map: every distance lookup falls through to neutral.
    pub fn empty() -> Self {
        Self {
            anchors: HashMap::new(),
        }
    }

    /// Build from raw-label anchors (keys are normalized here).
    pub fn from_anchors<I, S>(anchors: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinates)>,
        S: AsRef<str>,
    {
        Self {
            anchors: anchors
                .into_iter()
                .map(|(k, v)| (normalize_region(k.as_ref()), v))
                .collect(),
        }
    }

    /// Load anchors from a JSON file shaped `{ "West US": {"lat": .., "lon": ..}, ... }`.
    /// Falls back to `default_seed()` on a missing or malformed file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => match serde_json::from_str::<HashMap<String, Coordinates>>(&s) {
                Ok(raw) => Self::from_anchors(raw),
                Err(_) => Self::default_seed(),
            },
            Err(_) => Self::default_seed(),
        }
    }

    /// Anchor lookup by raw or normalized label.
    pub fn coordinates(&self, region: &str) -> Option<Coordinates> {
        self.anchors.get(&normalize_region(region)).copied()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

impl Default for RegionMap {
    fn default() -> Self {
        Self::default_seed()
    }
}

/// Great-circle distance in km between two anchors.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f32 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let sin_d_lat = (d_lat / 2.0).sin();
    let sin_d_lon = (d_lon / 2.0).sin();
    let h = sin_d_lat * sin_d_lat + lat1.cos() * lat2.cos() * sin_d_lon * sin_d_lon;
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Region affinity for two raw region labels, in [0, 1].
pub fn region_affinity(
    telemetry: &TelemetryIndex,
    regions: &RegionMap,
    region_a: &str,
    region_b: &str,
) -> f32 {
    let ra = normalize_region(region_a);
    let rb = normalize_region(region_b);

    // 1) Telemetry corridor, both directions merged.
    if let Some(stats) = telemetry.merged(&ra, &rb) {
        let latency_score = clamp01((LATENCY_CEIL_MS - stats.avg_latency_ms()) / LATENCY_SPAN_MS);
        let retry_score = clamp01(1.0 - stats.avg_retries() / RETRY_CEIL);
        let reliability_score = clamp01(stats.avg_reliability());

        return W_LATENCY * latency_score
            + W_RETRY * retry_score
            + W_RELIABILITY * reliability_score;
    }

    // 2) Geography: same label, then distance tiers.
    if ra == rb {
        return 1.0;
    }
    if let (Some(ca), Some(cb)) = (regions.coordinates(&ra), regions.coordinates(&rb)) {
        let d = haversine_km(ca, cb);
        return if d <= TIER_NEAR_KM {
            TIER_NEAR
        } else if d <= TIER_MID_KM {
            TIER_MID
        } else if d <= TIER_FAR_KM {
            TIER_FAR
        } else {
            TIER_REMOTE
        };
    }

    // 3) No data at all.
    debug!(%region_a, %region_b, "no telemetry or anchors; neutral region affinity");
    NEUTRAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{DeliveryStatus, TelemetryEvent};

    fn no_telemetry() -> TelemetryIndex {
        TelemetryIndex::build(&[])
    }

    #[test]
    fn identical_labels_without_telemetry_score_one() {
        let score = region_affinity(&no_telemetry(), &RegionMap::default_seed(), "West US", "west_us");
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn distance_tiers_match_thresholds() {
        let regions = RegionMap::default_seed();
        let t = no_telemetry();

        // Amsterdam <-> London: ~360 km -> near tier.
        let near = region_affinity(&t, &regions, "West Europe", "UK South");
        assert!((near - 0.9).abs() < 1e-6);

        // Amsterdam <-> Dublin: ~760 km -> still near tier.
        let near2 = region_affinity(&t, &regions, "West Europe", "North Europe");
        assert!((near2 - 0.9).abs() < 1e-6);

        // West US <-> East US: ~3600 km -> far tier.
        let far = region_affinity(&t, &regions, "West US", "East US");
        assert!((far - 0.5).abs() < 1e-6);

        // Tokyo <-> Sydney: ~7800 km -> remote tier.
        let remote = region_affinity(&t, &regions, "Japan East", "Australia East");
        assert!((remote - 0.2).abs() < 1e-6);
    }

    #[test]
    fn mid_tier_at_one_thousand_km() {
        // Two synthetic anchors ~1000 km apart on a meridian (1 deg lat ~ 111 km).
        let regions = RegionMap::from_anchors([
            ("alpha", Coordinates { lat: 0.0, lon: 0.0 }),
            ("beta", Coordinates { lat: 9.0, lon: 0.0 }),
        ]);
        let d = haversine_km(
            regions.coordinates("alpha").unwrap(),
            regions.coordinates("beta").unwrap(),
        );
        assert!(d > 800.0 && d < 2000.0, "expected mid tier distance, got {d}");

        let score = region_affinity(&no_telemetry(), &regions, "alpha", "beta");
        assert!((score - 0.75).abs() < 1e-6);
    }

    #[test]
    fn unknown_coordinates_are_neutral() {
        let score = region_affinity(&no_telemetry(), &RegionMap::empty(), "Atlantis", "Mu");
        assert!((score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn telemetry_takes_precedence_over_geography() {
        let telemetry = TelemetryIndex::build(&[TelemetryEvent::new(
            "West US",
            "West US",
            50.0,
            0.0,
            DeliveryStatus::Delivered,
        )]);
        // Identical labels would be 1.0 by geography, but telemetry rules:
        // latency (250-50)/200 = 1.0, retries 1.0, reliability 1.0 -> 1.0 here;
        // degrade latency to see the corridor actually being used.
        let slow = TelemetryIndex::build(&[TelemetryEvent::new(
            "West US",
            "West US",
            250.0,
            0.0,
            DeliveryStatus::Delivered,
        )]);

        let fast_score =
            region_affinity(&telemetry, &RegionMap::default_seed(), "West US", "West US");
        assert!((fast_score - 1.0).abs() < 1e-6);

        let slow_score = region_affinity(&slow, &RegionMap::default_seed(), "West US", "West US");
        // 0.5*0 + 0.2*1 + 0.3*1 = 0.5 < 1.0 -> telemetry was used, not the label match.
        assert!((slow_score - 0.5).abs() < 1e-6);
    }

    #[test]
    fn telemetry_composite_blend() {
        let telemetry = TelemetryIndex::build(&[TelemetryEvent::new(
            "West US",
            "East US",
            150.0,
            1.5,
            DeliveryStatus::Retried,
        )]);
        let score = region_affinity(&telemetry, &RegionMap::default_seed(), "West US", "East US");
        // latency (250-150)/200 = 0.5; retry 1-1.5/3 = 0.5; reliability 0.7
        // 0.5*0.5 + 0.2*0.5 + 0.3*0.7 = 0.56
        assert!((score - 0.56).abs() < 1e-6);
    }

    #[test]
    fn load_from_missing_file_falls_back_to_seed() {
        let m = RegionMap::load_from_file("definitely/not/here.json");
        assert_eq!(m.len(), RegionMap::default_seed().len());
        assert!(m.coordinates("japan_east").is_some());
    }
}
