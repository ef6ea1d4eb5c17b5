//! # Love-Notes Telemetry
//! Per-event delivery telemetry aggregated into directed region corridors.
//! The region affinity model reads merged (both-direction) corridor stats;
//! when no telemetry exists for a pair of regions it falls back to geography.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Delivery outcome of a single love-note event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    Retried,
    Pending,
    /// Failed or anything unrecognized.
    Other,
}

impl DeliveryStatus {
    /// Case-insensitive parse of a raw status label.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "delivered" => Self::Delivered,
            "retried" => Self::Retried,
            "pending" => Self::Pending,
            _ => Self::Other,
        }
    }

    /// Reliability weight in [0, 1] contributed to corridor stats.
    pub fn reliability_weight(self) -> f32 {
        match self {
            Self::Delivered => 1.0,
            Self::Retried => 0.7,
            Self::Pending => 0.4,
            Self::Other => 0.0,
        }
    }
}

/// One raw telemetry event between two regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub origin: String,
    pub destination: String,
    pub latency_ms: f32,
    pub retry_count: f32,
    pub status: DeliveryStatus,
}

impl TelemetryEvent {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        latency_ms: f32,
        retry_count: f32,
        status: DeliveryStatus,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            latency_ms,
            retry_count,
            status,
        }
    }
}

/// Aggregated telemetry for one directed corridor (or a merged pair of them).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CorridorStats {
    pub count: u32,
    pub sum_latency_ms: f32,
    pub sum_retries: f32,
    pub sum_reliability: f32,
}

impl CorridorStats {
    fn absorb(&mut self, other: &CorridorStats) {
        self.count += other.count;
        self.sum_latency_ms += other.sum_latency_ms;
        self.sum_retries += other.sum_retries;
        self.sum_reliability += other.sum_reliability;
    }

    pub fn avg_latency_ms(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.sum_latency_ms / self.count as f32
        }
    }

    pub fn avg_retries(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.sum_retries / self.count as f32
        }
    }

    pub fn avg_reliability(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.sum_reliability / self.count as f32
        }
    }
}

/// Normalize a region label for corridor keys and equality checks:
/// lowercase, whitespace and underscores stripped.
pub fn normalize_region(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Directed corridor index over normalized region labels.
/// Built once per dataset snapshot; read-only afterwards.
#[derive(Debug, Default)]
pub struct TelemetryIndex {
    corridors: HashMap<(String, String), CorridorStats>,
}

impl TelemetryIndex {
    /// O(E) build. Events with an empty origin or destination are skipped;
    /// NaN latency/retry values count as 0 toward the sums.
    pub fn build(events: &[TelemetryEvent]) -> Self {
        let mut corridors: HashMap<(String, String), CorridorStats> = HashMap::new();

        for ev in events {
            let origin = normalize_region(&ev.origin);
            let dest = normalize_region(&ev.destination);
            if origin.is_empty() || dest.is_empty() {
                continue;
            }

            let entry = corridors.entry((origin, dest)).or_default();
            entry.count += 1;
            entry.sum_latency_ms += if ev.latency_ms.is_nan() {
                0.0
            } else {
                ev.latency_ms
            };
            entry.sum_retries += if ev.retry_count.is_nan() {
                0.0
            } else {
                ev.retry_count
            };
            entry.sum_reliability += ev.status.reliability_weight();
        }

        debug!(
            events = events.len(),
            corridors = corridors.len(),
            "telemetry index built"
        );
        Self { corridors }
    }

    pub fn is_empty(&self) -> bool {
        self.corridors.is_empty()
    }

    /// Merged stats for both directions between two normalized labels.
    /// `None` when neither direction has telemetry.
    pub fn merged(&self, ra: &str, rb: &str) -> Option<CorridorStats> {
        let forward = self.corridors.get(&(ra.to_string(), rb.to_string()));
        // Same-region corridors have only one direction; don't count it twice.
        let backward = if ra == rb {
            None
        } else {
            self.corridors.get(&(rb.to_string(), ra.to_string()))
        };

        match (forward, backward) {
            (None, None) => None,
            (Some(f), None) => Some(*f),
            (None, Some(b)) => Some(*b),
            (Some(f), Some(b)) => {
                let mut m = *f;
                m.absorb(b);
                Some(m)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(o: &str, d: &str, lat: f32, retries: f32, status: DeliveryStatus) -> TelemetryEvent {
        TelemetryEvent::new(o, d, lat, retries, status)
    }

    #[test]
    fn normalize_strips_case_space_underscore() {
        assert_eq!(normalize_region("West US"), "westus");
        assert_eq!(normalize_region("west_us"), "westus");
        assert_eq!(normalize_region("  North  Europe "), "northeurope");
    }

    #[test]
    fn status_parse_and_weights() {
        assert_eq!(DeliveryStatus::parse("Delivered"), DeliveryStatus::Delivered);
        assert_eq!(DeliveryStatus::parse("FAILED"), DeliveryStatus::Other);
        assert!((DeliveryStatus::Retried.reliability_weight() - 0.7).abs() < 1e-6);
        assert!((DeliveryStatus::Pending.reliability_weight() - 0.4).abs() < 1e-6);
        assert_eq!(DeliveryStatus::Other.reliability_weight(), 0.0);
    }

    #[test]
    fn merged_combines_both_directions() {
        let idx = TelemetryIndex::build(&[
            ev("West US", "East US", 100.0, 0.0, DeliveryStatus::Delivered),
            ev("East US", "West US", 200.0, 2.0, DeliveryStatus::Retried),
        ]);

        let m = idx.merged("westus", "eastus").unwrap();
        assert_eq!(m.count, 2);
        assert!((m.avg_latency_ms() - 150.0).abs() < 1e-6);
        assert!((m.avg_retries() - 1.0).abs() < 1e-6);
        assert!((m.avg_reliability() - 0.85).abs() < 1e-6);

        // Symmetric lookup.
        let m2 = idx.merged("eastus", "westus").unwrap();
        assert_eq!(m, m2);
    }

    #[test]
    fn same_region_corridor_counted_once() {
        let idx = TelemetryIndex::build(&[ev(
            "West US",
            "West US",
            80.0,
            0.0,
            DeliveryStatus::Delivered,
        )]);
        let m = idx.merged("westus", "westus").unwrap();
        assert_eq!(m.count, 1);
    }

    #[test]
    fn missing_corridor_is_none() {
        let idx = TelemetryIndex::build(&[]);
        assert!(idx.merged("westus", "eastus").is_none());
        assert!(idx.is_empty());
    }

    #[test]
    fn empty_labels_are_skipped() {
        let idx = TelemetryIndex::build(&[ev("", "East US", 50.0, 0.0, DeliveryStatus::Delivered)]);
        assert!(idx.is_empty());
    }
}
