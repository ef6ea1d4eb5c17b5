//! # Pairwise Scorer
//! Combines the independent signals into one composite compatibility score.
//!
//! The canonical representation everywhere in the engine is the normalized
//! float in [0, 1]; percentage display is a rounding helper on the output
//! types, never a second internal scale.

use serde::{Deserialize, Serialize};

use crate::behavior::{behavior_score, BehaviorGraph};
use crate::profile::{clamp01, Profile};
use crate::region::{region_affinity, RegionMap};
use crate::signals;
use crate::telemetry::TelemetryIndex;

/// Per-signal weights for the composite score.
///
/// Two named profiles cover the product's historical variants; partial JSON
/// overrides fall back to the behavior-graph defaults field by field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    #[serde(default = "default_w_ocean")]
    pub ocean: f32,
    #[serde(default = "default_w_interests")]
    pub interests: f32,
    #[serde(default = "default_w_behavior")]
    pub behavior: f32,
    #[serde(default = "default_w_age_fit")]
    pub age_fit: f32,
    #[serde(default = "default_w_region")]
    pub region: f32,
    #[serde(default = "default_w_sentiment")]
    pub sentiment: f32,
}

fn default_w_ocean() -> f32 {
    0.30
}
fn default_w_interests() -> f32 {
    0.25
}
fn default_w_behavior() -> f32 {
    0.20
}
fn default_w_age_fit() -> f32 {
    0.15
}
fn default_w_region() -> f32 {
    0.10
}
fn default_w_sentiment() -> f32 {
    0.0
}

impl SignalWeights {
    /// Primary variant: personality 0.30, interests 0.25, behavior 0.20,
    /// age fit 0.15, region 0.10.
    pub fn behavior_graph() -> Self {
        Self {
            ocean: 0.30,
            interests: 0.25,
            behavior: 0.20,
            age_fit: 0.15,
            region: 0.10,
            sentiment: 0.0,
        }
    }

    /// Alternate variant for datasets without a behavior graph:
    /// personality 0.30, interests 0.35, sentiment 0.15, region 0.20.
    pub fn telemetry() -> Self {
        Self {
            ocean: 0.30,
            interests: 0.35,
            behavior: 0.0,
            age_fit: 0.0,
            region: 0.20,
            sentiment: 0.15,
        }
    }
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self::behavior_graph()
    }
}

/// All per-pair signals, each in [0, 1]. Serialized for explanation surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub ocean: f32,
    pub interests: f32,
    pub behavior: f32,
    pub age_fit: f32,
    pub region: f32,
    pub sentiment: f32,
}

/// Compute every signal for a pair. Order of the two profiles is irrelevant.
pub fn compute_breakdown(
    a: &Profile,
    b: &Profile,
    graph: &BehaviorGraph,
    telemetry: &TelemetryIndex,
    regions: &RegionMap,
) -> Breakdown {
    Breakdown {
        ocean: signals::ocean_score(a, b),
        interests: signals::jaccard(&a.interests, &b.interests),
        behavior: behavior_score(graph, &a.id, &b.id),
        age_fit: signals::age_fit_score(a, b),
        region: region_affinity(telemetry, regions, &a.region, &b.region),
        sentiment: signals::sentiment_alignment(a, b),
    }
}

/// Weighted composite in [0, 1].
///
/// The behavior hard block applies *after* the weighted sum: a blocked edge
/// (behavior exactly 0) forces the composite to 0 regardless of the other
/// signals or their weights.
pub fn composite_score(breakdown: &Breakdown, weights: &SignalWeights) -> f32 {
    let raw = breakdown.ocean * weights.ocean
        + breakdown.interests * weights.interests
        + breakdown.behavior * weights.behavior
        + breakdown.age_fit * weights.age_fit
        + breakdown.region * weights.region
        + breakdown.sentiment * weights.sentiment;

    let gated = if breakdown.behavior == 0.0 { 0.0 } else { raw };
    clamp01(gated)
}
