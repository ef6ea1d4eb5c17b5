//! # Behavior Graph
//! Aggregation of raw interaction edges into an O(1)-lookup index keyed by
//! the canonical unordered pair, plus the behavior signal computed from it.
//!
//! Multiple edges between the same pair are all retained and aggregated,
//! never deduplicated — two likes count twice.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

// Behavior score shape: start neutral, add evidence, clamp.
const NEUTRAL: f32 = 0.5;
const MATCHED_BONUS: f32 = 0.35;
const LIKED_BONUS: f32 = 0.15;
const LIKED_CAP: u32 = 2;
const SAME_INTEREST_BONUS: f32 = 0.10;
const AVG_WEIGHT_FACTOR: f32 = 0.10;

/// Known interaction kinds; anything unrecognized parses to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Liked,
    Matched,
    Blocked,
    SameInterest,
    Unknown,
}

impl EdgeType {
    /// Case-insensitive parse of a raw label.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "liked" => Self::Liked,
            "matched" => Self::Matched,
            "blocked" => Self::Blocked,
            "same_interest" => Self::SameInterest,
            _ => Self::Unknown,
        }
    }
}

/// One raw interaction between two users, as supplied by the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorEdge {
    pub source: String,
    pub target: String,
    pub edge_type: EdgeType,
    pub weight: f32,
}

impl BehaviorEdge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        edge_type: EdgeType,
        weight: f32,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
            weight,
        }
    }
}

/// Canonical unordered pair key: the two ids ordered by the total (lexical)
/// order over ids and used directly as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairKey {
    lo: String,
    hi: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self {
                lo: a.to_string(),
                hi: b.to_string(),
            }
        } else {
            Self {
                lo: b.to_string(),
                hi: a.to_string(),
            }
        }
    }
}

/// Aggregated interaction counts for one unordered pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PairStats {
    pub liked: u32,
    pub matched: u32,
    pub blocked: u32,
    pub same_interest: u32,
    /// Running sum of `weight` across all edges touching the pair,
    /// Unknown edges included.
    pub total_weight: f32,
}

/// O(1)-lookup aggregation of behavior edges. Built once per dataset
/// snapshot; read-only afterwards.
#[derive(Debug, Default)]
pub struct BehaviorGraph {
    map: HashMap<PairKey, PairStats>,
}

impl BehaviorGraph {
    /// O(E) build over the raw edge list.
    pub fn build(edges: &[BehaviorEdge]) -> Self {
        let mut map: HashMap<PairKey, PairStats> = HashMap::new();

        for e in edges {
            let entry = map.entry(PairKey::new(&e.source, &e.target)).or_default();
            match e.edge_type {
                EdgeType::Liked => entry.liked += 1,
                EdgeType::Matched => entry.matched += 1,
                EdgeType::Blocked => entry.blocked += 1,
                EdgeType::SameInterest => entry.same_interest += 1,
                EdgeType::Unknown => {}
            }
            // NaN weights must not poison the running sum.
            if !e.weight.is_nan() {
                entry.total_weight += e.weight;
            }
        }

        debug!(edges = edges.len(), pairs = map.len(), "behavior graph built");
        Self { map }
    }

    pub fn stats(&self, a: &str, b: &str) -> Option<&PairStats> {
        self.map.get(&PairKey::new(a, b))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Behavior signal for a pair, in [0, 1].
///
/// No recorded relationship is neutral (0.5), not penalized. A single
/// blocked edge is a hard 0 that no other interaction can rescue.
pub fn behavior_score(graph: &BehaviorGraph, a: &str, b: &str) -> f32 {
    let Some(stats) = graph.stats(a, b) else {
        return NEUTRAL;
    };

    if stats.blocked > 0 {
        return 0.0;
    }

    let mut score = NEUTRAL;
    if stats.matched >= 1 {
        score += MATCHED_BONUS;
    }
    score += LIKED_BONUS * stats.liked.min(LIKED_CAP) as f32;
    if stats.same_interest >= 1 {
        score += SAME_INTEREST_BONUS;
    }

    let edge_count = stats.liked + stats.matched + stats.same_interest;
    if edge_count > 0 {
        score += (stats.total_weight / edge_count as f32) * AVG_WEIGHT_FACTOR;
    }

    crate::profile::clamp01(score)
}
