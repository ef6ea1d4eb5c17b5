//! # Engine Options
//! Runtime configuration for the leaderboard build: weight overrides, the
//! minimum score threshold, the age hard filter, and an optional region
//! allow-list. Loadable from JSON with silent fallback to the defaults, so
//! a missing config file never takes the engine down.

use serde::Deserialize;
use std::{collections::BTreeSet, fs, path::Path};

use crate::scorer::SignalWeights;
use crate::telemetry::normalize_region;

/// Reference minimum composite score on the [0, 1] scale. Blocked pairs
/// score exactly 0 and therefore fall under this threshold like any other
/// low scorer.
fn default_min_score() -> f32 {
    0.4
}

fn default_enforce_age() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineOptions {
    #[serde(default)]
    pub weights: SignalWeights,
    #[serde(default = "default_min_score")]
    pub min_score: f32,
    /// When set, pairs where either direction's age preference fails are
    /// rejected before scoring.
    #[serde(default = "default_enforce_age")]
    pub enforce_age_filter: bool,
    /// Raw region labels; matching is done on normalized labels.
    #[serde(default)]
    pub region_filter: Option<BTreeSet<String>>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            min_score: default_min_score(),
            enforce_age_filter: default_enforce_age(),
            region_filter: None,
        }
    }
}

impl EngineOptions {
    /// Load from a JSON file.
    /// Falls back to `Default` on a missing or malformed file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn with_weights(mut self, weights: SignalWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_enforce_age(mut self, enforce: bool) -> Self {
        self.enforce_age_filter = enforce;
        self
    }

    pub fn with_region_filter<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.region_filter = Some(regions.into_iter().map(Into::into).collect());
        self
    }

    /// Does a raw region label pass the allow-list (if any)?
    pub fn region_allowed(&self, region: &str) -> bool {
        match &self.region_filter {
            None => true,
            Some(allowed) => {
                let normalized = normalize_region(region);
                allowed.iter().any(|r| normalize_region(r) == normalized)
            }
        }
    }
}
