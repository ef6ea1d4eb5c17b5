//! # Profiles
//! Matchmaking profile types and defensive ingestion sanitization.
//!
//! The data layer (CSV/API, outside this crate) hands us already parsed
//! records; we still clamp every numeric field so a malformed row degrades
//! gracefully instead of pushing NaN into downstream scores.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Big-Five (OCEAN) trait vector, each component normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    pub openness: f32,
    pub conscientiousness: f32,
    pub extraversion: f32,
    pub agreeableness: f32,
    pub neuroticism: f32,
}

impl Traits {
    /// Uniform trait vector; handy default for partially filled rows.
    pub fn uniform(v: f32) -> Self {
        let v = clamp01(v);
        Self {
            openness: v,
            conscientiousness: v,
            extraversion: v,
            agreeableness: v,
            neuroticism: v,
        }
    }

    fn sanitized(self) -> Self {
        Self {
            openness: clamp01(self.openness),
            conscientiousness: clamp01(self.conscientiousness),
            extraversion: clamp01(self.extraversion),
            agreeableness: clamp01(self.agreeableness),
            neuroticism: clamp01(self.neuroticism),
        }
    }
}

impl Default for Traits {
    fn default() -> Self {
        Self::uniform(0.5)
    }
}

/// A single matchmaking profile as supplied by the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub age: u32,
    /// Raw region label, e.g. "West US"; normalization happens at lookup.
    pub region: String,
    /// Lowercase interest tokens; order irrelevant.
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub traits: Traits,
    pub pref_age_min: u32,
    pub pref_age_max: u32,
    /// Declared dealbreaker tokens; unknown tokens never exclude a pair.
    #[serde(default)]
    pub dealbreakers: BTreeSet<String>,
    #[serde(default)]
    pub matches_attempted: u32,
    #[serde(default)]
    pub matches_success: u32,
    /// Optional aggregate sentiment in [-1, 1] from the love-notes dataset.
    #[serde(default)]
    pub sentiment: Option<f32>,
}

impl Profile {
    /// Minimal constructor with sensible defaults; builder methods fill the rest.
    pub fn new(id: impl Into<String>, age: u32, region: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            age,
            region: region.into(),
            interests: BTreeSet::new(),
            traits: Traits::default(),
            pref_age_min: 18,
            pref_age_max: 99,
            dealbreakers: BTreeSet::new(),
            matches_attempted: 0,
            matches_success: 0,
            sentiment: None,
        }
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_traits(mut self, traits: Traits) -> Self {
        self.traits = traits;
        self
    }

    pub fn with_pref_age(mut self, min: u32, max: u32) -> Self {
        self.pref_age_min = min;
        self.pref_age_max = max;
        self
    }

    pub fn with_dealbreakers<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dealbreakers = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sentiment(mut self, sentiment: f32) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn with_match_stats(mut self, attempted: u32, success: u32) -> Self {
        self.matches_attempted = attempted;
        self.matches_success = success;
        self
    }

    /// Defensive ingestion pass. Never rejects a profile:
    /// - traits clamped to [0, 1] (NaN → 0.0),
    /// - sentiment clamped to [-1, 1] (NaN → 0.0),
    /// - reversed preferred-age bounds swapped,
    /// - interest and dealbreaker tokens trimmed + lowercased, empties dropped.
    pub fn sanitized(mut self) -> Self {
        self.traits = self.traits.sanitized();

        self.sentiment = self.sentiment.map(|s| {
            if s.is_nan() {
                0.0
            } else {
                s.clamp(-1.0, 1.0)
            }
        });

        if self.pref_age_min > self.pref_age_max {
            std::mem::swap(&mut self.pref_age_min, &mut self.pref_age_max);
        }

        self.interests = normalize_tokens(&self.interests);
        self.dealbreakers = normalize_tokens(&self.dealbreakers);
        self
    }

    /// One-word personality summary for display surfaces.
    pub fn vibe(&self) -> &'static str {
        if self.traits.extraversion > 0.5 {
            "adventurous"
        } else if self.traits.openness > 0.5 {
            "creative"
        } else {
            "cozy"
        }
    }

    /// "success/attempted" display string, e.g. "3/7".
    pub fn match_success_display(&self) -> String {
        format!("{}/{}", self.matches_success, self.matches_attempted)
    }
}

fn normalize_tokens(tokens: &BTreeSet<String>) -> BTreeSet<String> {
    tokens
        .iter()
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Clamp to [0.0, 1.0]; NaN maps to 0.0 so it can never reach a score.
pub(crate) fn clamp01(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else if x < 0.0 {
        0.0
    } else if x > 1.0 {
        1.0
    } else {
        x
    }
}
