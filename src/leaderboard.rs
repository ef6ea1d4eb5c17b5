//! # Leaderboard Types
//! Output shapes for the ranked board: per-player display info, one ranked
//! candidate pair, and the cached board itself.

use serde::Serialize;

use crate::profile::Profile;
use crate::scorer::Breakdown;

/// Display-facing view of one profile inside a candidate pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub region: String,
    pub interests: Vec<String>,
    pub vibe: String,
    /// "success/attempted", e.g. "3/7".
    pub match_success: String,
}

impl PlayerInfo {
    pub fn from_profile(p: &Profile) -> Self {
        Self {
            id: p.id.clone(),
            name: format!("Cupid #{}", p.id.replace('U', "")),
            age: p.age,
            region: p.region.clone(),
            interests: p.interests.iter().cloned().collect(),
            vibe: p.vibe().to_string(),
            match_success: p.match_success_display(),
        }
    }
}

/// One ranked pair on the leaderboard. `player1` always carries the
/// lexically smaller id, which keeps rebuilds byte-identical.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    /// 1-based dense rank, unique within a board.
    pub rank: usize,
    pub player1: PlayerInfo,
    pub player2: PlayerInfo,
    /// Composite compatibility in [0, 1].
    pub score: f32,
    pub breakdown: Breakdown,
    pub shared_interests: Vec<String>,
}

impl MatchCandidate {
    /// Rounded percentage for display surfaces; the engine itself never
    /// uses this scale.
    pub fn score_percent(&self) -> u32 {
        (self.score * 100.0).round() as u32
    }

    pub fn involves(&self, id: &str) -> bool {
        self.player1.id == id || self.player2.id == id
    }
}

/// The globally sorted, ranked set of candidate pairs above the minimum
/// score threshold. Derived, cached, read-only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Leaderboard {
    pub entries: Vec<MatchCandidate>,
}

impl Leaderboard {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// O(K) slice of the cached board.
    pub fn top_k(&self, k: usize) -> &[MatchCandidate] {
        &self.entries[..k.min(self.entries.len())]
    }
}
