//! # Match Engine
//! Owns one immutable dataset snapshot (sanitized profiles, behavior graph,
//! optional telemetry, region anchors), enumerates all unordered pairs,
//! filters, scores, and caches the ranked leaderboard.
//!
//! The build is O(n²) and synchronous with no I/O; the cache makes every
//! subsequent top-K request an O(K) slice. Concurrent first callers
//! serialize on the cache's write lock, so the board is built exactly once
//! and never observed partially built. Only `invalidate`/`reload` drop it.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::behavior::{BehaviorEdge, BehaviorGraph};
use crate::config::EngineOptions;
use crate::dealbreakers::respects_dealbreakers;
use crate::error::MatchError;
use crate::leaderboard::{Leaderboard, MatchCandidate, PlayerInfo};
use crate::profile::Profile;
use crate::region::RegionMap;
use crate::scorer::{composite_score, compute_breakdown, Breakdown};
use crate::signals::{age_compatible, shared_interests};
use crate::telemetry::{TelemetryEvent, TelemetryIndex};

/// On-demand single-pair explanation, independent of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairScore {
    /// Composite compatibility in [0, 1].
    pub score: f32,
    pub breakdown: Breakdown,
    pub shared_interests: Vec<String>,
}

pub struct MatchEngine {
    /// Sorted by id so pair enumeration is deterministic regardless of
    /// input order, and `player1` always carries the smaller id.
    profiles: Vec<Profile>,
    by_id: HashMap<String, usize>,
    graph: BehaviorGraph,
    telemetry: TelemetryIndex,
    regions: RegionMap,
    options: EngineOptions,
    cache: RwLock<Option<Arc<Leaderboard>>>,
}

impl MatchEngine {
    pub fn new(profiles: Vec<Profile>, edges: &[BehaviorEdge], options: EngineOptions) -> Self {
        let (profiles, by_id) = ingest(profiles);
        Self {
            profiles,
            by_id,
            graph: BehaviorGraph::build(edges),
            telemetry: TelemetryIndex::default(),
            regions: RegionMap::default_seed(),
            options,
            cache: RwLock::new(None),
        }
    }

    /// Attach raw telemetry events (builder style, before first use).
    pub fn with_telemetry(mut self, events: &[TelemetryEvent]) -> Self {
        self.telemetry = TelemetryIndex::build(events);
        self.clear_cache_mut();
        self
    }

    /// Replace the region anchor table (builder style, before first use).
    pub fn with_region_map(mut self, regions: RegionMap) -> Self {
        self.regions = regions;
        self.clear_cache_mut();
        self
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.by_id.get(id).map(|&i| &self.profiles[i])
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// The cached board, building it on first access.
    ///
    /// Double-checked under the write lock: losers of the build race find
    /// the winner's board in place and never duplicate the O(n²) work.
    pub fn leaderboard(&self) -> Arc<Leaderboard> {
        if let Some(board) = self
            .cache
            .read()
            .expect("leaderboard cache poisoned")
            .as_ref()
        {
            return Arc::clone(board);
        }

        let mut guard = self.cache.write().expect("leaderboard cache poisoned");
        if let Some(board) = guard.as_ref() {
            return Arc::clone(board);
        }

        let board = Arc::new(self.build());
        *guard = Some(Arc::clone(&board));
        board
    }

    /// O(K) slice of the cached board.
    pub fn top_k(&self, k: usize) -> Vec<MatchCandidate> {
        self.leaderboard().top_k(k).to_vec()
    }

    /// For every profile id appearing on the board, its single
    /// highest-scoring row. One O(N) scan; rank order breaks score ties.
    pub fn best_per_profile(&self) -> BTreeMap<String, MatchCandidate> {
        let board = self.leaderboard();
        let mut best: BTreeMap<String, MatchCandidate> = BTreeMap::new();
        for entry in &board.entries {
            for id in [&entry.player1.id, &entry.player2.id] {
                best.entry(id.clone()).or_insert_with(|| entry.clone());
            }
        }
        best
    }

    /// Score one pair on demand, bypassing the board's filters and
    /// threshold. Unknown ids are an error, never a default profile.
    pub fn score_pair(&self, id_a: &str, id_b: &str) -> Result<PairScore, MatchError> {
        if id_a == id_b {
            return Err(MatchError::SelfPair(id_a.to_string()));
        }
        let a = self
            .profile(id_a)
            .ok_or_else(|| MatchError::ProfileNotFound(id_a.to_string()))?;
        let b = self
            .profile(id_b)
            .ok_or_else(|| MatchError::ProfileNotFound(id_b.to_string()))?;

        let breakdown = compute_breakdown(a, b, &self.graph, &self.telemetry, &self.regions);
        Ok(PairScore {
            score: composite_score(&breakdown, &self.options.weights),
            breakdown,
            shared_interests: shared_interests(a, b),
        })
    }

    /// Drop the cached board; the next access rebuilds it.
    pub fn invalidate(&self) {
        *self.cache.write().expect("leaderboard cache poisoned") = None;
        debug!("leaderboard cache invalidated");
    }

    /// Swap in a new dataset snapshot and drop the cache.
    pub fn reload(&mut self, profiles: Vec<Profile>, edges: &[BehaviorEdge]) {
        let (profiles, by_id) = ingest(profiles);
        self.profiles = profiles;
        self.by_id = by_id;
        self.graph = BehaviorGraph::build(edges);
        self.clear_cache_mut();
        info!(profiles = self.profiles.len(), "dataset snapshot reloaded");
    }

    fn clear_cache_mut(&mut self) {
        *self.cache.get_mut().expect("leaderboard cache poisoned") = None;
    }

    fn build(&self) -> Leaderboard {
        let eligible: Vec<&Profile> = self
            .profiles
            .iter()
            .filter(|p| self.options.region_allowed(&p.region))
            .collect();

        let mut entries = Vec::new();
        let mut pairs = 0usize;

        for i in 0..eligible.len() {
            for j in (i + 1)..eligible.len() {
                let (a, b) = (eligible[i], eligible[j]);
                pairs += 1;

                if self.options.enforce_age_filter && !age_compatible(a, b) {
                    continue;
                }
                if !respects_dealbreakers(a, b) {
                    continue;
                }

                let breakdown =
                    compute_breakdown(a, b, &self.graph, &self.telemetry, &self.regions);
                let score = composite_score(&breakdown, &self.options.weights);
                if score < self.options.min_score {
                    continue;
                }

                entries.push(MatchCandidate {
                    rank: 0,
                    player1: PlayerInfo::from_profile(a),
                    player2: PlayerInfo::from_profile(b),
                    score,
                    breakdown,
                    shared_interests: shared_interests(a, b),
                });
            }
        }

        // Strictly descending by score; ties broken by the canonical pair
        // ids so identical input always yields identical ranks.
        entries.sort_by(|x, y| {
            y.score
                .partial_cmp(&x.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| x.player1.id.cmp(&y.player1.id))
                .then_with(|| x.player2.id.cmp(&y.player2.id))
        });
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i + 1;
        }

        info!(
            profiles = eligible.len(),
            pairs,
            kept = entries.len(),
            "leaderboard built"
        );
        Leaderboard { entries }
    }
}

/// Sanitize, sort by id, and index the incoming profiles. Duplicate ids
/// keep the first occurrence.
fn ingest(profiles: Vec<Profile>) -> (Vec<Profile>, HashMap<String, usize>) {
    let mut profiles: Vec<Profile> = profiles.into_iter().map(Profile::sanitized).collect();
    profiles.sort_by(|a, b| a.id.cmp(&b.id));

    let before = profiles.len();
    profiles.dedup_by(|a, b| a.id == b.id);
    if profiles.len() < before {
        warn!(
            dropped = before - profiles.len(),
            "duplicate profile ids dropped"
        );
    }

    let by_id = profiles
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id.clone(), i))
        .collect();
    (profiles, by_id)
}
