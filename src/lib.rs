// src/lib.rs
// Public library surface for integration tests (and the demo binary).

pub mod behavior;
pub mod config;
pub mod dealbreakers;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod profile;
pub mod region;
pub mod scorer;
pub mod signals;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::behavior::{BehaviorEdge, BehaviorGraph, EdgeType};
pub use crate::config::EngineOptions;
pub use crate::engine::{MatchEngine, PairScore};
pub use crate::error::MatchError;
pub use crate::leaderboard::{Leaderboard, MatchCandidate, PlayerInfo};
pub use crate::profile::{Profile, Traits};
pub use crate::region::{Coordinates, RegionMap};
pub use crate::scorer::{Breakdown, SignalWeights};
pub use crate::telemetry::{DeliveryStatus, TelemetryEvent};
