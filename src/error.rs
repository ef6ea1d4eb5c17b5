//! Typed errors surfaced at the engine boundary.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Single-pair queries never substitute a default profile.
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),
    /// A pair requires two distinct profiles.
    #[error("cannot score profile '{0}' against itself")]
    SelfPair(String),
}
