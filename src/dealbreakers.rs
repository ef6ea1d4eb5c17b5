//! # Dealbreakers
//! Bidirectional hard-exclusion rules. Each profile declares rule tokens;
//! a declared rule is checked against the *other* party using the declaring
//! party's own predicate, and a pair is rejected when either direction's
//! known rule is violated.
//!
//! Tokens with no registered rule are automatically satisfied — they can
//! never exclude a pair. Data authors may declare anything, but only the
//! rules enumerated here are enforceable.

use crate::profile::Profile;
use crate::telemetry::normalize_region;

/// Policy for declared-but-unregistered tokens: treat as satisfied.
pub const UNKNOWN_TOKEN_SATISFIED: bool = true;

/// Max age difference tolerated by the `age_gap` rule.
const AGE_GAP_LIMIT: u32 = 10;

/// The enforceable rule kinds, mapped from their declared tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dealbreaker {
    /// Requires the candidate to share the declarer's region label.
    DifferentTimezone,
    /// Requires the age difference to stay within `AGE_GAP_LIMIT` years.
    AgeGap,
}

impl Dealbreaker {
    /// Map a declared token to a registered rule; `None` for unknown tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "different_timezone" => Some(Self::DifferentTimezone),
            "age_gap" => Some(Self::AgeGap),
            _ => None,
        }
    }

    /// Does `other` satisfy the rule declared by `owner`?
    pub fn satisfied_by(self, owner: &Profile, other: &Profile) -> bool {
        match self {
            Self::DifferentTimezone => {
                normalize_region(&owner.region) == normalize_region(&other.region)
            }
            Self::AgeGap => owner.age.abs_diff(other.age) <= AGE_GAP_LIMIT,
        }
    }
}

fn declared_rules_satisfied(owner: &Profile, other: &Profile) -> bool {
    owner.dealbreakers.iter().all(|token| {
        match Dealbreaker::from_token(token) {
            Some(rule) => rule.satisfied_by(owner, other),
            None => UNKNOWN_TOKEN_SATISFIED,
        }
    })
}

/// Pair-level check: both parties' declared, known rules must hold.
pub fn respects_dealbreakers(a: &Profile, b: &Profile) -> bool {
    declared_rules_satisfied(a, b) && declared_rules_satisfied(b, a)
}
