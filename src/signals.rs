//! # Signal Calculators
//! Pure per-pair compatibility signals, each normalized to [0, 1].
//! All are independent and symmetric under swapping the two profiles;
//! combining them is the scorer's job.

use std::collections::BTreeSet;

use crate::profile::{clamp01, Profile};

// Inner blend for the personality signal: similar agreeableness and
// conscientiousness are rewarded, extraversion is complementary (a large
// difference scores high), openness is similar again.
const W_AGREEABLENESS_SIM: f32 = 0.30;
const W_CONSCIENTIOUSNESS_SIM: f32 = 0.25;
const W_EXTRAVERSION_COMP: f32 = 0.20;
const W_OPENNESS_SIM: f32 = 0.25;

/// Above this average neuroticism the pair starts losing personality score.
const NEUROTICISM_KNEE: f32 = 0.6;

/// Personality (OCEAN) compatibility.
///
/// Opposites attract on energy (extraversion), but stability requires shared
/// groundedness: a joint-high neuroticism average is penalized linearly.
pub fn ocean_score(a: &Profile, b: &Profile) -> f32 {
    let ta = &a.traits;
    let tb = &b.traits;

    let agr_sim = 1.0 - (ta.agreeableness - tb.agreeableness).abs();
    let con_sim = 1.0 - (ta.conscientiousness - tb.conscientiousness).abs();
    let ext_comp = (ta.extraversion - tb.extraversion).abs();
    let open_sim = 1.0 - (ta.openness - tb.openness).abs();

    let avg_neuro = (ta.neuroticism + tb.neuroticism) / 2.0;
    let neuro_penalty = if avg_neuro > NEUROTICISM_KNEE {
        (avg_neuro - NEUROTICISM_KNEE) * 2.0
    } else {
        0.0
    };

    let raw = agr_sim * W_AGREEABLENESS_SIM
        + con_sim * W_CONSCIENTIOUSNESS_SIM
        + ext_comp * W_EXTRAVERSION_COMP
        + open_sim * W_OPENNESS_SIM
        - neuro_penalty;

    clamp01(raw)
}

/// Jaccard similarity over interest-token sets.
///
/// Defined as 0 when either set is empty: no overlap evidence should not
/// inflate the score, and the guard avoids a 0/0 union.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

/// Bidirectional age-preference fit, binary per direction and averaged.
/// Always one of {0.0, 0.5, 1.0}.
pub fn age_fit_score(a: &Profile, b: &Profile) -> f32 {
    let fits_a = if b.age >= a.pref_age_min && b.age <= a.pref_age_max {
        1.0
    } else {
        0.0
    };
    let fits_b = if a.age >= b.pref_age_min && a.age <= b.pref_age_max {
        1.0
    } else {
        0.0
    };
    (fits_a + fits_b) / 2.0
}

/// Strict variant used by the hard filter: both directions must fit.
pub fn age_compatible(a: &Profile, b: &Profile) -> bool {
    age_fit_score(a, b) >= 1.0
}

/// Sentiment alignment over a range of width ~2 ([-1, 1]).
///
/// When either profile lacks a sentiment value the signal is neutral 0.5:
/// absence of data must neither inflate nor zero the composite.
pub fn sentiment_alignment(a: &Profile, b: &Profile) -> f32 {
    match (a.sentiment, b.sentiment) {
        (Some(sa), Some(sb)) => (1.0 - (sa - sb).abs() / 2.0).max(0.0),
        _ => 0.5,
    }
}

/// Sorted intersection of the two interest sets.
pub fn shared_interests(a: &Profile, b: &Profile) -> Vec<String> {
    a.interests
        .intersection(&b.interests)
        .cloned()
        .collect()
}
