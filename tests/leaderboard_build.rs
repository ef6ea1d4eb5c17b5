// tests/leaderboard_build.rs
//
// Board-level invariants via the public API: dense ranks, non-increasing
// scores, deterministic rebuilds, filters, threshold, top-K slicing, and
// the best-per-profile view.

use cupid_match::{BehaviorEdge, EdgeType, EngineOptions, MatchEngine, Profile, Traits};

fn population() -> Vec<Profile> {
    vec![
        Profile::new("U001", 28, "West US")
            .with_interests(["travel", "music"])
            .with_traits(Traits {
                openness: 0.8,
                conscientiousness: 0.6,
                extraversion: 0.7,
                agreeableness: 0.7,
                neuroticism: 0.3,
            })
            .with_pref_age(24, 34),
        Profile::new("U002", 30, "West US")
            .with_interests(["music", "cooking"])
            .with_traits(Traits {
                openness: 0.7,
                conscientiousness: 0.65,
                extraversion: 0.2,
                agreeableness: 0.75,
                neuroticism: 0.25,
            })
            .with_pref_age(25, 35),
        Profile::new("U003", 27, "UK South")
            .with_interests(["travel", "photography"])
            .with_pref_age(24, 32),
        Profile::new("U004", 33, "West Europe")
            .with_interests(["cooking", "hiking"])
            .with_pref_age(26, 38),
        Profile::new("U005", 55, "West US")
            .with_interests(["music"])
            .with_pref_age(50, 60),
    ]
}

fn edges() -> Vec<BehaviorEdge> {
    vec![
        BehaviorEdge::new("U001", "U002", EdgeType::Matched, 1.0),
        BehaviorEdge::new("U001", "U002", EdgeType::Liked, 0.5),
        BehaviorEdge::new("U003", "U004", EdgeType::SameInterest, 0.2),
    ]
}

fn engine_with(options: EngineOptions) -> MatchEngine {
    MatchEngine::new(population(), &edges(), options)
}

#[test]
fn ranks_are_dense_and_scores_non_increasing() {
    let engine = engine_with(EngineOptions::default().with_min_score(0.0));
    let board = engine.leaderboard();
    assert!(!board.is_empty());

    for (i, entry) in board.entries.iter().enumerate() {
        assert_eq!(entry.rank, i + 1, "rank must be dense 1..N");
        if i > 0 {
            assert!(
                board.entries[i - 1].score >= entry.score,
                "scores must be non-increasing"
            );
        }
        // Canonical orientation: player1 carries the smaller id.
        assert!(entry.player1.id < entry.player2.id);
    }
}

#[test]
fn rebuild_from_identical_input_is_deterministic() {
    let a = engine_with(EngineOptions::default()).leaderboard();

    // Same data, reversed input order.
    let mut reversed = population();
    reversed.reverse();
    let b = MatchEngine::new(reversed, &edges(), EngineOptions::default()).leaderboard();

    assert_eq!(a.entries, b.entries);
}

#[test]
fn min_score_threshold_filters_pairs() {
    let all = engine_with(EngineOptions::default().with_min_score(0.0)).leaderboard();
    let strict = engine_with(EngineOptions::default().with_min_score(0.7)).leaderboard();

    assert!(strict.len() <= all.len());
    for entry in &strict.entries {
        assert!(entry.score >= 0.7);
    }
}

#[test]
fn age_hard_filter_rejects_one_sided_fits() {
    // U005 (55, pref 50-60) fits nobody bidirectionally.
    let board = engine_with(EngineOptions::default().with_min_score(0.0)).leaderboard();
    assert!(board.entries.iter().all(|e| !e.involves("U005")));

    // Without the hard filter, U005 pairs reappear (age fit 0 or 0.5).
    let relaxed = engine_with(
        EngineOptions::default()
            .with_min_score(0.0)
            .with_enforce_age(false),
    )
    .leaderboard();
    assert!(relaxed.entries.iter().any(|e| e.involves("U005")));
    assert!(relaxed.len() > board.len());
}

#[test]
fn region_allow_list_restricts_the_population() {
    let board = engine_with(
        EngineOptions::default()
            .with_min_score(0.0)
            .with_region_filter(["West US"]),
    )
    .leaderboard();

    assert!(!board.is_empty());
    for entry in &board.entries {
        assert_eq!(entry.player1.region, "West US");
        assert_eq!(entry.player2.region, "West US");
    }
}

#[test]
fn top_k_is_a_prefix_of_the_board() {
    let engine = engine_with(EngineOptions::default().with_min_score(0.0));
    let board = engine.leaderboard();
    let top2 = engine.top_k(2);

    assert_eq!(top2.len(), 2.min(board.len()));
    assert_eq!(top2.as_slice(), &board.entries[..top2.len()]);

    // Oversized K clamps instead of panicking.
    assert_eq!(engine.top_k(1000).len(), board.len());
}

#[test]
fn best_per_profile_picks_each_ids_highest_row() {
    let engine = engine_with(EngineOptions::default().with_min_score(0.0));
    let board = engine.leaderboard();
    let best = engine.best_per_profile();

    for (id, candidate) in &best {
        assert!(candidate.involves(id));
        let max_for_id = board
            .entries
            .iter()
            .filter(|e| e.involves(id))
            .map(|e| e.score)
            .fold(f32::MIN, f32::max);
        assert!((candidate.score - max_for_id).abs() < 1e-6);
    }

    // Every id on the board has a best row, and nobody else does.
    for entry in &board.entries {
        assert!(best.contains_key(&entry.player1.id));
        assert!(best.contains_key(&entry.player2.id));
    }
}

#[test]
fn shared_interests_are_the_sorted_intersection() {
    let engine = engine_with(EngineOptions::default().with_min_score(0.0));
    let board = engine.leaderboard();
    let pair = board
        .entries
        .iter()
        .find(|e| e.player1.id == "U001" && e.player2.id == "U002")
        .expect("U001/U002 should be on the board");
    assert_eq!(pair.shared_interests, vec!["music"]);
}
