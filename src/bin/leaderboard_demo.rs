//! Demo that builds a small synthetic population and prints the leaderboard
//! plus the best-per-profile report to stdout.

use anyhow::Result;
use cupid_match::{
    BehaviorEdge, DeliveryStatus, EdgeType, EngineOptions, MatchEngine, Profile, TelemetryEvent,
    Traits,
};

fn population() -> Vec<Profile> {
    vec![
        Profile::new("U001", 28, "West US")
            .with_interests(["travel", "music", "hiking"])
            .with_traits(Traits {
                openness: 0.8,
                conscientiousness: 0.6,
                extraversion: 0.7,
                agreeableness: 0.7,
                neuroticism: 0.3,
            })
            .with_pref_age(24, 34)
            .with_sentiment(0.4)
            .with_match_stats(5, 2),
        Profile::new("U002", 30, "West US")
            .with_interests(["music", "cooking"])
            .with_traits(Traits {
                openness: 0.7,
                conscientiousness: 0.65,
                extraversion: 0.2,
                agreeableness: 0.75,
                neuroticism: 0.25,
            })
            .with_pref_age(25, 35)
            .with_sentiment(0.3)
            .with_match_stats(8, 3),
        Profile::new("U003", 27, "UK South")
            .with_interests(["travel", "photography"])
            .with_traits(Traits {
                openness: 0.9,
                conscientiousness: 0.4,
                extraversion: 0.6,
                agreeableness: 0.5,
                neuroticism: 0.5,
            })
            .with_pref_age(24, 32)
            .with_sentiment(0.1),
        Profile::new("U004", 33, "West Europe")
            .with_interests(["cooking", "hiking", "music"])
            .with_traits(Traits {
                openness: 0.5,
                conscientiousness: 0.8,
                extraversion: 0.35,
                agreeableness: 0.8,
                neuroticism: 0.2,
            })
            .with_pref_age(26, 38)
            .with_dealbreakers(["age_gap"])
            .with_sentiment(0.5),
        Profile::new("U005", 29, "West US")
            .with_interests(["gaming", "music"])
            .with_traits(Traits {
                openness: 0.6,
                conscientiousness: 0.5,
                extraversion: 0.85,
                agreeableness: 0.6,
                neuroticism: 0.4,
            })
            .with_pref_age(24, 33),
    ]
}

fn edges() -> Vec<BehaviorEdge> {
    vec![
        BehaviorEdge::new("U001", "U002", EdgeType::Liked, 0.6),
        BehaviorEdge::new("U002", "U001", EdgeType::Liked, 0.4),
        BehaviorEdge::new("U001", "U002", EdgeType::Matched, 1.0),
        BehaviorEdge::new("U003", "U004", EdgeType::SameInterest, 0.2),
        BehaviorEdge::new("U001", "U005", EdgeType::Blocked, 1.0),
    ]
}

fn telemetry() -> Vec<TelemetryEvent> {
    vec![
        TelemetryEvent::new("West US", "UK South", 140.0, 0.0, DeliveryStatus::Delivered),
        TelemetryEvent::new("UK South", "West US", 160.0, 1.0, DeliveryStatus::Retried),
        TelemetryEvent::new("West US", "West US", 60.0, 0.0, DeliveryStatus::Delivered),
    ]
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let engine = MatchEngine::new(population(), &edges(), EngineOptions::default())
        .with_telemetry(&telemetry());

    println!("-- top couples --");
    for c in engine.top_k(10) {
        println!(
            "#{:<2} {} + {}  {:>3}%  shared: {}",
            c.rank,
            c.player1.name,
            c.player2.name,
            c.score_percent(),
            if c.shared_interests.is_empty() {
                "(none)".to_string()
            } else {
                c.shared_interests.join(", ")
            }
        );
    }

    println!("-- best match per profile --");
    for (id, c) in engine.best_per_profile() {
        let partner = if c.player1.id == id {
            &c.player2
        } else {
            &c.player1
        };
        println!("{id} -> {} ({}%, {})", partner.name, c.score_percent(), partner.vibe);
    }

    let explained = engine.score_pair("U001", "U002")?;
    println!(
        "-- pair U001/U002 --\nscore {:.3}  ocean {:.2}  interests {:.2}  behavior {:.2}  age {:.2}  region {:.2}",
        explained.score,
        explained.breakdown.ocean,
        explained.breakdown.interests,
        explained.breakdown.behavior,
        explained.breakdown.age_fit,
        explained.breakdown.region,
    );

    Ok(())
}
