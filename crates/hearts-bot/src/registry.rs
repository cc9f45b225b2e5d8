//! Static table of strategies, looked up by the id stored on an AI player.
//!
//! The set is closed: ids are stable wire values and the table never changes
//! at runtime. Unknown ids resolve to [`FALLBACK_STRATEGY`].

use crate::policy::{
    DiscardPriorityPolicy, LeftmostPolicy, PersonalityPolicy, Policy, RandomPolicy, Style,
    SuitAvoidancePolicy, VoidShortestPolicy,
};
use tracing::{Level, event};

pub const FALLBACK_STRATEGY: &str = RandomPolicy::ID;

pub struct StrategyFactory {
    pub id: &'static str,
    pub description: &'static str,
    pub make: fn(seed: Option<u64>) -> Box<dyn Policy>,
}

static STRATEGIES: &[StrategyFactory] = &[
    StrategyFactory {
        id: LeftmostPolicy::ID,
        description: "first legal card",
        make: make_leftmost,
    },
    StrategyFactory {
        id: RandomPolicy::ID,
        description: "uniform random legal card",
        make: make_random,
    },
    StrategyFactory {
        id: DiscardPriorityPolicy::ID,
        description: "sheds the queen, high spades and high hearts first",
        make: make_discard_priority,
    },
    StrategyFactory {
        id: SuitAvoidancePolicy::ID,
        description: "ducks tricks and avoids hearts and dangerous spades",
        make: make_suit_avoidance,
    },
    StrategyFactory {
        id: VoidShortestPolicy::ID,
        description: "empties the shortest side suit",
        make: make_void_shortest,
    },
    StrategyFactory {
        id: PersonalityPolicy::CAUTIOUS_ID,
        description: "avoidance-weighted blend",
        make: make_cautious,
    },
    StrategyFactory {
        id: PersonalityPolicy::MOON_SHOOTER_ID,
        description: "tries for all 26 points with a strong hand",
        make: make_moon_shooter,
    },
    StrategyFactory {
        id: PersonalityPolicy::LEADER_HUNTER_ID,
        description: "feeds points to the match leader",
        make: make_leader_hunter,
    },
];

pub fn registered_strategies() -> &'static [StrategyFactory] {
    STRATEGIES
}

pub fn by_id(id: &str) -> Option<&'static StrategyFactory> {
    registered_strategies().iter().find(|factory| factory.id == id)
}

/// Builds the policy for `id`, falling back to the random policy.
pub fn make_policy(id: &str, seed: Option<u64>) -> Box<dyn Policy> {
    let factory = match by_id(id) {
        Some(factory) => factory,
        None => {
            event!(
                target: "hearts_bot::registry",
                Level::WARN,
                strategy = id,
                fallback = FALLBACK_STRATEGY,
                "unknown strategy id"
            );
            // The fallback id is part of the static table.
            match by_id(FALLBACK_STRATEGY) {
                Some(factory) => factory,
                None => return Box::new(RandomPolicy::new(seed)),
            }
        }
    };
    (factory.make)(seed)
}

fn make_leftmost(_seed: Option<u64>) -> Box<dyn Policy> {
    Box::new(LeftmostPolicy)
}

fn make_random(seed: Option<u64>) -> Box<dyn Policy> {
    Box::new(RandomPolicy::new(seed))
}

fn make_discard_priority(_seed: Option<u64>) -> Box<dyn Policy> {
    Box::new(DiscardPriorityPolicy)
}

fn make_suit_avoidance(_seed: Option<u64>) -> Box<dyn Policy> {
    Box::new(SuitAvoidancePolicy)
}

fn make_void_shortest(_seed: Option<u64>) -> Box<dyn Policy> {
    Box::new(VoidShortestPolicy)
}

fn make_cautious(_seed: Option<u64>) -> Box<dyn Policy> {
    Box::new(PersonalityPolicy::new(Style::Cautious))
}

fn make_moon_shooter(_seed: Option<u64>) -> Box<dyn Policy> {
    Box::new(PersonalityPolicy::new(Style::MoonShooter))
}

fn make_leader_hunter(_seed: Option<u64>) -> Box<dyn Policy> {
    Box::new(PersonalityPolicy::new(Style::LeaderHunter))
}
