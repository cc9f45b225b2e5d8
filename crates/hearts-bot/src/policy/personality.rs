use super::avoid::{avoidance_pass_score, avoidance_score};
use super::discard::dump_priority;
use super::void::{shortness, void_score};
use super::{Policy, PolicyContext, best_legal, log_pass_decision, log_play_decision, top_three};
use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;
use hearts_core::model::rank::Rank;
use hearts_core::model::suit::Suit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Cautious,
    MoonShooter,
    LeaderHunter,
}

/// Multipliers applied to each heuristic's score for a candidate card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weights {
    pub avoid: i32,
    pub shed: i32,
    pub void: i32,
    pub moon: i32,
    pub hunt: i32,
}

impl Weights {
    pub const CAUTIOUS: Weights = Weights {
        avoid: 3,
        shed: 1,
        void: 1,
        moon: 0,
        hunt: 0,
    };

    pub const SHOOTING: Weights = Weights {
        avoid: 0,
        shed: 0,
        void: 1,
        moon: 4,
        hunt: 0,
    };

    pub const HUNTING: Weights = Weights {
        avoid: 2,
        shed: 1,
        void: 0,
        moon: 0,
        hunt: 3,
    };
}

/// Whether the hand is strong enough to try for all 26 points.
fn moon_viable(hand: &Hand, my_score: u32) -> bool {
    if my_score >= 70 {
        return false;
    }
    let hearts = hand.count_suit(Suit::Hearts);
    let high_hearts = hand
        .iter()
        .filter(|card| card.suit.is_heart() && card.rank >= Rank::Ten)
        .count();
    let high_cards = hand.iter().filter(|card| card.rank >= Rank::Queen).count();
    (hearts >= 6 && high_hearts >= 3) || high_cards >= 7
}

fn moon_score(ctx: &PolicyContext, card: Card) -> i32 {
    let rank = card.rank.value() as i32;
    if ctx.is_leading() {
        return rank * 5;
    }
    if ctx.would_win(card) {
        100 + ctx.trick_points() as i32 * 10 + rank
    } else {
        -rank
    }
}

/// Rewards dumping points on a trick the match leader is currently winning.
fn hunt_score(ctx: &PolicyContext, card: Card) -> i32 {
    let Some((winner, _)) = ctx.current_winner() else {
        return 0;
    };
    let target = ctx.match_leader();
    if Some(winner) == target && !ctx.would_win(card) {
        card.penalty_value() as i32 * 20
    } else {
        0
    }
}

/// Blends the basic heuristics with per-style weights. The moon shooter only
/// commits when its hand supports it and drops back to caution once anyone
/// else takes a point.
#[derive(Debug)]
pub struct PersonalityPolicy {
    style: Style,
    id: &'static str,
}

impl PersonalityPolicy {
    pub const CAUTIOUS_ID: &'static str = "cautious";
    pub const MOON_SHOOTER_ID: &'static str = "moon_shooter";
    pub const LEADER_HUNTER_ID: &'static str = "leader_hunter";

    pub fn new(style: Style) -> Self {
        let id = match style {
            Style::Cautious => Self::CAUTIOUS_ID,
            Style::MoonShooter => Self::MOON_SHOOTER_ID,
            Style::LeaderHunter => Self::LEADER_HUNTER_ID,
        };
        Self { style, id }
    }

    pub fn style(&self) -> Style {
        self.style
    }

    fn shooting(&self, ctx: &PolicyContext) -> bool {
        self.style == Style::MoonShooter
            && !ctx.others_took_points()
            && moon_viable(ctx.hand, ctx.scores.score(ctx.seat))
    }

    pub fn weights(&self, ctx: &PolicyContext) -> Weights {
        match self.style {
            Style::Cautious => Weights::CAUTIOUS,
            Style::MoonShooter if self.shooting(ctx) => Weights::SHOOTING,
            Style::MoonShooter => Weights::CAUTIOUS,
            Style::LeaderHunter => Weights::HUNTING,
        }
    }

    fn score(weights: Weights, ctx: &PolicyContext, card: Card) -> i32 {
        let shed = if ctx.is_leading() {
            0
        } else {
            dump_priority(card).unwrap_or(0)
        };
        weights.avoid * avoidance_score(ctx, card)
            + weights.shed * shed
            + weights.void * void_score(ctx, card)
            + weights.moon * moon_score(ctx, card)
            + weights.hunt * hunt_score(ctx, card)
    }

    fn pass_score(&self, ctx: &PolicyContext, card: Card) -> i32 {
        let rank = card.rank.value() as i32;
        match self.style {
            Style::MoonShooter if self.shooting(ctx) => {
                if card.suit.is_heart() || card.rank >= Rank::Queen {
                    -100 + rank
                } else {
                    (14 - rank) + shortness(ctx.hand, card) / 10
                }
            }
            Style::LeaderHunter => {
                let bonus = if ctx.match_leader() == Some(ctx.pass_target) {
                    card.penalty_value() as i32 * 5
                } else {
                    0
                };
                avoidance_pass_score(ctx.hand, card) + bonus
            }
            _ => avoidance_pass_score(ctx.hand, card),
        }
    }
}

impl Policy for PersonalityPolicy {
    fn name(&self) -> &'static str {
        self.id
    }

    fn choose_pass(&mut self, ctx: &PolicyContext) -> Option<[Card; 3]> {
        let selection = top_three(ctx.hand, |card| self.pass_score(ctx, card))?;
        log_pass_decision(ctx, self.id, &selection);
        Some(selection)
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Card> {
        let weights = self.weights(ctx);
        let chosen = best_legal(&ctx.legal, |card| Self::score(weights, ctx, card))?;
        let reason = if weights == Weights::SHOOTING {
            "shooting"
        } else if weights == Weights::HUNTING {
            "hunting"
        } else {
            "cautious"
        };
        log_play_decision(ctx, self.id, chosen, reason);
        Some(chosen)
    }
}
