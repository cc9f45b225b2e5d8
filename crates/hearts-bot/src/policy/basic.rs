use super::{Policy, PolicyContext, log_pass_decision, log_play_decision};
use hearts_core::model::card::Card;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// First legal card; passes the first three cards in hand order.
#[derive(Debug, Default)]
pub struct LeftmostPolicy;

impl LeftmostPolicy {
    pub const ID: &'static str = "leftmost";
}

impl Policy for LeftmostPolicy {
    fn name(&self) -> &'static str {
        Self::ID
    }

    fn choose_pass(&mut self, ctx: &PolicyContext) -> Option<[Card; 3]> {
        let selection = match ctx.hand.cards() {
            [a, b, c, ..] => [*a, *b, *c],
            _ => return None,
        };
        log_pass_decision(ctx, Self::ID, &selection);
        Some(selection)
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Card> {
        let chosen = ctx.legal.first().copied()?;
        log_play_decision(ctx, Self::ID, chosen, "first_legal");
        Some(chosen)
    }
}

/// Uniform choice among legal cards. Seeded instances replay identically.
#[derive(Debug)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub const ID: &'static str = "random";

    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &'static str {
        Self::ID
    }

    fn choose_pass(&mut self, ctx: &PolicyContext) -> Option<[Card; 3]> {
        let picked: Vec<Card> = ctx
            .hand
            .cards()
            .choose_multiple(&mut self.rng, 3)
            .copied()
            .collect();
        let selection = match picked.as_slice() {
            [a, b, c] => [*a, *b, *c],
            _ => return None,
        };
        log_pass_decision(ctx, Self::ID, &selection);
        Some(selection)
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Card> {
        let chosen = ctx.legal.choose(&mut self.rng).copied()?;
        log_play_decision(ctx, Self::ID, chosen, "uniform");
        Some(chosen)
    }
}
