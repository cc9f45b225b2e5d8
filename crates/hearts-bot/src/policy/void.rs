use super::{Policy, PolicyContext, best_legal, log_pass_decision, log_play_decision, top_three};
use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;

/// Larger for cards in shorter side suits; hearts never count as a side suit.
pub(crate) fn shortness(hand: &Hand, card: Card) -> i32 {
    if card.suit.is_heart() {
        return 0;
    }
    (13 - hand.count_suit(card.suit) as i32) * 20
}

pub(crate) fn void_score(ctx: &PolicyContext, card: Card) -> i32 {
    let rank = card.rank.value() as i32;
    if ctx.is_leading() {
        if card.suit.is_heart() {
            return -100 - rank;
        }
        return shortness(ctx.hand, card) - rank;
    }
    if ctx.is_discarding() {
        let queen = if card.is_queen_of_spades() { 100 } else { 0 };
        return shortness(ctx.hand, card) + rank + queen;
    }
    -rank
}

/// Empties the shortest side suit first so later tricks can be discarded on.
#[derive(Debug, Default)]
pub struct VoidShortestPolicy;

impl VoidShortestPolicy {
    pub const ID: &'static str = "void_shortest";
}

impl Policy for VoidShortestPolicy {
    fn name(&self) -> &'static str {
        Self::ID
    }

    fn choose_pass(&mut self, ctx: &PolicyContext) -> Option<[Card; 3]> {
        let selection = top_three(ctx.hand, |card| {
            shortness(ctx.hand, card) + card.rank.value() as i32
        })?;
        log_pass_decision(ctx, Self::ID, &selection);
        Some(selection)
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Card> {
        let chosen = best_legal(&ctx.legal, |card| void_score(ctx, card))?;
        let reason = if ctx.is_leading() {
            "lead_short"
        } else if ctx.is_discarding() {
            "dump_short"
        } else {
            "follow_low"
        };
        log_play_decision(ctx, Self::ID, chosen, reason);
        Some(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::VoidShortestPolicy;
    use crate::policy::testing::{crafted_game, crafted_passing_game};
    use crate::policy::{Policy, PolicyContext};
    use hearts_core::model::card::Card;
    use hearts_core::model::player::Seat;
    use hearts_core::model::score::ScoreBoard;

    fn code(c: &str) -> Card {
        Card::from_code(c).unwrap()
    }

    #[test]
    fn passes_the_shortest_side_suit() {
        let game = crafted_passing_game();
        let scores = ScoreBoard::new();
        // South: three clubs, two spades, eight hearts.
        let ctx = PolicyContext::from_game(&game, Seat::South, &scores);
        let pass = VoidShortestPolicy.choose_pass(&ctx).unwrap();
        assert!(pass.contains(&Card::QUEEN_OF_SPADES));
        assert!(pass.contains(&code("6S")));
        assert!(pass.contains(&code("8C")));
    }

    #[test]
    fn leads_from_the_shortest_suit_after_first_trick() {
        let mut game = crafted_game();
        game.play_card(Seat::North, Card::TWO_OF_CLUBS).unwrap();
        game.play_card(Seat::East, code("JD")).unwrap();
        game.play_card(Seat::South, code("6C")).unwrap();
        game.play_card(Seat::West, code("AC")).unwrap();
        let scores = ScoreBoard::new();
        // West: five clubs left against seven spades.
        let ctx = PolicyContext::from_game(&game, Seat::West, &scores);
        assert_eq!(VoidShortestPolicy.choose_play(&ctx), Some(code("9C")));
    }
}
