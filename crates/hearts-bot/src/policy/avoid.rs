use super::{Policy, PolicyContext, best_legal, log_pass_decision, log_play_decision, top_three};
use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;
use hearts_core::model::rank::Rank;
use hearts_core::model::suit::Suit;

/// Spades above the queen are dangerous while the queen is still out.
fn is_dangerous_spade(card: Card) -> bool {
    card.suit == Suit::Spades && card.rank >= Rank::Queen
}

/// Avoids taking points: ducks under the current winner, dumps hearts and
/// high spades when void, and leads low from safe suits.
pub(crate) fn avoidance_score(ctx: &PolicyContext, card: Card) -> i32 {
    let rank = card.rank.value() as i32;

    if ctx.is_leading() {
        let mut score = -rank;
        if card.suit.is_heart() {
            score -= 50;
        }
        if is_dangerous_spade(card) && ctx.queen_of_spades_out() {
            score -= 40;
        }
        if card.is_queen_of_spades() {
            score -= 60;
        }
        return score;
    }

    if ctx.is_discarding() {
        return if card.is_queen_of_spades() {
            300
        } else if card.suit.is_heart() {
            200 + rank
        } else if is_dangerous_spade(card) && ctx.queen_of_spades_out() {
            150 + rank
        } else {
            rank
        };
    }

    if !ctx.would_win(card) {
        return 200 + rank;
    }
    if ctx.is_last_to_play() && ctx.trick_points() == 0 && !card.is_queen_of_spades() {
        return 100 + rank;
    }
    -rank - if card.is_queen_of_spades() { 13 } else { 0 }
}

pub(crate) fn avoidance_pass_score(hand: &Hand, card: Card) -> i32 {
    let rank = card.rank.value() as i32;
    let spades = hand.count_suit(Suit::Spades) as i32;
    if card.is_queen_of_spades() {
        return if spades >= 5 { 20 } else { 100 };
    }
    if is_dangerous_spade(card) {
        return if spades >= 5 { 10 } else { 80 + rank };
    }
    if card.suit.is_heart() {
        return 40 + rank;
    }
    if card.rank >= Rank::King { 20 + rank } else { rank }
}

#[derive(Debug, Default)]
pub struct SuitAvoidancePolicy;

impl SuitAvoidancePolicy {
    pub const ID: &'static str = "suit_avoidance";
}

impl Policy for SuitAvoidancePolicy {
    fn name(&self) -> &'static str {
        Self::ID
    }

    fn choose_pass(&mut self, ctx: &PolicyContext) -> Option<[Card; 3]> {
        let selection = top_three(ctx.hand, |card| avoidance_pass_score(ctx.hand, card))?;
        log_pass_decision(ctx, Self::ID, &selection);
        Some(selection)
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Card> {
        let chosen = best_legal(&ctx.legal, |card| avoidance_score(ctx, card))?;
        let reason = if ctx.is_leading() {
            "lead_low"
        } else if ctx.is_discarding() {
            "dump"
        } else if ctx.would_win(chosen) {
            "forced_win"
        } else {
            "duck"
        };
        log_play_decision(ctx, Self::ID, chosen, reason);
        Some(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::SuitAvoidancePolicy;
    use crate::policy::testing::{crafted_game, crafted_passing_game};
    use crate::policy::{Policy, PolicyContext};
    use hearts_core::model::card::Card;
    use hearts_core::model::player::Seat;
    use hearts_core::model::score::ScoreBoard;

    fn code(c: &str) -> Card {
        Card::from_code(c).unwrap()
    }

    #[test]
    fn ducks_under_current_winner() {
        let mut game = crafted_game();
        game.play_card(Seat::North, Card::TWO_OF_CLUBS).unwrap();
        game.play_card(Seat::East, code("JD")).unwrap();
        game.play_card(Seat::South, code("8C")).unwrap();
        let scores = ScoreBoard::new();
        let ctx = PolicyContext::from_game(&game, Seat::West, &scores);
        // West cannot get under the eight; last to a pointless trick, it sheds its top club.
        assert_eq!(SuitAvoidancePolicy.choose_play(&ctx), Some(code("AC")));
    }

    #[test]
    fn follower_plays_highest_card_that_loses() {
        let mut game = crafted_game();
        game.play_card(Seat::North, Card::TWO_OF_CLUBS).unwrap();
        game.play_card(Seat::East, code("JD")).unwrap();
        game.play_card(Seat::South, code("6C")).unwrap();
        game.play_card(Seat::West, code("9C")).unwrap();
        // West leads trick two with a club; North must follow under it.
        game.play_card(Seat::West, code("QC")).unwrap();
        let scores = ScoreBoard::new();
        let ctx = PolicyContext::from_game(&game, Seat::North, &scores);
        assert_eq!(SuitAvoidancePolicy.choose_play(&ctx), Some(code("5C")));
    }

    #[test]
    fn passes_queen_and_high_spades_when_short() {
        let game = crafted_passing_game();
        let scores = ScoreBoard::new();
        let ctx = PolicyContext::from_game(&game, Seat::South, &scores);
        let pass = SuitAvoidancePolicy.choose_pass(&ctx).unwrap();
        assert_eq!(pass[0], Card::QUEEN_OF_SPADES);
        assert!(pass.contains(&code("AH")));
    }
}
