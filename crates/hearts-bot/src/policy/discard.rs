use super::{Policy, PolicyContext, best_legal, log_pass_decision, log_play_decision, top_three};
use hearts_core::model::card::Card;
use hearts_core::model::rank::Rank;
use hearts_core::model::suit::Suit;

/// Cards shed first, most dangerous first.
pub const DUMP_ORDER: [Card; 16] = [
    Card::QUEEN_OF_SPADES,
    Card::new(Rank::Ace, Suit::Spades),
    Card::new(Rank::King, Suit::Spades),
    Card::new(Rank::Ace, Suit::Hearts),
    Card::new(Rank::King, Suit::Hearts),
    Card::new(Rank::Queen, Suit::Hearts),
    Card::new(Rank::Jack, Suit::Hearts),
    Card::new(Rank::Ten, Suit::Hearts),
    Card::new(Rank::Nine, Suit::Hearts),
    Card::new(Rank::Eight, Suit::Hearts),
    Card::new(Rank::Seven, Suit::Hearts),
    Card::new(Rank::Six, Suit::Hearts),
    Card::new(Rank::Five, Suit::Hearts),
    Card::new(Rank::Four, Suit::Hearts),
    Card::new(Rank::Three, Suit::Hearts),
    Card::new(Rank::Two, Suit::Hearts),
];

/// Score on the dump list, or `None` for cards not on it.
pub(crate) fn dump_priority(card: Card) -> Option<i32> {
    DUMP_ORDER
        .iter()
        .position(|candidate| *candidate == card)
        .map(|index| 100 - index as i32)
}

/// Sheds cards in [`DUMP_ORDER`] whenever one is legal; otherwise plays low.
#[derive(Debug, Default)]
pub struct DiscardPriorityPolicy;

impl DiscardPriorityPolicy {
    pub const ID: &'static str = "discard_priority";
}

impl Policy for DiscardPriorityPolicy {
    fn name(&self) -> &'static str {
        Self::ID
    }

    fn choose_pass(&mut self, ctx: &PolicyContext) -> Option<[Card; 3]> {
        let selection = top_three(ctx.hand, |card| {
            dump_priority(card).unwrap_or_else(|| card.rank.value() as i32)
        })?;
        log_pass_decision(ctx, Self::ID, &selection);
        Some(selection)
    }

    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Card> {
        let leading = ctx.is_leading();
        let chosen = best_legal(&ctx.legal, |card| match dump_priority(card) {
            Some(priority) if !leading => priority,
            _ => -(card.rank.value() as i32),
        })?;
        let reason = if !leading && dump_priority(chosen).is_some() {
            "dump"
        } else {
            "low"
        };
        log_play_decision(ctx, Self::ID, chosen, reason);
        Some(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::{DiscardPriorityPolicy, dump_priority};
    use crate::policy::testing::{crafted_game, crafted_passing_game};
    use crate::policy::{Policy, PolicyContext};
    use hearts_core::model::card::Card;
    use hearts_core::model::player::Seat;
    use hearts_core::model::score::ScoreBoard;

    fn code(c: &str) -> Card {
        Card::from_code(c).unwrap()
    }

    #[test]
    fn queen_outranks_everything_on_the_list() {
        assert!(dump_priority(Card::QUEEN_OF_SPADES) > dump_priority(code("AS")));
        assert!(dump_priority(code("AH")) > dump_priority(code("2H")));
        assert_eq!(dump_priority(code("AC")), None);
    }

    #[test]
    fn passes_queen_and_top_hearts() {
        let game = crafted_passing_game();
        let scores = ScoreBoard::new();
        let ctx = PolicyContext::from_game(&game, Seat::South, &scores);
        let pass = DiscardPriorityPolicy.choose_pass(&ctx).unwrap();
        assert_eq!(pass, [Card::QUEEN_OF_SPADES, code("AH"), code("KH")]);
    }

    #[test]
    fn void_follower_dumps_high_spade_after_first_trick() {
        let mut game = crafted_game();
        for (seat, card) in [
            (Seat::North, "2C"),
            (Seat::East, "2S"),
            (Seat::South, "6C"),
            (Seat::West, "AC"),
            (Seat::West, "9C"),
            (Seat::North, "3C"),
        ] {
            game.play_card(seat, code(card)).unwrap();
        }
        let scores = ScoreBoard::new();
        let ctx = PolicyContext::from_game(&game, Seat::East, &scores);
        assert!(ctx.is_discarding());
        let chosen = DiscardPriorityPolicy.choose_play(&ctx).unwrap();
        assert_eq!(chosen, code("6H"));
        assert!(ctx.legal.contains(&chosen));
    }
}
