mod avoid;
mod basic;
mod discard;
mod personality;
mod void;

pub use avoid::SuitAvoidancePolicy;
pub use basic::{LeftmostPolicy, RandomPolicy};
pub use discard::DiscardPriorityPolicy;
pub use personality::{PersonalityPolicy, Style, Weights};
pub use void::VoidShortestPolicy;

use hearts_core::Game;
use hearts_core::model::card::Card;
use hearts_core::model::hand::Hand;
use hearts_core::model::passing::PassingDirection;
use hearts_core::model::player::Seat;
use hearts_core::model::score::ScoreBoard;
use hearts_core::model::suit::Suit;
use hearts_core::model::trick::Trick;
use hearts_core::stats::GameStats;
use tracing::{Level, event};

/// What a seat may see when deciding. `legal` is computed by the engine, so a
/// policy that picks from it always passes validation.
pub struct PolicyContext<'a> {
    pub seat: Seat,
    pub hand: &'a Hand,
    pub legal: Vec<Card>,
    pub trick: &'a Trick,
    pub trick_number: u8,
    pub hearts_broken: bool,
    pub passing_direction: PassingDirection,
    pub pass_target: Seat,
    pub game_points: [u32; 4],
    pub scores: &'a ScoreBoard,
    pub stats: Option<&'a GameStats>,
}

impl<'a> PolicyContext<'a> {
    pub fn from_game(game: &'a Game, seat: Seat, scores: &'a ScoreBoard) -> Self {
        let direction = game.direction();
        Self {
            seat,
            hand: game.hand(seat),
            legal: game.legal_plays(seat),
            trick: game.current_trick(),
            trick_number: game.trick_number(),
            hearts_broken: game.hearts_broken(),
            passing_direction: direction,
            pass_target: direction.target(seat),
            game_points: game.points(),
            scores,
            stats: game.stats(),
        }
    }

    pub fn is_leading(&self) -> bool {
        self.trick.plays().is_empty()
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.trick.lead_suit()
    }

    pub fn is_last_to_play(&self) -> bool {
        self.trick.plays().len() == 3
    }

    /// Following with a card of another suit.
    pub fn is_discarding(&self) -> bool {
        match self.lead_suit() {
            Some(suit) => !self.hand.has_suit(suit),
            None => false,
        }
    }

    /// Seat and card currently winning the trick.
    pub fn current_winner(&self) -> Option<(Seat, Card)> {
        let lead = self.lead_suit()?;
        self.trick
            .plays()
            .iter()
            .filter(|play| play.card.suit == lead)
            .max_by_key(|play| play.card.rank)
            .map(|play| (play.seat, play.card))
    }

    /// Whether `card` would take the lead of the trick as it stands.
    pub fn would_win(&self, card: Card) -> bool {
        match self.current_winner() {
            None => true,
            Some((_, best)) => card.suit == best.suit && card.rank > best.rank,
        }
    }

    pub fn trick_points(&self) -> u32 {
        self.trick.points() as u32
    }

    /// Unplayed cards of `suit` this seat cannot see.
    pub fn unseen_in_suit(&self, suit: Suit) -> usize {
        match self.stats {
            Some(stats) => stats
                .unseen_by(self.seat)
                .into_iter()
                .filter(|card| card.suit == suit)
                .count(),
            None => 13 - self.hand.count_suit(suit),
        }
    }

    pub fn queen_of_spades_out(&self) -> bool {
        !self.hand.contains(Card::QUEEN_OF_SPADES)
            && self
                .stats
                .is_none_or(|stats| !stats.is_played(Card::QUEEN_OF_SPADES))
    }

    /// Seat with the lowest match total other than this one.
    pub fn match_leader(&self) -> Option<Seat> {
        Seat::LOOP
            .iter()
            .copied()
            .filter(|seat| *seat != self.seat)
            .min_by_key(|seat| self.scores.score(*seat))
    }

    pub fn others_took_points(&self) -> bool {
        Seat::LOOP
            .iter()
            .any(|seat| *seat != self.seat && self.game_points[seat.index()] > 0)
    }
}

/// Decision contract shared by every strategy. Implementations choose only
/// from the engine's legal set; `None` means nothing was offered.
pub trait Policy: Send {
    fn name(&self) -> &'static str;

    fn choose_pass(&mut self, ctx: &PolicyContext) -> Option<[Card; 3]>;

    fn choose_play(&mut self, ctx: &PolicyContext) -> Option<Card>;
}

/// Picks the three highest-scoring cards, breaking ties by display order.
pub(crate) fn top_three<F>(hand: &Hand, mut score: F) -> Option<[Card; 3]>
where
    F: FnMut(Card) -> i32,
{
    let mut scored: Vec<(Card, i32)> = hand.iter().map(|card| (*card, score(*card))).collect();
    scored.sort_by(|(card_a, score_a), (card_b, score_b)| {
        score_b
            .cmp(score_a)
            .then_with(|| card_b.order_key().cmp(&card_a.order_key()))
    });
    match scored.as_slice() {
        [a, b, c, ..] => Some([a.0, b.0, c.0]),
        _ => None,
    }
}

/// Highest-scoring legal card; ties go to the earlier card in hand order.
pub(crate) fn best_legal<F>(legal: &[Card], mut score: F) -> Option<Card>
where
    F: FnMut(Card) -> i32,
{
    let mut best: Option<(Card, i32)> = None;
    for card in legal.iter().copied() {
        let value = score(card);
        if best.is_none_or(|(_, top)| value > top) {
            best = Some((card, value));
        }
    }
    best.map(|(card, _)| card)
}

pub(crate) fn log_play_decision(ctx: &PolicyContext, strategy: &str, chosen: Card, reason: &str) {
    if !tracing::enabled!(target: "hearts_bot::play", Level::DEBUG) {
        return;
    }
    let legal_preview = if ctx.legal.len() <= 6 {
        ctx.legal
            .iter()
            .map(|card| card.code())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} moves", ctx.legal.len())
    };
    event!(
        target: "hearts_bot::play",
        Level::DEBUG,
        seat = ctx.seat.number(),
        strategy,
        trick = ctx.trick_number,
        legal_count = ctx.legal.len(),
        legal_moves = %legal_preview,
        chosen = %chosen,
        hearts_broken = ctx.hearts_broken,
        trick_cards = ctx.trick.plays().len(),
        reason,
    );
}

pub(crate) fn log_pass_decision(ctx: &PolicyContext, strategy: &str, selection: &[Card; 3]) {
    event!(
        target: "hearts_bot::pass",
        Level::DEBUG,
        seat = ctx.seat.number(),
        strategy,
        direction = ctx.passing_direction.as_str(),
        to = ctx.pass_target.number(),
        cards = %hearts_core::model::card::format_card_list(selection),
    );
}


#[cfg(test)]
mod tests {
    use super::testing::{crafted_game, hand};
    use super::{PolicyContext, best_legal, top_three};
    use hearts_core::model::card::Card;
    use hearts_core::model::player::Seat;
    use hearts_core::model::score::ScoreBoard;

    #[test]
    fn context_reflects_trick_state() {
        let mut game = crafted_game();
        game.play_card(Seat::North, Card::TWO_OF_CLUBS).unwrap();
        game.play_card(Seat::East, Card::from_code("JD").unwrap())
            .unwrap();
        let scores = ScoreBoard::new();
        let ctx = PolicyContext::from_game(&game, Seat::South, &scores);
        assert!(!ctx.is_leading());
        assert!(!ctx.is_discarding());
        assert_eq!(
            ctx.current_winner(),
            Some((Seat::North, Card::TWO_OF_CLUBS))
        );
        assert!(ctx.would_win(Card::from_code("6C").unwrap()));
        assert!(!ctx.would_win(Card::from_code("6S").unwrap()));
        assert_eq!(ctx.legal.len(), 3);
        assert!(!ctx.queen_of_spades_out());
    }

    #[test]
    fn top_three_prefers_highest_scores() {
        let cards = hand("2C,QS,AH,3D");
        let picks = top_three(&cards, |card| card.penalty_value() as i32).unwrap();
        assert_eq!(picks[0], Card::QUEEN_OF_SPADES);
        assert_eq!(picks[1], Card::from_code("AH").unwrap());
        assert!(top_three(&hand("2C,3C"), |_| 0).is_none());
    }

    #[test]
    fn best_legal_keeps_first_on_ties() {
        let legal = vec![
            Card::from_code("3C").unwrap(),
            Card::from_code("4C").unwrap(),
        ];
        assert_eq!(best_legal(&legal, |_| 1), Some(legal[0]));
        assert_eq!(best_legal(&[], |_| 1), None);
    }
}
