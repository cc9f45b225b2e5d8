use crate::error::DealingError;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::model::player::Seat;
use std::array;

/// Where a game's deck comes from. Implementations may be remote and fail;
/// the game then waits for the caller to retry.
pub trait DeckSource: Send + Sync {
    fn acquire(&self, seed: Option<u64>) -> Result<Deck, DealingError>;

    fn name(&self) -> &'static str {
        "custom"
    }
}

/// In-process Fisher-Yates shuffle.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalShuffle;

impl DeckSource for LocalShuffle {
    fn acquire(&self, seed: Option<u64>) -> Result<Deck, DealingError> {
        Ok(Deck::shuffled_from(seed))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

const GAME_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Per-game seed derived from the match seed; unseeded matches stay unseeded.
pub fn derive_game_seed(match_seed: Option<u64>, game_number: u32) -> Option<u64> {
    match_seed.map(|seed| seed ^ (game_number as u64).wrapping_mul(GAME_SEED_MIX))
}

/// Card `i` goes to seat `i mod 4`.
pub fn deal_hands(deck: &Deck) -> [Hand; 4] {
    let mut hands: [Hand; 4] = array::from_fn(|_| Hand::new());
    for (index, card) in deck.cards().iter().enumerate() {
        hands[index % 4].add(*card);
    }
    hands
}

pub fn two_of_clubs_holder(hands: &[Hand; 4]) -> Option<Seat> {
    Seat::LOOP
        .iter()
        .copied()
        .find(|seat| hands[seat.index()].contains(crate::model::card::Card::TWO_OF_CLUBS))
}
