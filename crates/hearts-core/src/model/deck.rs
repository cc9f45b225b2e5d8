use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.cards.shuffle(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// Seeded decks are reproducible; unseeded ones draw from an OS-seeded CSPRNG.
    pub fn shuffled_from(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::shuffled_with_seed(seed),
            None => Self::shuffled(&mut StdRng::from_entropy()),
        }
    }

    /// Accepts an externally ordered deck if it holds every card exactly once.
    pub fn from_cards(cards: Vec<Card>) -> Option<Self> {
        let mut seen = [false; 52];
        if cards.len() != 52 {
            return None;
        }
        for card in &cards {
            if std::mem::replace(&mut seen[card.index()], true) {
                return None;
            }
        }
        Some(Self { cards })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

#[cfg(test)]
mod tests {
    use super::Deck;
    use crate::model::card::Card;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_52_unique_cards() {
        let deck = Deck::standard();
        let unique: HashSet<Card> = deck.cards().iter().copied().collect();
        assert_eq!(deck.cards().len(), 52);
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(42);
        let deck_b = Deck::shuffled_from(Some(42));
        assert_eq!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn shuffle_with_different_seeds_differs() {
        let deck_a = Deck::shuffled_with_seed(1);
        let deck_b = Deck::shuffled_with_seed(2);
        assert_ne!(deck_a.cards(), deck_b.cards());
    }

    #[test]
    fn from_cards_rejects_duplicates() {
        let mut cards = Deck::standard().cards().to_vec();
        assert!(Deck::from_cards(cards.clone()).is_some());
        cards[1] = cards[0];
        assert!(Deck::from_cards(cards).is_none());
    }
}
