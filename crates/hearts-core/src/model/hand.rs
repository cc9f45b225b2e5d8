use crate::model::card::Card;
use crate::model::suit::Suit;

/// Cards a seat still holds, kept in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let mut hand = Self { cards };
        hand.sort();
        hand
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
        self.sort();
    }

    pub fn remove(&mut self, card: Card) -> bool {
        if let Some(index) = self.cards.iter().position(|&c| c == card) {
            self.cards.remove(index);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn has_suit(&self, suit: Suit) -> bool {
        self.cards.iter().any(|card| card.suit == suit)
    }

    pub fn count_suit(&self, suit: Suit) -> usize {
        self.cards.iter().filter(|card| card.suit == suit).count()
    }

    pub fn only_hearts(&self) -> bool {
        self.cards.iter().all(|card| card.suit.is_heart())
    }

    /// True when every card is worth points (hearts and the queen of spades).
    pub fn only_penalties(&self) -> bool {
        self.cards.iter().all(|card| card.is_penalty())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn sort(&mut self) {
        self.cards.sort_by_key(|card| card.order_key());
    }
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn add_and_remove_cards() {
        let mut hand = Hand::new();
        let card = Card::new(Rank::Three, Suit::Clubs);
        hand.add(card);
        assert!(hand.contains(card));
        assert!(hand.remove(card));
        assert!(!hand.contains(card));
        assert!(!hand.remove(card));
    }

    #[test]
    fn cards_are_sorted_by_order_key() {
        let mut hand = Hand::new();
        hand.add(Card::new(Rank::Two, Suit::Hearts));
        hand.add(Card::new(Rank::King, Suit::Spades));
        hand.add(Card::new(Rank::Ace, Suit::Clubs));
        hand.add(Card::new(Rank::Two, Suit::Clubs));
        let ordered: Vec<_> = hand.iter().copied().collect();
        assert_eq!(ordered[0], Card::new(Rank::Two, Suit::Clubs));
        assert_eq!(ordered[1], Card::new(Rank::Ace, Suit::Clubs));
        assert_eq!(ordered[2], Card::new(Rank::King, Suit::Spades));
        assert_eq!(ordered[3], Card::new(Rank::Two, Suit::Hearts));
    }

    #[test]
    fn penalty_only_hand_includes_queen_of_spades() {
        let hand = Hand::with_cards(vec![
            Card::QUEEN_OF_SPADES,
            Card::new(Rank::Five, Suit::Hearts),
        ]);
        assert!(hand.only_penalties());
        assert!(!hand.only_hearts());
        assert_eq!(hand.count_suit(Suit::Hearts), 1);
    }
}
