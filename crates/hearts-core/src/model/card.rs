use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Stride between suits in [`Card::order_key`]; larger than any rank value.
pub const SUIT_STRIDE: u8 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card format: {0:?}")]
pub struct InvalidCardFormat(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const TWO_OF_CLUBS: Card = Card::new(Rank::Two, Suit::Clubs);
    pub const QUEEN_OF_SPADES: Card = Card::new(Rank::Queen, Suit::Spades);

    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Decodes a two-character code such as `QS` or `0H` (ten of hearts).
    pub fn from_code(code: &str) -> Result<Self, InvalidCardFormat> {
        let mut chars = code.chars();
        let (Some(rank), Some(suit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(InvalidCardFormat(code.to_string()));
        };
        match (Rank::from_symbol(rank), Suit::from_symbol(suit)) {
            (Some(rank), Some(suit)) => Ok(Card::new(rank, suit)),
            _ => Err(InvalidCardFormat(code.to_string())),
        }
    }

    pub fn code(self) -> String {
        let mut code = String::with_capacity(2);
        code.push(self.rank.symbol());
        code.push(self.suit.symbol());
        code
    }

    /// Display ordering only; trick resolution compares ranks within the led suit.
    pub const fn order_key(self) -> u8 {
        self.rank.value() + SUIT_STRIDE * self.suit as u8
    }

    /// Dense index in `0..52`, suit-major.
    pub const fn index(self) -> usize {
        self.suit as usize * 13 + (self.rank.value() as usize - 2)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        let suit = Suit::from_index(index / 13)?;
        let rank = Rank::from_value((index % 13) as u8 + 2)?;
        Some(Card::new(rank, suit))
    }

    pub const fn is_penalty(self) -> bool {
        matches!(self.suit, Suit::Hearts) || self.is_queen_of_spades()
    }

    pub const fn is_queen_of_spades(self) -> bool {
        matches!(self.rank, Rank::Queen) && matches!(self.suit, Suit::Spades)
    }

    pub fn penalty_value(self) -> u8 {
        if self.is_queen_of_spades() {
            13
        } else if self.suit == Suit::Hearts {
            1
        } else {
            0
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = InvalidCardFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Card::from_code(s)
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.code()
    }
}

impl TryFrom<String> for Card {
    type Error = InvalidCardFormat;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Card::from_code(&value)
    }
}

/// Parses `2C,QS,0H`. Whitespace, empty items and leading/trailing commas are rejected.
pub fn parse_card_list(list: &str) -> Result<Vec<Card>, InvalidCardFormat> {
    if list.is_empty() {
        return Err(InvalidCardFormat(list.to_string()));
    }
    list.split(',').map(Card::from_code).collect()
}

pub fn format_card_list(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| card.code())
        .collect::<Vec<_>>()
        .join(",")
}
