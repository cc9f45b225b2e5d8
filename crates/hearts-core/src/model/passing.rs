use crate::error::PassRejection;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::Seat;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const PASS_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassingDirection {
    Left,
    Right,
    Across,
    Hold,
}

impl PassingDirection {
    pub const CYCLE: [PassingDirection; 4] = [
        PassingDirection::Left,
        PassingDirection::Right,
        PassingDirection::Across,
        PassingDirection::Hold,
    ];

    /// Games are numbered from 1; every fourth game is played without passing.
    pub const fn for_game(game_number: u32) -> PassingDirection {
        match game_number % 4 {
            1 => PassingDirection::Left,
            2 => PassingDirection::Right,
            3 => PassingDirection::Across,
            _ => PassingDirection::Hold,
        }
    }

    pub const fn requires_selection(self) -> bool {
        !matches!(self, PassingDirection::Hold)
    }

    pub const fn target(self, seat: Seat) -> Seat {
        match self {
            PassingDirection::Left => seat.next(),
            PassingDirection::Right => seat.previous(),
            PassingDirection::Across => seat.opposite(),
            PassingDirection::Hold => seat,
        }
    }

    /// Inverse of [`PassingDirection::target`].
    pub const fn source(self, seat: Seat) -> Seat {
        match self {
            PassingDirection::Left => seat.previous(),
            PassingDirection::Right => seat.next(),
            PassingDirection::Across => seat.opposite(),
            PassingDirection::Hold => seat,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PassingDirection::Left => "Left",
            PassingDirection::Right => "Right",
            PassingDirection::Across => "Across",
            PassingDirection::Hold => "Hold",
        }
    }
}

impl FromStr for PassingDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "left" => Ok(PassingDirection::Left),
            "right" => Ok(PassingDirection::Right),
            "across" => Ok(PassingDirection::Across),
            "hold" | "none" => Ok(PassingDirection::Hold),
            other => Err(format!("unknown passing direction '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassedCard {
    pub game_number: u32,
    pub from: Seat,
    pub to: Seat,
    pub card: Card,
}

/// Pending submissions for one game. Submitted cards leave the passer's hand
/// immediately and are delivered together once all four seats have passed.
#[derive(Debug, Clone)]
pub struct PassingState {
    game_number: u32,
    direction: PassingDirection,
    records: Vec<PassedCard>,
}

impl PassingState {
    pub fn new(game_number: u32) -> Self {
        Self {
            game_number,
            direction: PassingDirection::for_game(game_number),
            records: Vec::with_capacity(PASS_SIZE * 4),
        }
    }

    pub fn direction(&self) -> PassingDirection {
        self.direction
    }

    pub fn records(&self) -> &[PassedCard] {
        &self.records
    }

    pub fn has_passed(&self, seat: Seat) -> bool {
        self.records.iter().any(|record| record.from == seat)
    }

    pub fn passed_by(&self, seat: Seat) -> Vec<Card> {
        self.records
            .iter()
            .filter(|record| record.from == seat)
            .map(|record| record.card)
            .collect()
    }

    /// Checks a submission without touching any state.
    pub fn validate(&self, seat: Seat, cards: &[Card], hand: &Hand) -> Result<(), PassRejection> {
        if !self.direction.requires_selection() {
            return Err(PassRejection::NoPassingThisGame);
        }
        if self.has_passed(seat) {
            return Err(PassRejection::AlreadyPassed(seat));
        }
        if cards.len() != PASS_SIZE {
            return Err(PassRejection::WrongCount(cards.len()));
        }
        for (i, card) in cards.iter().enumerate() {
            if cards[..i].contains(card) {
                return Err(PassRejection::Duplicate(*card));
            }
            if !hand.contains(*card) {
                return Err(PassRejection::NotInHand(*card));
            }
        }
        Ok(())
    }

    pub fn submit(&mut self, seat: Seat, cards: &[Card], hand: &mut Hand) -> Result<(), PassRejection> {
        self.validate(seat, cards, hand)?;
        let to = self.direction.target(seat);
        for card in cards.iter().copied() {
            hand.remove(card);
            self.records.push(PassedCard {
                game_number: self.game_number,
                from: seat,
                to,
                card,
            });
        }
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.records.len() == PASS_SIZE * 4
    }

    /// Delivers every pending card to its receiver and returns the records.
    pub fn deliver(&self, hands: &mut [Hand; 4]) -> &[PassedCard] {
        for record in &self.records {
            hands[record.to.index()].add(record.card);
        }
        &self.records
    }
}
