use crate::model::card::Card;
use crate::model::player::Seat;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrickPhase {
    Ready,
    Running,
    JustCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    number: u8,
    leader: Seat,
    plays: Vec<Play>,
}

impl Trick {
    pub fn new(number: u8, leader: Seat) -> Self {
        Self {
            number,
            leader,
            plays: Vec::with_capacity(4),
        }
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn leader(&self) -> Seat {
        self.leader
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn phase(&self) -> TrickPhase {
        match self.plays.len() {
            0 => TrickPhase::Ready,
            4 => TrickPhase::JustCompleted,
            _ => TrickPhase::Running,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == 4
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|play| play.card.suit)
    }

    /// `[leader, leader+1, leader+2, leader+3]`.
    pub fn order(&self) -> [Seat; 4] {
        [0, 1, 2, 3].map(|offset| self.leader.offset(offset))
    }

    /// Seat expected to play next, `None` once all four have played.
    pub fn expected_seat(&self) -> Option<Seat> {
        self.order().get(self.plays.len()).copied()
    }

    /// Records a play. Turn and legality checks happen in the game before this is called.
    pub(crate) fn push(&mut self, seat: Seat, card: Card) -> u8 {
        self.plays.push(Play { seat, card });
        self.plays.len() as u8
    }

    /// Highest card of the led suit; other suits never win.
    pub fn winner(&self) -> Option<Seat> {
        if !self.is_complete() {
            return None;
        }
        let lead_suit = self.lead_suit()?;
        self.plays
            .iter()
            .filter(|play| play.card.suit == lead_suit)
            .max_by_key(|play| play.card.rank)
            .map(|play| play.seat)
    }

    pub fn points(&self) -> u8 {
        self.plays.iter().map(|play| play.card.penalty_value()).sum()
    }

    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.plays.iter().map(|play| play.card)
    }
}
