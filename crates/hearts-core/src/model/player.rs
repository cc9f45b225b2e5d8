use core::fmt;
use serde::{Deserialize, Serialize};

/// One of the four fixed table positions. Seat numbers on the wire are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Seat {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Seat {
    pub const LOOP: [Seat; 4] = [Seat::North, Seat::East, Seat::South, Seat::West];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::North),
            1 => Some(Seat::East),
            2 => Some(Seat::South),
            3 => Some(Seat::West),
            _ => None,
        }
    }

    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1..=4 => Self::from_index(number as usize - 1),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Seat `offset` places clockwise from this one.
    pub const fn offset(self, offset: usize) -> Seat {
        match Self::from_index((self.index() + offset) % 4) {
            Some(seat) => seat,
            None => self,
        }
    }

    pub const fn next(self) -> Seat {
        self.offset(1)
    }

    pub const fn previous(self) -> Seat {
        self.offset(3)
    }

    pub const fn opposite(self) -> Seat {
        self.offset(2)
    }

    pub const fn bit(self) -> u8 {
        1 << self.index()
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Seat::North => "North",
            Seat::East => "East",
            Seat::South => "South",
            Seat::West => "West",
        };
        write!(f, "{label} (seat {})", self.number())
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> Self {
        seat.number()
    }
}

impl TryFrom<u8> for Seat {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Seat::from_number(value).ok_or_else(|| format!("seat number {value} out of range 1..=4"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    Human,
    Ai { strategy: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub control: Control,
}

impl Player {
    pub fn human(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            control: Control::Human,
        }
    }

    pub fn ai(id: impl Into<String>, strategy: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            control: Control::Ai {
                strategy: strategy.into(),
            },
        }
    }

    pub fn is_ai(&self) -> bool {
        matches!(self.control, Control::Ai { .. })
    }

    pub fn strategy(&self) -> Option<&str> {
        match &self.control {
            Control::Ai { strategy } => Some(strategy),
            Control::Human => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Player, Seat};

    #[test]
    fn next_wraps_around() {
        assert_eq!(Seat::West.next(), Seat::North);
    }

    #[test]
    fn previous_wraps_around() {
        assert_eq!(Seat::North.previous(), Seat::West);
    }

    #[test]
    fn opposite_is_expected() {
        assert_eq!(Seat::North.opposite(), Seat::South);
        assert_eq!(Seat::East.opposite(), Seat::West);
    }

    #[test]
    fn numbers_are_one_based() {
        for (i, seat) in Seat::LOOP.iter().enumerate() {
            assert_eq!(Seat::from_index(i), Some(*seat));
            assert_eq!(seat.number() as usize, i + 1);
            assert_eq!(Seat::from_number(seat.number()), Some(*seat));
        }
        assert_eq!(Seat::from_number(0), None);
        assert_eq!(Seat::from_number(5), None);
    }

    #[test]
    fn seat_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Seat::South).unwrap(), "3");
        assert!(serde_json::from_str::<Seat>("9").is_err());
    }

    #[test]
    fn ai_players_carry_strategy() {
        let bot = Player::ai("bot-1", "cautious");
        assert!(bot.is_ai());
        assert_eq!(bot.strategy(), Some("cautious"));
        assert_eq!(Player::human("u1", "Ada").strategy(), None);
    }
}
