use crate::model::player::Seat;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Bit set over the four seats; bit `i` set means seat index `i` could hold the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatMask(u8);

impl SeatMask {
    pub const EMPTY: SeatMask = SeatMask(0);
    pub const ALL: SeatMask = SeatMask(0b1111);

    pub const fn only(seat: Seat) -> Self {
        SeatMask(seat.bit())
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, seat: Seat) -> bool {
        self.0 & seat.bit() != 0
    }

    pub const fn with(self, seat: Seat) -> Self {
        SeatMask(self.0 | seat.bit())
    }

    pub const fn without(self, seat: Seat) -> Self {
        SeatMask(self.0 & !seat.bit())
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// The single possible holder, if the mask pins one down.
    pub fn certain(self) -> Option<Seat> {
        if self.count() == 1 {
            Seat::from_index(self.0.trailing_zeros() as usize)
        } else {
            None
        }
    }

    pub fn seats(self) -> impl Iterator<Item = Seat> {
        Seat::LOOP.into_iter().filter(move |seat| self.contains(*seat))
    }
}

impl fmt::Display for SeatMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04b}", self.0)
    }
}
