mod mask;
mod tracker;

pub use mask::SeatMask;
pub use tracker::{CardStat, GameStats};
