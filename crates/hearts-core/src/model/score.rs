use crate::model::player::Seat;
use serde::{Deserialize, Serialize};

/// Points a moon shooter collects; every point card in the deck.
pub const MOON_POINTS: u32 = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    totals: [u32; 4],
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self { totals: [0; 4] }
    }

    pub const fn from_totals(totals: [u32; 4]) -> Self {
        Self { totals }
    }

    pub fn add(&mut self, seat: Seat, points: u32) {
        self.totals[seat.index()] += points;
    }

    pub fn add_all(&mut self, points: [u32; 4]) {
        for seat in Seat::LOOP {
            self.add(seat, points[seat.index()]);
        }
    }

    pub fn score(&self, seat: Seat) -> u32 {
        self.totals[seat.index()]
    }

    pub fn standings(&self) -> &[u32; 4] {
        &self.totals
    }

    pub fn max_score(&self) -> u32 {
        self.totals.iter().copied().max().unwrap_or(0)
    }

    /// Seats sharing the lowest total.
    pub fn leaders(&self) -> Vec<Seat> {
        let low = self.totals.iter().copied().min().unwrap_or(0);
        Seat::LOOP
            .iter()
            .copied()
            .filter(|seat| self.score(*seat) == low)
            .collect()
    }

    pub fn reached(&self, goal: u32) -> bool {
        self.max_score() >= goal
    }
}

/// Final game scores after the moon rule: a lone 26 becomes 0 and everyone else takes 26.
pub fn settle_game(raw: [u32; 4]) -> ([u32; 4], Option<Seat>) {
    let shooter = Seat::LOOP
        .iter()
        .copied()
        .find(|seat| raw[seat.index()] == MOON_POINTS);
    match shooter {
        Some(shooter) => {
            let mut settled = [MOON_POINTS; 4];
            settled[shooter.index()] = 0;
            (settled, Some(shooter))
        }
        None => (raw, None),
    }
}
