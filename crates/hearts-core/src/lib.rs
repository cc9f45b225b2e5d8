//! Rules engine for a four-seat Hearts match: cards, dealing, passing, tricks,
//! scoring, and the game and match state machines.

pub mod error;
pub mod game;
pub mod model;
pub mod stats;

pub use error::{EngineError, Severity};
pub use game::match_state::{Match, MatchId, MatchPhase, MatchSettings};
pub use game::serialization::{GameRecord, VisibleState};
pub use game::state::{Game, GamePhase, PlayOutcome};
