//! Error taxonomy shared by the engine and its callers.
//!
//! Rule and match errors are rejections: the action is refused and no state
//! changes. Invariant violations mean the match data is corrupt and the match
//! is flagged unplayable. Dealing errors come from the deck collaborator and
//! are retried by the caller.

use crate::model::card::{Card, InvalidCardFormat};
use crate::model::player::Seat;
use crate::model::suit::Suit;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PassRejection {
    #[error("exactly 3 cards must be passed, got {0}")]
    WrongCount(usize),
    #[error("{0} is not in the passing hand")]
    NotInHand(Card),
    #[error("{0} was submitted more than once")]
    Duplicate(Card),
    #[error("{0} has already passed this game")]
    AlreadyPassed(Seat),
    #[error("there is no passing this game")]
    NoPassingThisGame,
    #[error("the game is not in the passing phase")]
    NotPassingPhase,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("it is not {0}'s turn")]
    NotYourTurn(Seat),
    #[error("{0} is not in the player's hand")]
    CardNotInHand(Card),
    #[error("the first trick must be opened with the two of clubs")]
    MustLeadTwoOfClubs,
    #[error("point cards cannot be played on the first trick")]
    PointCardRestricted,
    #[error("hearts cannot be led before they are broken")]
    HeartsNotBroken,
    #[error("must follow the led suit ({0})")]
    MustFollowSuit(Suit),
    #[error("invalid pass: {0}")]
    InvalidPass(#[from] PassRejection),
    #[error(transparent)]
    InvalidCardFormat(#[from] InvalidCardFormat),
    #[error("action not allowed while the game is {0}")]
    WrongPhase(&'static str),
}

impl RuleViolation {
    /// Stable machine-readable code for rejection responses.
    pub const fn code(&self) -> &'static str {
        match self {
            RuleViolation::NotYourTurn(_) => "not_your_turn",
            RuleViolation::CardNotInHand(_) => "card_not_in_hand",
            RuleViolation::MustLeadTwoOfClubs => "must_lead_two_of_clubs",
            RuleViolation::PointCardRestricted => "point_card_restricted",
            RuleViolation::HeartsNotBroken => "hearts_not_broken",
            RuleViolation::MustFollowSuit(_) => "must_follow_suit",
            RuleViolation::InvalidPass(_) => "invalid_pass",
            RuleViolation::InvalidCardFormat(_) => "invalid_card_format",
            RuleViolation::WrongPhase(_) => "wrong_phase",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("all four seats are taken")]
    MatchFull,
    #[error("the match is no longer accepting players")]
    MatchNotJoinable,
    #[error("every seat must be bound and ready before the match starts")]
    NotAllPlayersReady,
    #[error("only the host may do that")]
    NotHost,
    #[error("{0} is empty")]
    SeatEmpty(Seat),
    #[error("{0} is already taken")]
    SeatTaken(Seat),
    #[error("the host cannot leave; abort the match instead")]
    HostCannotLeave,
    #[error("no game is in progress")]
    NoActiveGame,
    #[error("action not allowed while the match is {0}")]
    WrongPhase(&'static str),
    #[error("the match has been flagged unplayable")]
    MatchUnplayable,
}

impl MatchError {
    pub const fn code(&self) -> &'static str {
        match self {
            MatchError::MatchFull => "match_full",
            MatchError::MatchNotJoinable => "match_not_joinable",
            MatchError::NotAllPlayersReady => "not_all_players_ready",
            MatchError::NotHost => "not_host",
            MatchError::SeatEmpty(_) => "seat_empty",
            MatchError::SeatTaken(_) => "seat_taken",
            MatchError::HostCannotLeave => "host_cannot_leave",
            MatchError::NoActiveGame => "no_active_game",
            MatchError::WrongPhase(_) => "wrong_match_phase",
            MatchError::MatchUnplayable => "match_unplayable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{0} games are active at once")]
    MultipleActiveGames(usize),
    #[error("a game is already active for this match")]
    ActiveGameExists,
    #[error("deck integrity violated: {0}")]
    DeckIntegrityViolation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealingError {
    #[error("{0} has no bound player")]
    UnboundSeat(Seat),
    #[error("deck source failed: {0}")]
    Source(String),
    #[error("deck source failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Refused action; state unchanged.
    Rejected,
    /// Corrupt state; the match is unplayable.
    Fatal,
    /// Collaborator failure; retry later.
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Rule(#[from] RuleViolation),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    #[error(transparent)]
    Dealing(#[from] DealingError),
}

impl EngineError {
    pub const fn severity(&self) -> Severity {
        match self {
            EngineError::Rule(_) | EngineError::Match(_) => Severity::Rejected,
            EngineError::Invariant(_) => Severity::Fatal,
            EngineError::Dealing(_) => Severity::External,
        }
    }
}

impl From<PassRejection> for EngineError {
    fn from(err: PassRejection) -> Self {
        EngineError::Rule(RuleViolation::InvalidPass(err))
    }
}

impl From<InvalidCardFormat> for EngineError {
    fn from(err: InvalidCardFormat) -> Self {
        EngineError::Rule(RuleViolation::InvalidCardFormat(err))
    }
}
