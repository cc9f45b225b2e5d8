//! Operation surface for driving matches.
//!
//! Each match lives in its own slot. Mutations take the slot's mutex, run the
//! scheduler, then publish a committed copy; reads only touch the committed
//! copy and never wait behind a running AI batch.

use hearts_core::error::{EngineError, MatchError, RuleViolation};
use hearts_core::game::deal::{DeckSource, LocalShuffle};
use hearts_core::model::card::{Card, parse_card_list};
use hearts_core::model::player::{Player, Seat};
use hearts_core::{
    GameRecord, Match, MatchId, MatchSettings, PlayOutcome, Severity, VisibleState,
};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tracing::{Level, event};

use crate::deck::{RetryPolicy, RetryingSource};
use crate::scheduler::{BatchLimit, Progress, Scheduler, SchedulerError, SeatPolicies};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} does not exist")]
    UnknownMatch(MatchId),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

impl From<MatchError> for ServiceError {
    fn from(err: MatchError) -> Self {
        ServiceError::Engine(err.into())
    }
}

impl From<RuleViolation> for ServiceError {
    fn from(err: RuleViolation) -> Self {
        ServiceError::Engine(err.into())
    }
}

/// What callers see when an operation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{code}: {message}")]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self::new("internal_error", "the match hit an internal error")
    }
}

impl From<&ServiceError> for ErrorResponse {
    fn from(err: &ServiceError) -> Self {
        match err {
            ServiceError::UnknownMatch(_) => ErrorResponse::new("unknown_match", err.to_string()),
            ServiceError::Engine(engine) => match (engine.severity(), engine) {
                (Severity::Rejected, EngineError::Rule(rule)) => {
                    ErrorResponse::new(rule.code(), rule.to_string())
                }
                (Severity::Rejected, EngineError::Match(rejection)) => {
                    ErrorResponse::new(rejection.code(), rejection.to_string())
                }
                (Severity::External, _) => {
                    ErrorResponse::new("deal_unavailable", "the deck could not be acquired; poll to retry")
                }
                _ => ErrorResponse::internal(),
            },
            ServiceError::Scheduler(_) => ErrorResponse::internal(),
        }
    }
}

impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        let response = ErrorResponse::from(&err);
        if response.code == "internal_error" {
            event!(
                target: "hearts_table::service",
                Level::ERROR,
                error = %err,
                "internal error"
            );
        }
        response
    }
}

pub type ServiceResult<T> = Result<T, ErrorResponse>;

/// A human action followed by whatever AI turns it unlocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayResponse {
    pub outcome: PlayOutcome,
    pub progress: Progress,
}

struct LiveMatch {
    table: Match,
    bots: SeatPolicies,
}

struct MatchSlot {
    live: Mutex<LiveMatch>,
    committed: RwLock<Match>,
    abort: AtomicBool,
}

impl MatchSlot {
    fn publish(&self, live: &LiveMatch) {
        *self.committed.write() = live.table.clone();
    }
}

pub struct MatchService {
    matches: RwLock<HashMap<MatchId, Arc<MatchSlot>>>,
    next_id: AtomicU64,
    deck: Arc<dyn DeckSource>,
    retry: RetryPolicy,
    limit: BatchLimit,
}

impl Default for MatchService {
    fn default() -> Self {
        Self::new(Arc::new(LocalShuffle), RetryPolicy::default(), BatchLimit::Unbounded)
    }
}

impl MatchService {
    pub fn new(deck: Arc<dyn DeckSource>, retry: RetryPolicy, limit: BatchLimit) -> Self {
        Self {
            matches: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            deck,
            retry,
            limit,
        }
    }

    pub fn batch_limit(&self) -> BatchLimit {
        self.limit
    }

    pub fn create_match(&self, host: Player, host_seat: Seat, settings: MatchSettings) -> MatchId {
        let id = MatchId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let table = Match::new(id, host, host_seat, settings);
        let slot = MatchSlot {
            committed: RwLock::new(table.clone()),
            live: Mutex::new(LiveMatch {
                table,
                bots: SeatPolicies::new(),
            }),
            abort: AtomicBool::new(false),
        };
        self.matches.write().insert(id, Arc::new(slot));
        event!(
            target: "hearts_table::service",
            Level::INFO,
            match_id = %id,
            host = host_seat.number(),
            goal = settings.goal,
            "match created"
        );
        id
    }

    pub fn join_match(&self, id: MatchId, player: Player) -> ServiceResult<Seat> {
        self.mutate(id, |live| Ok(live.table.join(player)?))
    }

    pub fn leave_match(&self, id: MatchId, seat: Seat) -> ServiceResult<Player> {
        self.mutate(id, |live| Ok(live.table.leave(seat)?))
    }

    pub fn set_ready(&self, id: MatchId, seat: Seat, ready: bool) -> ServiceResult<Progress> {
        self.drive(id, |live| Ok(live.table.set_ready(seat, ready)?))
            .map(|((), progress)| progress)
    }

    pub fn start_match(&self, id: MatchId, requester: Seat) -> ServiceResult<Progress> {
        self.drive(id, |live| Ok(live.table.start(requester)?))
            .map(|((), progress)| progress)
    }

    /// `cards` is a comma-separated code list such as `"2C,QS,0H"`.
    pub fn submit_pass(&self, id: MatchId, seat: Seat, cards: &str) -> ServiceResult<Progress> {
        let cards = parse_card_list(cards).map_err(RuleViolation::from);
        self.drive(id, |live| {
            let cards = cards?;
            ensure_human(&live.table, seat)?;
            Ok(live.table.submit_pass(seat, &cards)?)
        })
        .map(|((), progress)| progress)
    }

    pub fn submit_play(&self, id: MatchId, seat: Seat, card: &str) -> ServiceResult<PlayResponse> {
        let card = Card::from_code(card).map_err(RuleViolation::from);
        self.drive(id, |live| {
            let card = card?;
            ensure_human(&live.table, seat)?;
            Ok(live.table.play_card(seat, card)?)
        })
        .map(|(outcome, progress)| PlayResponse { outcome, progress })
    }

    /// Runs the scheduler without a human action.
    pub fn poll(&self, id: MatchId) -> ServiceResult<Progress> {
        self.drive(id, |_| Ok(())).map(|((), progress)| progress)
    }

    /// Host-only. The abort flag is raised before taking the lock so a
    /// running batch stops at its next turn. Refusals never raise it.
    pub fn abort_match(&self, id: MatchId, requester: Seat) -> ServiceResult<()> {
        let slot = self.slot(id)?;
        {
            let committed = slot.committed.read();
            if committed.host() != requester {
                return Err(ServiceError::from(MatchError::NotHost).into());
            }
            let phase = committed.phase();
            if phase.is_terminal() {
                return Err(ServiceError::from(MatchError::WrongPhase(phase.as_str())).into());
            }
        }
        slot.abort.store(true, Ordering::Release);
        let mut live = slot.live.lock();
        let result = live.table.abort(requester);
        if result.is_err() {
            slot.abort.store(false, Ordering::Release);
        }
        slot.publish(&live);
        result.map_err(|err| ServiceError::from(err).into())
    }

    pub fn visible_state(&self, id: MatchId, seat: Seat) -> ServiceResult<VisibleState> {
        let slot = self.slot(id)?;
        let committed = slot.committed.read();
        Ok(VisibleState::capture(&committed, seat))
    }

    pub fn game_records(&self, id: MatchId) -> ServiceResult<Vec<GameRecord>> {
        let slot = self.slot(id)?;
        let records = slot.committed.read().records().to_vec();
        Ok(records)
    }

    /// Legal cards for `seat` right now; empty when it is not that seat's turn.
    pub fn legal_plays(&self, id: MatchId, seat: Seat) -> ServiceResult<Vec<Card>> {
        let slot = self.slot(id)?;
        let committed = slot.committed.read();
        Ok(committed
            .active_game()
            .map(|game| game.legal_plays(seat))
            .unwrap_or_default())
    }

    /// Copy of the last committed match state.
    pub fn snapshot(&self, id: MatchId) -> ServiceResult<Match> {
        let slot = self.slot(id)?;
        let snapshot = slot.committed.read().clone();
        Ok(snapshot)
    }

    fn slot(&self, id: MatchId) -> Result<Arc<MatchSlot>, ServiceError> {
        self.matches
            .read()
            .get(&id)
            .cloned()
            .ok_or(ServiceError::UnknownMatch(id))
    }

    fn mutate<T, F>(&self, id: MatchId, action: F) -> ServiceResult<T>
    where
        F: FnOnce(&mut LiveMatch) -> Result<T, ServiceError>,
    {
        let slot = self.slot(id)?;
        let mut live = slot.live.lock();
        let result = action(&mut live);
        slot.publish(&live);
        result.map_err(ErrorResponse::from)
    }

    /// Applies `action`, then lets the scheduler run the AI turns it unlocked.
    fn drive<T, F>(&self, id: MatchId, action: F) -> ServiceResult<(T, Progress)>
    where
        F: FnOnce(&mut LiveMatch) -> Result<T, ServiceError>,
    {
        let slot = self.slot(id)?;
        let mut live = slot.live.lock();
        let outcome = match action(&mut live) {
            Ok(outcome) => outcome,
            Err(err) => {
                slot.publish(&live);
                return Err(err.into());
            }
        };

        let deck = RetryingSource::new(self.deck.as_ref(), self.retry);
        let scheduler = Scheduler::new(&deck, self.limit, &slot.abort);
        let LiveMatch { table, bots } = &mut *live;
        let progress = scheduler.run(table, bots);
        slot.publish(&live);
        match progress {
            Ok(progress) => Ok((outcome, progress)),
            Err(err) => Err(ServiceError::from(err).into()),
        }
    }
}

/// AI seats are driven by the scheduler only.
fn ensure_human(table: &Match, seat: Seat) -> Result<(), ServiceError> {
    match table.player(seat) {
        None => Err(MatchError::SeatEmpty(seat).into()),
        Some(player) if player.is_ai() => Err(RuleViolation::NotYourTurn(seat).into()),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorResponse, MatchService, ServiceError};
    use crate::scheduler::Halt;
    use hearts_core::error::{EngineError, InvariantViolation, MatchError};
    use hearts_core::model::player::{Player, Seat};
    use hearts_core::{MatchId, MatchSettings};
    use std::sync::atomic::Ordering;

    #[test]
    fn rejections_keep_their_codes() {
        let err = ServiceError::from(MatchError::MatchFull);
        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, "match_full");
        assert_eq!(response.message, "all four seats are taken");
    }

    #[test]
    fn fatal_errors_are_reported_generically() {
        let err = ServiceError::Engine(EngineError::from(InvariantViolation::DeckIntegrityViolation(
            "2C held twice".into(),
        )));
        let response = ErrorResponse::from(err);
        assert_eq!(response.code, "internal_error");
        assert!(!response.message.contains("2C"));
    }

    #[test]
    fn refused_abort_leaves_running_batches_alone() {
        let service = MatchService::default();
        let id = service.create_match(
            Player::ai("host", "leftmost"),
            Seat::North,
            MatchSettings {
                goal: 30,
                seed: Some(12),
            },
        );
        for strategy in ["random", "cautious", "void_shortest"] {
            service.join_match(id, Player::ai(strategy, strategy)).unwrap();
        }
        let progress = service.start_match(id, Seat::North).unwrap();
        assert_eq!(progress.halt, Halt::MatchOver);

        let slot = service.slot(id).unwrap();
        // A refusal must not wait on, or signal, whoever holds the live match.
        let _live = slot.live.lock();
        let err = service.abort_match(id, Seat::North).unwrap_err();
        assert_eq!(err.code, "wrong_match_phase");
        assert!(!slot.abort.load(Ordering::Acquire));
    }

    #[test]
    fn unknown_match_is_reported() {
        let service = MatchService::default();
        let err = service.poll(MatchId(77)).unwrap_err();
        assert_eq!(err.code, "unknown_match");
    }
}
