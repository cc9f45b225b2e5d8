//! Chains AI decisions until a human must act.
//!
//! Every AI choice goes through the same [`Match`] entry points a human action
//! does, so the engine validates bot moves exactly like anyone else's.

use hearts_bot::{Policy, PolicyContext, make_policy};
use hearts_core::error::EngineError;
use hearts_core::game::deal::DeckSource;
use hearts_core::model::player::{Player, Seat};
use hearts_core::{GamePhase, Match, MatchPhase, Severity};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{Level, event};

const SEAT_SEED_MIX: u64 = 0xD1B5_4A32_D192_ED03;

/// AI turns one external call may execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchLimit {
    Turns(u32),
    Unbounded,
}

impl BatchLimit {
    pub const fn allows(self, used: u32) -> bool {
        match self {
            BatchLimit::Turns(limit) => used < limit,
            BatchLimit::Unbounded => true,
        }
    }
}

/// Why the scheduler handed control back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Halt {
    /// These human seats owe a pass or a play.
    AwaitingHuman { seats: Vec<Seat> },
    /// Human seats must confirm before the next game.
    AwaitingReady,
    /// The match has not been started.
    AwaitingStart,
    /// The deck source is failing; the next call retries.
    AwaitingDeal,
    BatchLimit,
    MatchOver,
    Aborted,
}

impl Halt {
    /// Further polling cannot make progress without outside input.
    pub const fn is_final(&self) -> bool {
        matches!(self, Halt::MatchOver | Halt::Aborted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub ai_turns: u32,
    pub games_started: u32,
    pub halt: Halt,
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{strategy} offered no decision for {seat}")]
    NoDecision { seat: Seat, strategy: &'static str },
    #[error("{strategy} made a move the engine refused for {seat}: {source}")]
    BotRejected {
        seat: Seat,
        strategy: &'static str,
        #[source]
        source: EngineError,
    },
}

/// Lazily built policy per AI seat, kept across calls so seeded bots stay
/// on one random stream for the whole match.
#[derive(Default)]
pub struct SeatPolicies {
    slots: [Option<(String, Box<dyn Policy>)>; 4],
}

impl SeatPolicies {
    pub fn new() -> Self {
        Self::default()
    }

    fn policy_for(
        &mut self,
        seat: Seat,
        player: &Player,
        match_seed: Option<u64>,
    ) -> Option<&mut Box<dyn Policy>> {
        let strategy = player.strategy()?;
        let slot = &mut self.slots[seat.index()];
        let stale = slot.as_ref().is_none_or(|(id, _)| id != strategy);
        if stale {
            let seed = match_seed.map(|seed| seed ^ (seat.number() as u64).wrapping_mul(SEAT_SEED_MIX));
            *slot = Some((strategy.to_string(), make_policy(strategy, seed)));
        }
        slot.as_mut().map(|(_, policy)| policy)
    }
}

pub struct Scheduler<'a> {
    deck: &'a dyn DeckSource,
    limit: BatchLimit,
    abort: &'a AtomicBool,
}

impl<'a> Scheduler<'a> {
    pub fn new(deck: &'a dyn DeckSource, limit: BatchLimit, abort: &'a AtomicBool) -> Self {
        Self { deck, limit, abort }
    }

    /// Runs AI turns until a human decision point, a terminal phase, the batch
    /// limit or an abort.
    pub fn run(
        &self,
        table: &mut Match,
        bots: &mut SeatPolicies,
    ) -> Result<Progress, SchedulerError> {
        let mut ai_turns = 0u32;
        let mut games_started = 0u32;

        let halt = loop {
            if self.abort.load(Ordering::Acquire) {
                break Halt::Aborted;
            }
            match table.phase() {
                MatchPhase::Finished | MatchPhase::Result => break Halt::MatchOver,
                MatchPhase::Aborted => break Halt::Aborted,
                MatchPhase::Setup | MatchPhase::Ready => break Halt::AwaitingStart,
                MatchPhase::BeforeGames | MatchPhase::BetweenGames => {
                    if !table.can_begin_game() {
                        break Halt::AwaitingReady;
                    }
                    games_started += 1;
                    match table.begin_game(self.deck) {
                        Ok(()) => continue,
                        Err(err) if err.severity() == Severity::External => {
                            break self.deal_pending(table, &err);
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
                MatchPhase::InProgress => {}
            }

            if table.needs_deal() {
                match table.retry_deal(self.deck) {
                    Ok(()) => continue,
                    Err(err) if err.severity() == Severity::External => {
                        break self.deal_pending(table, &err);
                    }
                    Err(err) => return Err(err.into()),
                }
            }

            let Some(game) = table.active_game() else {
                return Err(EngineError::from(hearts_core::error::MatchError::NoActiveGame).into());
            };

            if game.phase() == GamePhase::Passing {
                let pending = game.pending_passers();
                let (bots_pending, humans): (Vec<Seat>, Vec<Seat>) = pending
                    .into_iter()
                    .partition(|seat| table.player(*seat).is_some_and(Player::is_ai));
                if bots_pending.is_empty() {
                    break Halt::AwaitingHuman { seats: humans };
                }
                let mut limited = false;
                for seat in bots_pending {
                    if !self.limit.allows(ai_turns) {
                        limited = true;
                        break;
                    }
                    self.bot_pass(table, bots, seat)?;
                    ai_turns += 1;
                }
                if limited {
                    break Halt::BatchLimit;
                }
                continue;
            }

            let Some(seat) = game.whose_turn() else {
                return Err(EngineError::from(hearts_core::error::MatchError::NoActiveGame).into());
            };
            if !table.player(seat).is_some_and(Player::is_ai) {
                break Halt::AwaitingHuman { seats: vec![seat] };
            }
            if !self.limit.allows(ai_turns) {
                break Halt::BatchLimit;
            }
            self.bot_play(table, bots, seat)?;
            ai_turns += 1;
        };

        event!(
            target: "hearts_table::scheduler",
            Level::DEBUG,
            match_id = %table.id(),
            ai_turns,
            games_started,
            halt = ?halt,
            "scheduler yielded"
        );
        Ok(Progress {
            ai_turns,
            games_started,
            halt,
        })
    }

    fn deal_pending(&self, table: &Match, err: &EngineError) -> Halt {
        event!(
            target: "hearts_table::scheduler",
            Level::WARN,
            match_id = %table.id(),
            source = self.deck.name(),
            error = %err,
            "deal pending"
        );
        Halt::AwaitingDeal
    }

    fn bot_pass(
        &self,
        table: &mut Match,
        bots: &mut SeatPolicies,
        seat: Seat,
    ) -> Result<(), SchedulerError> {
        let (policy, cards) = {
            let game = active(table)?;
            let player = bound(table, seat)?;
            let policy = bots
                .policy_for(seat, player, table.settings().seed)
                .ok_or(SchedulerError::NoDecision {
                    seat,
                    strategy: "unbound",
                })?;
            let ctx = PolicyContext::from_game(game, seat, table.scores());
            let cards = policy.choose_pass(&ctx);
            (policy.name(), cards)
        };
        let cards = cards.ok_or(SchedulerError::NoDecision {
            seat,
            strategy: policy,
        })?;
        table
            .submit_pass(seat, &cards)
            .map_err(|source| bot_error(seat, policy, source))
    }

    fn bot_play(
        &self,
        table: &mut Match,
        bots: &mut SeatPolicies,
        seat: Seat,
    ) -> Result<(), SchedulerError> {
        let (policy, card) = {
            let game = active(table)?;
            let player = bound(table, seat)?;
            let policy = bots
                .policy_for(seat, player, table.settings().seed)
                .ok_or(SchedulerError::NoDecision {
                    seat,
                    strategy: "unbound",
                })?;
            let ctx = PolicyContext::from_game(game, seat, table.scores());
            let card = policy.choose_play(&ctx);
            (policy.name(), card)
        };
        let card = card.ok_or(SchedulerError::NoDecision {
            seat,
            strategy: policy,
        })?;
        table
            .play_card(seat, card)
            .map(|_| ())
            .map_err(|source| bot_error(seat, policy, source))
    }
}

fn active(table: &Match) -> Result<&hearts_core::Game, SchedulerError> {
    table
        .active_game()
        .ok_or_else(|| EngineError::from(hearts_core::error::MatchError::NoActiveGame).into())
}

fn bound(table: &Match, seat: Seat) -> Result<&Player, SchedulerError> {
    table
        .player(seat)
        .ok_or_else(|| EngineError::from(hearts_core::error::MatchError::SeatEmpty(seat)).into())
}

/// Fatal engine errors pass through untouched; a rejected bot move is a bot bug.
fn bot_error(seat: Seat, strategy: &'static str, source: EngineError) -> SchedulerError {
    match source.severity() {
        Severity::Rejected => SchedulerError::BotRejected {
            seat,
            strategy,
            source,
        },
        _ => SchedulerError::Engine(source),
    }
}
