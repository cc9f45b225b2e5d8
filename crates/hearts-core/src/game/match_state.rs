use super::deal::{DeckSource, derive_game_seed};
use super::serialization::GameRecord;
use super::state::{Game, GamePhase, PlayOutcome};
use crate::error::{DealingError, EngineError, InvariantViolation, MatchError};
use crate::model::card::Card;
use crate::model::player::{Player, Seat};
use crate::model::score::ScoreBoard;
use core::fmt;
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

pub const DEFAULT_SCORE_GOAL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchPhase {
    Setup,
    Ready,
    BeforeGames,
    InProgress,
    BetweenGames,
    Result,
    Finished,
    Aborted,
}

impl MatchPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchPhase::Setup => "SETUP",
            MatchPhase::Ready => "READY",
            MatchPhase::BeforeGames => "BEFORE_GAMES",
            MatchPhase::InProgress => "IN_PROGRESS",
            MatchPhase::BetweenGames => "BETWEEN_GAMES",
            MatchPhase::Result => "RESULT",
            MatchPhase::Finished => "FINISHED",
            MatchPhase::Aborted => "ABORTED",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, MatchPhase::Finished | MatchPhase::Aborted)
    }

    const fn is_pregame(self) -> bool {
        matches!(self, MatchPhase::Setup | MatchPhase::Ready)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    pub goal: u32,
    pub seed: Option<u64>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            goal: DEFAULT_SCORE_GOAL,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSlot {
    pub player: Option<Player>,
    pub ready: bool,
}

impl SeatSlot {
    fn is_ready(&self) -> bool {
        match &self.player {
            Some(player) => player.is_ai() || self.ready,
            None => false,
        }
    }
}

/// A sequence of games played until some seat reaches the score goal.
#[derive(Debug, Clone)]
pub struct Match {
    id: MatchId,
    host: Seat,
    seats: [SeatSlot; 4],
    settings: MatchSettings,
    phase: MatchPhase,
    scores: ScoreBoard,
    games: Vec<Game>,
    records: Vec<GameRecord>,
    unplayable: bool,
}

impl Match {
    pub fn new(id: MatchId, host: Player, host_seat: Seat, settings: MatchSettings) -> Self {
        let mut seats: [SeatSlot; 4] = Default::default();
        seats[host_seat.index()].player = Some(host);
        Self {
            id,
            host: host_seat,
            seats,
            settings,
            phase: MatchPhase::Setup,
            scores: ScoreBoard::new(),
            games: Vec::new(),
            records: Vec::new(),
            unplayable: false,
        }
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn host(&self) -> Seat {
        self.host
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn player(&self, seat: Seat) -> Option<&Player> {
        self.seats[seat.index()].player.as_ref()
    }

    pub fn seat_of(&self, player_id: &str) -> Option<Seat> {
        Seat::LOOP
            .iter()
            .copied()
            .find(|seat| self.player(*seat).is_some_and(|p| p.id == player_id))
    }

    pub fn is_ready(&self, seat: Seat) -> bool {
        self.seats[seat.index()].is_ready()
    }

    pub fn all_bound(&self) -> bool {
        self.seats.iter().all(|slot| slot.player.is_some())
    }

    pub fn all_ready(&self) -> bool {
        self.seats.iter().all(SeatSlot::is_ready)
    }

    pub fn is_unplayable(&self) -> bool {
        self.unplayable
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn active_game(&self) -> Option<&Game> {
        self.games.iter().rev().find(|game| game.is_active())
    }

    fn active_game_mut(&mut self) -> Result<&mut Game, MatchError> {
        self.games
            .iter_mut()
            .rev()
            .find(|game| game.is_active())
            .ok_or(MatchError::NoActiveGame)
    }

    fn ensure_playable(&self) -> Result<(), MatchError> {
        if self.unplayable {
            Err(MatchError::MatchUnplayable)
        } else {
            Ok(())
        }
    }

    pub fn join(&mut self, player: Player) -> Result<Seat, MatchError> {
        self.ensure_playable()?;
        if !self.phase.is_pregame() {
            return Err(MatchError::MatchNotJoinable);
        }
        let seat = Seat::LOOP
            .iter()
            .copied()
            .find(|seat| self.seats[seat.index()].player.is_none())
            .ok_or(MatchError::MatchFull)?;
        self.bind(seat, player);
        Ok(seat)
    }

    /// Binds a player to a specific seat.
    pub fn sit(&mut self, seat: Seat, player: Player) -> Result<(), MatchError> {
        self.ensure_playable()?;
        if !self.phase.is_pregame() {
            return Err(MatchError::MatchNotJoinable);
        }
        if self.seats[seat.index()].player.is_some() {
            return Err(MatchError::SeatTaken(seat));
        }
        self.bind(seat, player);
        Ok(())
    }

    fn bind(&mut self, seat: Seat, player: Player) {
        event!(
            target: "hearts_core::match",
            Level::DEBUG,
            match_id = %self.id,
            seat = seat.number(),
            player = %player.id,
            ai = player.is_ai(),
            "seat bound"
        );
        self.seats[seat.index()] = SeatSlot {
            player: Some(player),
            ready: false,
        };
        if self.all_bound() {
            self.phase = MatchPhase::Ready;
        }
    }

    pub fn leave(&mut self, seat: Seat) -> Result<Player, MatchError> {
        self.ensure_playable()?;
        if !self.phase.is_pregame() {
            return Err(MatchError::WrongPhase(self.phase.as_str()));
        }
        if seat == self.host {
            return Err(MatchError::HostCannotLeave);
        }
        let player = self.seats[seat.index()]
            .player
            .take()
            .ok_or(MatchError::SeatEmpty(seat))?;
        self.seats[seat.index()].ready = false;
        self.phase = MatchPhase::Setup;
        Ok(player)
    }

    pub fn set_ready(&mut self, seat: Seat, ready: bool) -> Result<(), MatchError> {
        self.ensure_playable()?;
        let slot = &mut self.seats[seat.index()];
        let Some(player) = slot.player.as_ref() else {
            return Err(MatchError::SeatEmpty(seat));
        };
        let ai = player.is_ai();
        match self.phase {
            MatchPhase::Setup | MatchPhase::Ready | MatchPhase::BetweenGames => {}
            other => return Err(MatchError::WrongPhase(other.as_str())),
        }
        slot.ready = ready || ai;

        match (self.phase, slot.ready) {
            (MatchPhase::Ready, false) => self.phase = MatchPhase::Setup,
            (MatchPhase::Setup, true) if self.all_bound() => self.phase = MatchPhase::Ready,
            _ => {}
        }
        Ok(())
    }

    /// Host-only; every seat must be bound and ready.
    pub fn start(&mut self, requester: Seat) -> Result<(), MatchError> {
        self.ensure_playable()?;
        if requester != self.host {
            return Err(MatchError::NotHost);
        }
        match self.phase {
            MatchPhase::Setup => return Err(MatchError::NotAllPlayersReady),
            MatchPhase::Ready => {}
            other => return Err(MatchError::WrongPhase(other.as_str())),
        }
        if !self.all_ready() {
            return Err(MatchError::NotAllPlayersReady);
        }
        self.phase = MatchPhase::BeforeGames;
        event!(
            target: "hearts_core::match",
            Level::INFO,
            match_id = %self.id,
            goal = self.settings.goal,
            seeded = self.settings.seed.is_some(),
            "match started"
        );
        Ok(())
    }

    /// Whether the next game may be created right now.
    pub fn can_begin_game(&self) -> bool {
        !self.unplayable
            && match self.phase {
                MatchPhase::BeforeGames => true,
                MatchPhase::BetweenGames => self.all_ready(),
                _ => false,
            }
    }

    /// Creates the next game and tries to deal it.
    pub fn begin_game(&mut self, source: &dyn DeckSource) -> Result<(), EngineError> {
        self.ensure_playable()?;
        if self.active_game().is_some() {
            return Err(self.flag_unplayable(InvariantViolation::ActiveGameExists).into());
        }
        if !matches!(
            self.phase,
            MatchPhase::BeforeGames | MatchPhase::BetweenGames
        ) {
            return Err(MatchError::WrongPhase(self.phase.as_str()).into());
        }
        if self.phase == MatchPhase::BetweenGames && !self.all_ready() {
            return Err(MatchError::NotAllPlayersReady.into());
        }
        if let Some(seat) = Seat::LOOP
            .iter()
            .copied()
            .find(|seat| self.player(*seat).is_none())
        {
            return Err(DealingError::UnboundSeat(seat).into());
        }

        let number = self.games.len() as u32 + 1;
        let seed = derive_game_seed(self.settings.seed, number);
        self.games.push(Game::new(number, seed));
        self.phase = MatchPhase::InProgress;
        event!(
            target: "hearts_core::match",
            Level::DEBUG,
            match_id = %self.id,
            game = number,
            "game created"
        );
        self.retry_deal(source)
    }

    /// Deals the active game if it is still waiting on its deck.
    pub fn retry_deal(&mut self, source: &dyn DeckSource) -> Result<(), EngineError> {
        self.ensure_playable()?;
        let game = self.active_game_mut()?;
        if game.phase().is_dealt() {
            return Ok(());
        }
        game.deal(source)?;
        self.verify_integrity()?;
        Ok(())
    }

    pub fn needs_deal(&self) -> bool {
        self.active_game()
            .is_some_and(|game| !game.phase().is_dealt())
    }

    pub fn submit_pass(&mut self, seat: Seat, cards: &[Card]) -> Result<(), EngineError> {
        self.ensure_playable()?;
        if self.phase != MatchPhase::InProgress {
            return Err(MatchError::WrongPhase(self.phase.as_str()).into());
        }
        self.active_game_mut()?.submit_pass(seat, cards)?;
        self.verify_integrity()?;
        Ok(())
    }

    pub fn play_card(&mut self, seat: Seat, card: Card) -> Result<PlayOutcome, EngineError> {
        self.ensure_playable()?;
        if self.phase != MatchPhase::InProgress {
            return Err(MatchError::WrongPhase(self.phase.as_str()).into());
        }
        let outcome = self.active_game_mut()?.play_card(seat, card)?;
        self.verify_integrity()?;
        if matches!(outcome, PlayOutcome::GameCompleted { .. }) {
            self.finish_game()?;
        }
        Ok(outcome)
    }

    fn finish_game(&mut self) -> Result<(), EngineError> {
        let game = self.active_game_mut()?;
        if game.phase() != GamePhase::Result {
            return Ok(());
        }
        let scores = game.final_scores().unwrap_or_else(|| game.points());
        self.scores.add_all(scores);
        let totals = *self.scores.standings();

        let game = self.active_game_mut()?;
        let record = GameRecord::capture(game, totals);
        game.finish();
        self.records.push(record);

        event!(
            target: "hearts_core::match",
            Level::INFO,
            match_id = %self.id,
            game = self.games.len(),
            totals = ?totals,
            "game finished"
        );

        if self.scores.reached(self.settings.goal) {
            // RESULT is transient; FINISHED follows once the winners are known.
            self.phase = MatchPhase::Result;
            let winners = self.scores.leaders();
            self.phase = MatchPhase::Finished;
            event!(
                target: "hearts_core::match",
                Level::INFO,
                match_id = %self.id,
                winners = ?winners.iter().map(|seat| seat.number()).collect::<Vec<_>>(),
                "match finished"
            );
        } else {
            self.phase = MatchPhase::BetweenGames;
            for slot in &mut self.seats {
                slot.ready = false;
            }
        }
        Ok(())
    }

    /// Host-only; allowed from any non-terminal phase.
    pub fn abort(&mut self, requester: Seat) -> Result<(), MatchError> {
        if requester != self.host {
            return Err(MatchError::NotHost);
        }
        if self.phase.is_terminal() {
            return Err(MatchError::WrongPhase(self.phase.as_str()));
        }
        if let Ok(game) = self.active_game_mut() {
            game.abort();
        }
        self.phase = MatchPhase::Aborted;
        event!(
            target: "hearts_core::match",
            Level::INFO,
            match_id = %self.id,
            "match aborted"
        );
        Ok(())
    }

    /// Seats sharing the lowest total once the match has finished.
    pub fn winners(&self) -> Vec<Seat> {
        if self.phase == MatchPhase::Finished {
            self.scores.leaders()
        } else {
            Vec::new()
        }
    }

    /// Scans for corrupt state and flags the match unplayable when found.
    pub fn verify_integrity(&mut self) -> Result<(), InvariantViolation> {
        let active = self.games.iter().filter(|game| game.is_active()).count();
        let result = if active > 1 {
            Err(InvariantViolation::MultipleActiveGames(active))
        } else {
            self.active_game().map_or(Ok(()), Game::verify_deck)
        };
        result.map_err(|err| self.flag_unplayable(err))
    }

    fn flag_unplayable(&mut self, err: InvariantViolation) -> InvariantViolation {
        self.unplayable = true;
        event!(
            target: "hearts_core::match",
            Level::ERROR,
            match_id = %self.id,
            phase = self.phase.as_str(),
            error = %err,
            "invariant violated; match flagged unplayable"
        );
        err
    }

    #[cfg(test)]
    pub(crate) fn push_game_for_test(&mut self, game: Game) {
        self.games.push(game);
    }
}
