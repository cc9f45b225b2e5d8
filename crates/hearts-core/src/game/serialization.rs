use super::match_state::{Match, MatchId, MatchPhase};
use super::state::{Game, GamePhase};
use crate::model::card::Card;
use crate::model::passing::{PassedCard, PassingDirection};
use crate::model::player::Seat;
use crate::model::trick::Play;
use serde::{Deserialize, Serialize};

/// Summary of a finished game, handed to storage before the game's stats are purged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameRecord {
    pub game_number: u32,
    pub direction: PassingDirection,
    pub raw_points: [u32; 4],
    pub scores: [u32; 4],
    pub moon_shooter: Option<Seat>,
    pub passes: Vec<PassedCard>,
    pub match_scores: [u32; 4],
}

impl GameRecord {
    pub fn capture(game: &Game, match_scores: [u32; 4]) -> Self {
        Self {
            game_number: game.number(),
            direction: game.direction(),
            raw_points: game.points(),
            scores: game.final_scores().unwrap_or_else(|| game.points()),
            moon_shooter: game.moon_shooter(),
            passes: game.passes().to_vec(),
            match_scores,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// What one seat is allowed to see. Other seats' hands are reduced to counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisibleState {
    pub match_id: MatchId,
    pub seat: Seat,
    pub match_phase: MatchPhase,
    pub game_phase: Option<GamePhase>,
    pub game_number: Option<u32>,
    pub hand: Vec<Card>,
    pub hand_sizes: [usize; 4],
    pub current_trick: Vec<Play>,
    pub trick_number: u8,
    pub leader: Option<Seat>,
    pub hearts_broken: bool,
    pub game_scores: [u32; 4],
    pub match_scores: [u32; 4],
    pub whose_turn: Option<Seat>,
    pub passing_direction: Option<PassingDirection>,
    pub pass_pending: bool,
    pub passed_cards: Vec<Card>,
    pub last_trick: Option<Vec<Play>>,
    pub unplayable: bool,
}

impl VisibleState {
    pub fn capture(table: &Match, seat: Seat) -> Self {
        let game = table
            .active_game()
            .or_else(|| table.games().last());
        let dealt = game.filter(|game| game.phase().is_dealt());
        Self {
            match_id: table.id(),
            seat,
            match_phase: table.phase(),
            game_phase: game.map(Game::phase),
            game_number: game.map(Game::number),
            hand: dealt
                .map(|game| game.hand(seat).cards().to_vec())
                .unwrap_or_default(),
            hand_sizes: Seat::LOOP.map(|other| dealt.map_or(0, |game| game.hand(other).len())),
            current_trick: dealt
                .filter(|game| game.phase().is_trick_phase())
                .map(|game| game.current_trick().plays().to_vec())
                .unwrap_or_default(),
            trick_number: dealt.map_or(0, Game::trick_number),
            leader: dealt
                .filter(|game| game.phase().is_trick_phase())
                .map(Game::leader),
            hearts_broken: dealt.is_some_and(Game::hearts_broken),
            game_scores: game.map_or([0; 4], |game| {
                game.final_scores().unwrap_or_else(|| game.points())
            }),
            match_scores: *table.scores().standings(),
            whose_turn: game.and_then(Game::whose_turn),
            passing_direction: game.map(Game::direction),
            pass_pending: game.is_some_and(|game| {
                game.phase() == GamePhase::Passing && !game.has_passed(seat)
            }),
            passed_cards: game
                .map(|game| {
                    game.passes()
                        .iter()
                        .filter(|record| record.from == seat)
                        .map(|record| record.card)
                        .collect()
                })
                .unwrap_or_default(),
            last_trick: dealt
                .and_then(Game::last_completed_trick)
                .map(|trick| trick.plays().to_vec()),
            unplayable: table.is_unplayable(),
        }
    }
}
