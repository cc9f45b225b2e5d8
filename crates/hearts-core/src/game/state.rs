use super::deal::{DeckSource, deal_hands, two_of_clubs_holder};
use crate::error::{DealingError, EngineError, InvariantViolation, PassRejection, RuleViolation};
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::passing::{PassedCard, PassingDirection, PassingState};
use crate::model::player::Seat;
use crate::model::score::settle_game;
use crate::model::trick::Trick;
use crate::stats::GameStats;
use serde::{Deserialize, Serialize};
use std::array;
use tracing::{Level, event};

pub const TRICKS_PER_GAME: u8 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Prestart,
    WaitingForExternalApi,
    Passing,
    SkipPassing,
    #[serde(rename = "FIRSTTRICK")]
    FirstTrick,
    #[serde(rename = "NORMALTRICK")]
    NormalTrick,
    #[serde(rename = "FINALTRICK")]
    FinalTrick,
    Result,
    Finished,
    Aborted,
}

impl GamePhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            GamePhase::Prestart => "PRESTART",
            GamePhase::WaitingForExternalApi => "WAITING_FOR_EXTERNAL_API",
            GamePhase::Passing => "PASSING",
            GamePhase::SkipPassing => "SKIP_PASSING",
            GamePhase::FirstTrick => "FIRSTTRICK",
            GamePhase::NormalTrick => "NORMALTRICK",
            GamePhase::FinalTrick => "FINALTRICK",
            GamePhase::Result => "RESULT",
            GamePhase::Finished => "FINISHED",
            GamePhase::Aborted => "ABORTED",
        }
    }

    pub const fn is_trick_phase(self) -> bool {
        matches!(
            self,
            GamePhase::FirstTrick | GamePhase::NormalTrick | GamePhase::FinalTrick
        )
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Finished | GamePhase::Aborted)
    }

    /// Hands exist once the deck has been acquired.
    pub const fn is_dealt(self) -> bool {
        !matches!(
            self,
            GamePhase::Prestart | GamePhase::WaitingForExternalApi
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Accepted { next: Seat },
    TrickCompleted { winner: Seat, points: u8 },
    GameCompleted {
        winner: Seat,
        scores: [u32; 4],
        moon_shooter: Option<Seat>,
    },
}

/// One deal of thirteen tricks.
#[derive(Debug, Clone)]
pub struct Game {
    number: u32,
    seed: Option<u64>,
    phase: GamePhase,
    hands: [Hand; 4],
    passing: PassingState,
    current_trick: Trick,
    history: Vec<Trick>,
    hearts_broken: bool,
    points: [u32; 4],
    final_scores: Option<[u32; 4]>,
    moon_shooter: Option<Seat>,
    stats: Option<GameStats>,
}

impl Game {
    pub fn new(number: u32, seed: Option<u64>) -> Self {
        Self {
            number,
            seed,
            phase: GamePhase::Prestart,
            hands: array::from_fn(|_| Hand::new()),
            passing: PassingState::new(number),
            current_trick: Trick::new(1, Seat::North),
            history: Vec::with_capacity(TRICKS_PER_GAME as usize),
            hearts_broken: false,
            points: [0; 4],
            final_scores: None,
            moon_shooter: None,
            stats: None,
        }
    }

    /// A game dealt from fixed hands rather than a deck source.
    pub fn with_hands(number: u32, hands: [Hand; 4]) -> Self {
        let mut game = Self::new(number, None);
        game.install_hands(hands);
        game
    }

    /// Acquires the deck and deals. A source failure leaves the game waiting.
    pub fn deal(&mut self, source: &dyn DeckSource) -> Result<(), EngineError> {
        if self.phase.is_dealt() {
            return Err(RuleViolation::WrongPhase(self.phase.as_str()).into());
        }
        self.phase = GamePhase::WaitingForExternalApi;
        let deck = source.acquire(self.seed).map_err(|err| {
            event!(
                target: "hearts_core::game",
                Level::WARN,
                game = self.number,
                source = source.name(),
                error = %err,
                "deck acquisition failed"
            );
            EngineError::from(err)
        })?;
        let hands = deal_hands(&deck);
        if two_of_clubs_holder(&hands).is_none() {
            return Err(DealingError::Source("deck is missing the two of clubs".into()).into());
        }
        self.install_hands(hands);
        event!(
            target: "hearts_core::game",
            Level::DEBUG,
            game = self.number,
            source = source.name(),
            direction = self.passing.direction().as_str(),
            "dealt"
        );
        Ok(())
    }

    fn install_hands(&mut self, hands: [Hand; 4]) {
        self.stats = Some(GameStats::from_hands(&hands));
        self.hands = hands;
        if self.passing.direction().requires_selection() {
            self.phase = GamePhase::Passing;
        } else {
            self.phase = GamePhase::SkipPassing;
            self.begin_first_trick();
        }
    }

    fn begin_first_trick(&mut self) {
        let leader = two_of_clubs_holder(&self.hands).unwrap_or(Seat::North);
        self.current_trick = Trick::new(1, leader);
        self.phase = GamePhase::FirstTrick;
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        !self.phase.is_terminal()
    }

    pub fn direction(&self) -> PassingDirection {
        self.passing.direction()
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub fn current_trick(&self) -> &Trick {
        &self.current_trick
    }

    pub fn tricks(&self) -> &[Trick] {
        &self.history
    }

    pub fn last_completed_trick(&self) -> Option<&Trick> {
        self.history.last()
    }

    pub fn trick_number(&self) -> u8 {
        self.current_trick.number()
    }

    pub fn leader(&self) -> Seat {
        self.current_trick.leader()
    }

    pub fn hearts_broken(&self) -> bool {
        self.hearts_broken
    }

    /// Points taken so far, before the moon rule.
    pub fn points(&self) -> [u32; 4] {
        self.points
    }

    pub fn final_scores(&self) -> Option<[u32; 4]> {
        self.final_scores
    }

    pub fn moon_shooter(&self) -> Option<Seat> {
        self.moon_shooter
    }

    pub fn stats(&self) -> Option<&GameStats> {
        self.stats.as_ref()
    }

    pub fn passes(&self) -> &[PassedCard] {
        self.passing.records()
    }

    pub fn has_passed(&self, seat: Seat) -> bool {
        self.passing.has_passed(seat)
    }

    /// Seats that still owe a pass; empty outside the passing phase.
    pub fn pending_passers(&self) -> Vec<Seat> {
        if self.phase != GamePhase::Passing {
            return Vec::new();
        }
        Seat::LOOP
            .iter()
            .copied()
            .filter(|seat| !self.passing.has_passed(*seat))
            .collect()
    }

    pub fn whose_turn(&self) -> Option<Seat> {
        if self.phase.is_trick_phase() {
            self.current_trick.expected_seat()
        } else {
            None
        }
    }

    pub fn submit_pass(&mut self, seat: Seat, cards: &[Card]) -> Result<(), RuleViolation> {
        if self.phase != GamePhase::Passing {
            let reason = if self.passing.direction().requires_selection() {
                PassRejection::NotPassingPhase
            } else {
                PassRejection::NoPassingThisGame
            };
            return Err(reason.into());
        }
        self.passing
            .submit(seat, cards, &mut self.hands[seat.index()])?;
        event!(
            target: "hearts_core::game",
            Level::DEBUG,
            game = self.number,
            seat = seat.number(),
            to = self.passing.direction().target(seat).number(),
            "pass submitted"
        );

        if self.passing.is_complete() {
            let delivered = self.passing.deliver(&mut self.hands);
            if let Some(stats) = self.stats.as_mut() {
                stats.record_passes(delivered);
            }
            self.begin_first_trick();
            event!(
                target: "hearts_core::game",
                Level::DEBUG,
                game = self.number,
                leader = self.leader().number(),
                "passes delivered"
            );
        }
        Ok(())
    }

    /// Rule checks in order: turn, ownership, first-trick limits, heart leads, following suit.
    pub fn validate_play(&self, seat: Seat, card: Card) -> Result<(), RuleViolation> {
        if !self.phase.is_trick_phase() {
            return Err(RuleViolation::WrongPhase(self.phase.as_str()));
        }
        if self.current_trick.expected_seat() != Some(seat) {
            return Err(RuleViolation::NotYourTurn(seat));
        }
        let hand = &self.hands[seat.index()];
        if !hand.contains(card) {
            return Err(RuleViolation::CardNotInHand(card));
        }

        let lead_suit = self.current_trick.lead_suit();
        if self.current_trick.number() == 1 {
            if lead_suit.is_none() && card != Card::TWO_OF_CLUBS {
                return Err(RuleViolation::MustLeadTwoOfClubs);
            }
            if card.is_penalty() && !hand.only_penalties() {
                return Err(RuleViolation::PointCardRestricted);
            }
        }

        match lead_suit {
            None => {
                if card.suit.is_heart() && !self.hearts_broken && !hand.only_hearts() {
                    return Err(RuleViolation::HeartsNotBroken);
                }
            }
            Some(suit) => {
                if card.suit != suit && hand.has_suit(suit) {
                    return Err(RuleViolation::MustFollowSuit(suit));
                }
            }
        }
        Ok(())
    }

    /// Exactly the cards `validate_play` accepts for `seat`, in hand order.
    pub fn legal_plays(&self, seat: Seat) -> Vec<Card> {
        self.hands[seat.index()]
            .iter()
            .copied()
            .filter(|card| self.validate_play(seat, *card).is_ok())
            .collect()
    }

    pub fn play_card(&mut self, seat: Seat, card: Card) -> Result<PlayOutcome, RuleViolation> {
        self.validate_play(seat, card)?;

        self.hands[seat.index()].remove(card);
        let lead_suit = self.current_trick.lead_suit();
        let trick_number = self.current_trick.number();
        let order = self.current_trick.push(seat, card);
        if let Some(stats) = self.stats.as_mut() {
            stats.record_play(seat, card, trick_number, order, lead_suit);
        }
        if card.is_penalty() && !self.hearts_broken {
            self.hearts_broken = true;
            event!(
                target: "hearts_core::game",
                Level::TRACE,
                game = self.number,
                trick = trick_number,
                card = %card,
                "hearts broken"
            );
        }

        if !self.current_trick.is_complete() {
            let next = self.current_trick.expected_seat().unwrap_or(seat.next());
            return Ok(PlayOutcome::Accepted { next });
        }

        let winner = self.current_trick.winner().unwrap_or(seat);
        let points = self.current_trick.points();
        self.points[winner.index()] += points as u32;
        if let Some(stats) = self.stats.as_mut() {
            stats.bill_trick(trick_number, winner);
        }
        event!(
            target: "hearts_core::game",
            Level::DEBUG,
            game = self.number,
            trick = trick_number,
            winner = winner.number(),
            points,
            "trick completed"
        );

        if trick_number >= TRICKS_PER_GAME {
            self.history.push(self.current_trick.clone());
            let (scores, moon_shooter) = settle_game(self.points);
            self.final_scores = Some(scores);
            self.moon_shooter = moon_shooter;
            self.phase = GamePhase::Result;
            event!(
                target: "hearts_core::game",
                Level::INFO,
                game = self.number,
                raw = ?self.points,
                scores = ?scores,
                moon = moon_shooter.map(Seat::number),
                "game scored"
            );
            return Ok(PlayOutcome::GameCompleted {
                winner,
                scores,
                moon_shooter,
            });
        }

        let next_number = trick_number + 1;
        let finished = std::mem::replace(&mut self.current_trick, Trick::new(next_number, winner));
        self.history.push(finished);
        self.phase = if next_number == TRICKS_PER_GAME {
            GamePhase::FinalTrick
        } else {
            GamePhase::NormalTrick
        };
        Ok(PlayOutcome::TrickCompleted { winner, points })
    }

    /// RESULT to FINISHED once the match has taken the scores. Stats are purged.
    pub(crate) fn finish(&mut self) {
        if self.phase == GamePhase::Result {
            self.phase = GamePhase::Finished;
            if let Some(stats) = self.stats.as_mut() {
                stats.purge();
            }
        }
    }

    pub(crate) fn abort(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = GamePhase::Aborted;
        }
    }

    /// Every card must sit in exactly one place: a hand, a pending pass, or a played trick.
    pub fn verify_deck(&self) -> Result<(), InvariantViolation> {
        if !self.phase.is_dealt() || self.phase.is_terminal() {
            return Ok(());
        }
        let in_transit: &[PassedCard] = if self.phase == GamePhase::Passing {
            self.passing.records()
        } else {
            &[]
        };

        let mut seen = [0u8; 52];
        let hand_cards = self.hands.iter().flat_map(|hand| hand.iter().copied());
        let pending = in_transit.iter().map(|record| record.card);
        let played = self
            .history
            .iter()
            .chain(
                (!self.history.last().is_some_and(|t| t.number() == self.current_trick.number()))
                    .then_some(&self.current_trick),
            )
            .flat_map(|trick| trick.cards());
        for card in hand_cards.chain(pending).chain(played) {
            seen[card.index()] += 1;
        }
        if let Some(index) = seen.iter().position(|count| *count != 1) {
            let card = Card::from_index(index)
                .map(|card| card.to_string())
                .unwrap_or_else(|| index.to_string());
            return Err(InvariantViolation::DeckIntegrityViolation(format!(
                "game {}: {card} appears {} times",
                self.number, seen[index]
            )));
        }

        if let Some(stats) = &self.stats {
            stats
                .check_against(&self.hands, in_transit)
                .map_err(|detail| {
                    InvariantViolation::DeckIntegrityViolation(format!(
                        "game {}: {detail}",
                        self.number
                    ))
                })?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn hand_mut(&mut self, seat: Seat) -> &mut Hand {
        &mut self.hands[seat.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::{Game, GamePhase, PlayOutcome};
    use crate::error::{EngineError, InvariantViolation, PassRejection, RuleViolation};
    use crate::game::deal::{DeckSource, LocalShuffle};
    use crate::error::DealingError;
    use crate::model::card::{Card, parse_card_list};
    use crate::model::deck::Deck;
    use crate::model::hand::Hand;
    use crate::model::passing::PassingDirection;
    use crate::model::player::Seat;
    use crate::model::suit::Suit;

    fn hand(list: &str) -> Hand {
        Hand::with_cards(parse_card_list(list).unwrap())
    }

    fn code(c: &str) -> Card {
        Card::from_code(c).unwrap()
    }

    /// North holds 2C; East is void in clubs with hearts; South holds Q♠ and
    /// only point cards apart from clubs; West holds the rest.
    fn crafted_hands() -> [Hand; 4] {
        [
            hand("2C,3C,4C,5C,2D,3D,4D,5D,6D,7D,8D,9D,0D"),
            hand("2H,3H,4H,5H,6H,JD,QD,KD,AD,2S,3S,4S,5S"),
            hand("6C,7C,8C,QS,7H,8H,9H,0H,JH,QH,KH,AH,6S"),
            hand("9C,0C,JC,QC,KC,AC,7S,8S,9S,0S,JS,KS,AS"),
        ]
    }

    struct FailingSource;

    impl DeckSource for FailingSource {
        fn acquire(&self, _seed: Option<u64>) -> Result<Deck, DealingError> {
            Err(DealingError::Source("offline".into()))
        }
    }

    #[test]
    fn hold_game_skips_passing_and_two_of_clubs_leads() {
        let game = Game::with_hands(4, crafted_hands());
        assert_eq!(game.direction(), PassingDirection::Hold);
        assert_eq!(game.phase(), GamePhase::FirstTrick);
        assert_eq!(game.whose_turn(), Some(Seat::North));
        assert_eq!(game.trick_number(), 1);
    }

    #[test]
    fn failed_deal_waits_and_can_be_retried() {
        let mut game = Game::new(1, Some(5));
        let err = game.deal(&FailingSource).unwrap_err();
        assert!(matches!(err, EngineError::Dealing(_)));
        assert_eq!(game.phase(), GamePhase::WaitingForExternalApi);

        game.deal(&LocalShuffle).unwrap();
        assert_eq!(game.phase(), GamePhase::Passing);
        for seat in Seat::LOOP {
            assert_eq!(game.hand(seat).len(), 13);
        }
        assert!(game.verify_deck().is_ok());
    }

    #[test]
    fn first_lead_must_be_two_of_clubs() {
        let mut game = Game::with_hands(4, crafted_hands());
        assert_eq!(
            game.play_card(Seat::North, code("3C")),
            Err(RuleViolation::MustLeadTwoOfClubs)
        );
        assert_eq!(
            game.play_card(Seat::East, code("2H")),
            Err(RuleViolation::NotYourTurn(Seat::East))
        );
        assert_eq!(game.legal_plays(Seat::North), vec![Card::TWO_OF_CLUBS]);
        assert!(game.play_card(Seat::North, Card::TWO_OF_CLUBS).is_ok());
    }

    #[test]
    fn void_follower_cannot_dump_points_on_first_trick() {
        let mut game = Game::with_hands(4, crafted_hands());
        game.play_card(Seat::North, Card::TWO_OF_CLUBS).unwrap();
        assert_eq!(
            game.play_card(Seat::East, code("2H")),
            Err(RuleViolation::PointCardRestricted)
        );
        let legal = game.legal_plays(Seat::East);
        assert!(legal.iter().all(|card| !card.is_penalty()));
        assert!(legal.contains(&code("JD")));
        assert!(game.play_card(Seat::East, code("JD")).is_ok());
    }

    #[test]
    fn follower_must_follow_suit() {
        let mut game = Game::with_hands(4, crafted_hands());
        game.play_card(Seat::North, Card::TWO_OF_CLUBS).unwrap();
        game.play_card(Seat::East, code("JD")).unwrap();
        assert_eq!(
            game.play_card(Seat::South, code("6S")),
            Err(RuleViolation::MustFollowSuit(Suit::Clubs))
        );
        assert_eq!(
            game.legal_plays(Seat::South),
            parse_card_list("6C,7C,8C").unwrap()
        );
    }

    #[test]
    fn rejected_play_leaves_state_untouched() {
        let mut game = Game::with_hands(4, crafted_hands());
        game.play_card(Seat::North, Card::TWO_OF_CLUBS).unwrap();
        let before_hand = game.hand(Seat::East).clone();
        let before_trick = game.current_trick().clone();
        let _ = game.play_card(Seat::East, code("2H"));
        assert_eq!(game.hand(Seat::East), &before_hand);
        assert_eq!(game.current_trick(), &before_trick);
        assert!(!game.hearts_broken());
    }

    #[test]
    fn hearts_cannot_be_led_until_broken() {
        let mut game = Game::with_hands(4, crafted_hands());
        game.play_card(Seat::North, code("2C")).unwrap();
        game.play_card(Seat::East, code("2S")).unwrap();
        game.play_card(Seat::South, code("6C")).unwrap();
        let outcome = game.play_card(Seat::West, code("AC")).unwrap();
        assert_eq!(
            outcome,
            PlayOutcome::TrickCompleted {
                winner: Seat::West,
                points: 0
            }
        );
        assert_eq!(game.phase(), GamePhase::NormalTrick);
        assert_eq!(game.leader(), Seat::West);
        assert_eq!(game.trick_number(), 2);

        game.play_card(Seat::West, code("7S")).unwrap();
        game.play_card(Seat::North, code("2D")).unwrap();
        game.play_card(Seat::East, code("3S")).unwrap();
        game.play_card(Seat::South, code("QS")).unwrap();
        assert!(game.hearts_broken());
        assert_eq!(game.points(), [0, 0, 13, 0]);
        assert_eq!(game.leader(), Seat::South);
    }

    #[test]
    fn heart_lead_rejected_before_break() {
        let mut hands = crafted_hands();
        // Give West a heart to lead after winning trick one.
        hands[Seat::West.index()] = hand("9C,0C,JC,QC,KC,AC,7S,8S,9S,0S,JS,KS,2H");
        hands[Seat::East.index()] = hand("AS,3H,4H,5H,6H,JD,QD,KD,AD,2S,3S,4S,5S");
        let mut game = Game::with_hands(4, hands);
        game.play_card(Seat::North, code("2C")).unwrap();
        game.play_card(Seat::East, code("JD")).unwrap();
        game.play_card(Seat::South, code("6C")).unwrap();
        game.play_card(Seat::West, code("AC")).unwrap();
        assert_eq!(
            game.play_card(Seat::West, code("2H")),
            Err(RuleViolation::HeartsNotBroken)
        );
        assert!(!game.legal_plays(Seat::West).contains(&code("2H")));
    }

    #[test]
    fn all_point_hand_may_play_points_on_first_trick() {
        let mut hands = crafted_hands();
        hands[Seat::East.index()] = hand("2H,3H,4H,5H,6H,7H,8H,9H,0H,JH,QH,KH,AH");
        hands[Seat::South.index()] = hand("6C,7C,8C,QS,JD,QD,KD,AD,2S,3S,4S,5S,6S");
        let mut game = Game::with_hands(4, hands);
        game.play_card(Seat::North, code("2C")).unwrap();
        assert!(game.play_card(Seat::East, code("AH")).is_ok());
        assert!(game.hearts_broken());
    }

    #[test]
    fn pass_submission_in_hold_game_is_rejected() {
        let mut game = Game::with_hands(4, crafted_hands());
        assert_eq!(
            game.submit_pass(Seat::North, &parse_card_list("3C,4C,5C").unwrap()),
            Err(RuleViolation::InvalidPass(PassRejection::NoPassingThisGame))
        );
    }

    #[test]
    fn passes_are_delivered_when_all_four_submit() {
        let mut game = Game::with_hands(2, crafted_hands());
        assert_eq!(game.direction(), PassingDirection::Right);
        assert_eq!(game.phase(), GamePhase::Passing);
        assert_eq!(game.whose_turn(), None);

        game.submit_pass(Seat::North, &parse_card_list("2C,3C,4C").unwrap())
            .unwrap();
        assert_eq!(game.hand(Seat::North).len(), 10);
        assert!(game.verify_deck().is_ok());
        assert_eq!(
            game.pending_passers(),
            vec![Seat::East, Seat::South, Seat::West]
        );

        game.submit_pass(Seat::East, &parse_card_list("2H,3H,4H").unwrap())
            .unwrap();
        game.submit_pass(Seat::South, &parse_card_list("QS,AH,KH").unwrap())
            .unwrap();
        game.submit_pass(Seat::West, &parse_card_list("AC,KC,QC").unwrap())
            .unwrap();

        assert_eq!(game.phase(), GamePhase::FirstTrick);
        // Right means North passes to West, who now leads with the two of clubs.
        assert!(game.hand(Seat::West).contains(Card::TWO_OF_CLUBS));
        assert_eq!(game.whose_turn(), Some(Seat::West));
        assert!(game.hand(Seat::South).contains(code("AC")));
        let stats = game.stats().unwrap();
        assert_eq!(stats.holder(Card::QUEEN_OF_SPADES), Some(Seat::East));
        for seat in Seat::LOOP {
            assert_eq!(game.hand(seat).len(), 13);
        }
        assert!(game.verify_deck().is_ok());
    }

    #[test]
    fn duplicated_card_breaks_deck_integrity() {
        let mut game = Game::with_hands(4, crafted_hands());
        game.hand_mut(Seat::East).add(Card::TWO_OF_CLUBS);
        assert!(matches!(
            game.verify_deck(),
            Err(InvariantViolation::DeckIntegrityViolation(_))
        ));
    }

    #[test]
    fn full_game_by_legal_plays_reaches_result() {
        let mut game = Game::new(4, Some(11));
        game.deal(&LocalShuffle).unwrap();
        let mut completed = None;
        while let Some(seat) = game.whose_turn() {
            let card = game.legal_plays(seat)[0];
            if let PlayOutcome::GameCompleted { scores, .. } = game.play_card(seat, card).unwrap() {
                completed = Some(scores);
            }
            assert!(game.verify_deck().is_ok());
        }
        assert_eq!(game.phase(), GamePhase::Result);
        assert_eq!(game.tricks().len(), 13);
        assert_eq!(game.points().iter().sum::<u32>(), 26);
        let scores = completed.unwrap();
        assert_eq!(Some(scores), game.final_scores());
        for seat in Seat::LOOP {
            assert!(game.hand(seat).is_empty());
        }
        game.finish();
        assert_eq!(game.phase(), GamePhase::Finished);
        assert!(game.stats().unwrap().is_purged());
    }
}
