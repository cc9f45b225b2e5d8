use super::mask::SeatMask;
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::passing::PassedCard;
use crate::model::player::Seat;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// Per-card record for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStat {
    pub card: Card,
    /// `None` once the card has been played.
    pub holder: Option<Seat>,
    pub possible: SeatMask,
    /// 0 while unplayed.
    pub trick_number: u8,
    /// 1..=4 within its trick, 0 while unplayed.
    pub play_order: u8,
    pub points: u8,
    pub billed_to: Option<Seat>,
}

impl CardStat {
    fn dealt(card: Card, seat: Seat) -> Self {
        Self {
            card,
            holder: Some(seat),
            possible: SeatMask::only(seat),
            trick_number: 0,
            play_order: 0,
            points: card.penalty_value(),
            billed_to: None,
        }
    }

    pub fn rank(&self) -> Rank {
        self.card.rank
    }

    pub fn suit(&self) -> Suit {
        self.card.suit
    }

    /// Holder as a wire number: seat 1..=4, or 0 once played.
    pub fn holder_number(&self) -> u8 {
        self.holder.map(Seat::number).unwrap_or(0)
    }

    pub fn is_played(&self) -> bool {
        self.holder.is_none()
    }
}

/// Card-possibility tracker for one game.
///
/// The stored records are the engine's ground truth. [`GameStats::observer_mask`]
/// derives what a single seat can infer from public information plus its own
/// hand and passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    records: Vec<CardStat>,
    voids: [[bool; 4]; 4],
    passes: Vec<PassedCard>,
    purged: bool,
}

impl GameStats {
    pub fn from_hands(hands: &[Hand; 4]) -> Self {
        let mut records: Vec<Option<CardStat>> = vec![None; 52];
        for seat in Seat::LOOP {
            for card in hands[seat.index()].iter().copied() {
                records[card.index()] = Some(CardStat::dealt(card, seat));
            }
        }
        let records = records
            .into_iter()
            .enumerate()
            .map(|(index, stat)| {
                stat.unwrap_or_else(|| {
                    let card = Card::from_index(index).unwrap_or(Card::TWO_OF_CLUBS);
                    CardStat {
                        holder: None,
                        possible: SeatMask::EMPTY,
                        ..CardStat::dealt(card, Seat::North)
                    }
                })
            })
            .collect();
        Self {
            records,
            voids: [[false; 4]; 4],
            passes: Vec::new(),
            purged: false,
        }
    }

    pub fn is_purged(&self) -> bool {
        self.purged
    }

    /// Drops the per-card records once the game result has been handed off.
    pub fn purge(&mut self) {
        self.records.clear();
        self.passes.clear();
        self.purged = true;
    }

    pub fn records(&self) -> &[CardStat] {
        &self.records
    }

    pub fn get(&self, card: Card) -> Option<&CardStat> {
        self.records.get(card.index())
    }

    pub fn holder(&self, card: Card) -> Option<Seat> {
        self.get(card).and_then(|stat| stat.holder)
    }

    pub fn is_played(&self, card: Card) -> bool {
        self.get(card).map(CardStat::is_played).unwrap_or(true)
    }

    pub fn record_passes(&mut self, passes: &[PassedCard]) {
        for pass in passes {
            if let Some(stat) = self.records.get_mut(pass.card.index()) {
                stat.holder = Some(pass.to);
                stat.possible = SeatMask::only(pass.to);
            }
        }
        self.passes.extend_from_slice(passes);
    }

    /// Marks a card played. A seat that fails to follow the led suit is publicly void in it.
    pub fn record_play(
        &mut self,
        seat: Seat,
        card: Card,
        trick_number: u8,
        play_order: u8,
        lead_suit: Option<Suit>,
    ) {
        if let Some(stat) = self.records.get_mut(card.index()) {
            stat.holder = None;
            stat.possible = SeatMask::EMPTY;
            stat.trick_number = trick_number;
            stat.play_order = play_order;
        }
        if let Some(lead) = lead_suit {
            if lead != card.suit {
                self.voids[seat.index()][lead.index()] = true;
            }
        }
    }

    pub fn bill_trick(&mut self, trick_number: u8, winner: Seat) {
        for stat in self
            .records
            .iter_mut()
            .filter(|stat| stat.trick_number == trick_number)
        {
            stat.billed_to = Some(winner);
        }
    }

    pub fn is_void(&self, seat: Seat, suit: Suit) -> bool {
        self.voids[seat.index()][suit.index()]
    }

    pub fn void_matrix(&self) -> [[bool; 4]; 4] {
        self.voids
    }

    /// Who `observer` can consider a possible holder of `card`.
    pub fn observer_mask(&self, observer: Seat, card: Card) -> SeatMask {
        let Some(stat) = self.get(card) else {
            return SeatMask::EMPTY;
        };
        if stat.is_played() {
            return SeatMask::EMPTY;
        }
        if stat.holder == Some(observer) {
            return SeatMask::only(observer);
        }
        if let Some(pass) = self
            .passes
            .iter()
            .find(|pass| pass.from == observer && pass.card == card)
        {
            return SeatMask::only(pass.to);
        }
        let mut mask = SeatMask::ALL.without(observer);
        for seat in Seat::LOOP {
            if self.is_void(seat, card.suit) {
                mask = mask.without(seat);
            }
        }
        mask
    }

    /// Unplayed cards outside `observer`'s hand.
    pub fn unseen_by(&self, observer: Seat) -> Vec<Card> {
        self.records
            .iter()
            .filter(|stat| !stat.is_played() && stat.holder != Some(observer))
            .map(|stat| stat.card)
            .collect()
    }

    pub fn points_billed(&self) -> [u32; 4] {
        let mut totals = [0u32; 4];
        for stat in &self.records {
            if let Some(seat) = stat.billed_to {
                totals[seat.index()] += stat.points as u32;
            }
        }
        totals
    }

    /// Checks the holder column against the hands; returns the first mismatch.
    pub fn check_against(&self, hands: &[Hand; 4], in_transit: &[PassedCard]) -> Result<(), String> {
        if self.purged {
            return Ok(());
        }
        for stat in &self.records {
            let holders: Vec<Seat> = Seat::LOOP
                .iter()
                .copied()
                .filter(|seat| hands[seat.index()].contains(stat.card))
                .collect();
            let moving = in_transit.iter().any(|pass| pass.card == stat.card);
            match (stat.holder, holders.as_slice(), moving) {
                (None, [], false) => {}
                (Some(_), [], true) => {}
                (Some(holder), [seat], false) if holder == *seat => {}
                _ => {
                    return Err(format!(
                        "{} recorded at holder {} but found in {:?} (in transit: {moving})",
                        stat.card,
                        stat.holder_number(),
                        holders.iter().map(|seat| seat.number()).collect::<Vec<_>>()
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::GameStats;
    use crate::model::card::Card;
    use crate::model::deck::Deck;
    use crate::model::hand::Hand;
    use crate::model::passing::PassedCard;
    use crate::model::player::Seat;
    use crate::model::suit::Suit;
    use crate::stats::SeatMask;
    use std::array;

    fn dealt_hands() -> [Hand; 4] {
        let deck = Deck::standard();
        array::from_fn(|i| {
            Hand::with_cards(deck.cards().iter().skip(i).step_by(4).copied().collect())
        })
    }

    fn code(c: &str) -> Card {
        Card::from_code(c).unwrap()
    }

    #[test]
    fn deal_creates_one_record_per_card_with_single_bit() {
        let hands = dealt_hands();
        let stats = GameStats::from_hands(&hands);
        assert_eq!(stats.records().len(), 52);
        for seat in Seat::LOOP {
            for card in hands[seat.index()].iter().copied() {
                let stat = stats.get(card).unwrap();
                assert_eq!(stat.holder, Some(seat));
                assert_eq!(stat.possible, SeatMask::only(seat));
                assert_eq!(stat.trick_number, 0);
                assert_eq!(stat.play_order, 0);
            }
        }
        assert_eq!(stats.get(Card::QUEEN_OF_SPADES).unwrap().points, 13);
        assert_eq!(stats.get(code("2H")).unwrap().points, 1);
        assert!(stats.check_against(&hands, &[]).is_ok());
    }

    #[test]
    fn play_clears_holder_and_records_position() {
        let hands = dealt_hands();
        let mut stats = GameStats::from_hands(&hands);
        stats.record_play(Seat::North, Card::TWO_OF_CLUBS, 1, 1, None);
        let stat = stats.get(Card::TWO_OF_CLUBS).unwrap();
        assert_eq!(stat.holder_number(), 0);
        assert!(stat.possible.is_empty());
        assert_eq!((stat.trick_number, stat.play_order), (1, 1));
        assert!(stats.observer_mask(Seat::East, Card::TWO_OF_CLUBS).is_empty());
    }

    #[test]
    fn failing_to_follow_marks_public_void() {
        let hands = dealt_hands();
        let mut stats = GameStats::from_hands(&hands);
        stats.record_play(Seat::East, code("7H"), 2, 2, Some(Suit::Diamonds));
        assert!(stats.is_void(Seat::East, Suit::Diamonds));

        let unseen_diamond = hands[Seat::South.index()]
            .iter()
            .copied()
            .find(|card| card.suit == Suit::Diamonds)
            .unwrap();
        let mask = stats.observer_mask(Seat::North, unseen_diamond);
        assert!(!mask.contains(Seat::North));
        assert!(!mask.contains(Seat::East));
        assert!(mask.contains(Seat::South));
        assert!(mask.contains(Seat::West));
    }

    #[test]
    fn passer_knows_where_passed_cards_went() {
        let hands = dealt_hands();
        let mut stats = GameStats::from_hands(&hands);
        let card = hands[Seat::North.index()].cards()[0];
        let pass = PassedCard {
            game_number: 1,
            from: Seat::North,
            to: Seat::East,
            card,
        };
        stats.record_passes(&[pass]);
        assert_eq!(stats.holder(card), Some(Seat::East));
        assert_eq!(stats.observer_mask(Seat::North, card), SeatMask::only(Seat::East));
        assert_eq!(
            stats.observer_mask(Seat::South, card),
            SeatMask::ALL.without(Seat::South)
        );
    }

    #[test]
    fn billing_follows_trick_winner() {
        let hands = dealt_hands();
        let mut stats = GameStats::from_hands(&hands);
        for (order, (seat, c)) in [
            (Seat::North, "2C"),
            (Seat::East, "5C"),
            (Seat::South, "KH"),
            (Seat::West, "AC"),
        ]
        .into_iter()
        .enumerate()
        {
            let lead = (order > 0).then_some(Suit::Clubs);
            stats.record_play(seat, code(c), 1, order as u8 + 1, lead);
        }
        stats.bill_trick(1, Seat::West);
        assert_eq!(stats.get(code("KH")).unwrap().billed_to, Some(Seat::West));
        assert_eq!(stats.points_billed(), [0, 0, 0, 1]);
    }

    #[test]
    fn purge_drops_records() {
        let hands = dealt_hands();
        let mut stats = GameStats::from_hands(&hands);
        stats.purge();
        assert!(stats.is_purged());
        assert!(stats.records().is_empty());
        assert!(stats.get(Card::TWO_OF_CLUBS).is_none());
    }
}
