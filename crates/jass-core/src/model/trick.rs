use crate::bits::bits32;
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::error::{ModelError, PackedKind};
use crate::model::player::PlayerId;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::model::{LAST_TRICK_ADDITIONAL_POINTS, TRICKS_PER_TURN};
use std::fmt;

const CARDS_PER_TRICK: usize = PlayerId::COUNT;
const CARD_SIZE: u32 = Card::PACKED_SIZE;
const CARDS_SIZE: u32 = CARD_SIZE * CARDS_PER_TRICK as u32;
const INDEX_START: u32 = 24;
const INDEX_SIZE: u32 = 4;
const LEADER_START: u32 = 28;
const LEADER_SIZE: u32 = 2;
const TRUMP_START: u32 = 30;
const TRUMP_SIZE: u32 = 2;
const LAST_INDEX: u32 = TRICKS_PER_TURN - 1;
const EMPTY_CARDS: u32 = bits32::mask(0, CARDS_SIZE);

/// A trick packed into 32 bits.
///
/// Bits 0..24 hold up to four 6-bit cards in play order, empty slots holding
/// [`Card::INVALID_PACKED`]. Above them sit the trick index (4 bits), the leading player
/// (2 bits) and the trump suit (2 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trick(u32);

impl Trick {
    /// Sentinel following the last trick of a turn.
    pub const INVALID: Trick = Trick(u32::MAX);

    pub fn first_empty(trump: Suit, leader: PlayerId) -> Self {
        Self::empty(trump, leader, 0)
    }

    const fn empty(trump: Suit, leader: PlayerId, index: u32) -> Self {
        Trick(
            (trump as u32) << TRUMP_START
                | (leader as u32) << LEADER_START
                | index << INDEX_START
                | EMPTY_CARDS,
        )
    }

    pub fn is_valid_packed(packed: u32) -> bool {
        if bits32::extract(packed, INDEX_START, INDEX_SIZE) > LAST_INDEX {
            return false;
        }
        let mut seen_empty = false;
        for slot in 0..CARDS_PER_TRICK {
            let card = Self::slot(packed, slot);
            if card == Card::INVALID_PACKED {
                seen_empty = true;
            } else if seen_empty || !Card::is_valid_packed(card) {
                return false;
            }
        }
        true
    }

    pub fn from_packed(packed: u32) -> Result<Self, ModelError> {
        if Self::is_valid_packed(packed) {
            Ok(Trick(packed))
        } else {
            Err(ModelError::invalid(PackedKind::Trick, packed))
        }
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    /// The empty trick that follows this full one, led by its winner.
    ///
    /// Returns [`Trick::INVALID`] after the last trick of the turn.
    pub fn next_empty(self) -> Result<Trick, ModelError> {
        if !self.is_full() {
            return Err(ModelError::TrickNotFull);
        }
        if self.is_last() {
            return Ok(Trick::INVALID);
        }
        let winner = self.winning_player().ok_or(ModelError::TrickNotFull)?;
        Ok(Self::empty(self.trump(), winner, self.index() + 1))
    }

    pub fn is_empty(self) -> bool {
        Self::slot(self.0, 0) == Card::INVALID_PACKED
    }

    pub fn is_full(self) -> bool {
        self != Trick::INVALID && Self::slot(self.0, CARDS_PER_TRICK - 1) != Card::INVALID_PACKED
    }

    pub fn is_last(self) -> bool {
        self.index() == LAST_INDEX
    }

    pub fn size(self) -> usize {
        (0..CARDS_PER_TRICK)
            .take_while(|&slot| Self::slot(self.0, slot) != Card::INVALID_PACKED)
            .count()
    }

    pub fn trump(self) -> Suit {
        match bits32::extract(self.0, TRUMP_START, TRUMP_SIZE) {
            0 => Suit::Spades,
            1 => Suit::Hearts,
            2 => Suit::Diamonds,
            _ => Suit::Clubs,
        }
    }

    pub fn index(self) -> u32 {
        bits32::extract(self.0, INDEX_START, INDEX_SIZE)
    }

    pub fn leader(self) -> PlayerId {
        PlayerId::Player1.offset(bits32::extract(self.0, LEADER_START, LEADER_SIZE) as usize)
    }

    /// The player who plays the `index`-th card of this trick.
    pub fn player(self, index: usize) -> Option<PlayerId> {
        (index < CARDS_PER_TRICK).then(|| self.leader().offset(index))
    }

    pub fn card(self, index: usize) -> Option<Card> {
        if index >= self.size() {
            return None;
        }
        Card::from_packed(Self::slot(self.0, index)).ok()
    }

    pub fn cards(self) -> impl Iterator<Item = Card> {
        (0..self.size()).filter_map(move |index| self.card(index))
    }

    pub fn base_suit(self) -> Option<Suit> {
        self.card(0).map(Card::suit)
    }

    pub fn with_added_card(self, card: Card) -> Result<Self, ModelError> {
        if self == Trick::INVALID {
            return Err(ModelError::TurnOver);
        }
        if self.is_full() {
            return Err(ModelError::TrickFull);
        }
        let start = self.size() as u32 * CARD_SIZE;
        let cleared = self.0 & !bits32::mask(start, CARD_SIZE);
        Ok(Trick(cleared | card.packed() << start))
    }

    /// Points carried by the cards of this trick, plus the bonus on the last trick.
    pub fn points(self) -> u32 {
        let trump = self.trump();
        let cards: u32 = self.cards().map(|card| card.points(trump)).sum();
        if self.is_last() {
            cards + LAST_TRICK_ADDITIONAL_POINTS
        } else {
            cards
        }
    }

    pub fn winning_player(self) -> Option<PlayerId> {
        self.winning_index().and_then(|index| self.player(index))
    }

    fn winning_card(self) -> Option<Card> {
        self.winning_index().and_then(|index| self.card(index))
    }

    // A later card replaces the provisional winner only if strictly better.
    fn winning_index(self) -> Option<usize> {
        let trump = self.trump();
        let mut cards = self.cards().enumerate();
        let (mut best_index, mut best) = cards.next()?;
        for (index, card) in cards {
            if card.is_better(trump, best) {
                best_index = index;
                best = card;
            }
        }
        Some(best_index)
    }

    /// The subset of `hand` the next player may legally play into this trick.
    pub fn playable_cards(self, hand: CardSet) -> CardSet {
        let (Some(base), Some(winning)) = (self.base_suit(), self.winning_card()) else {
            return hand;
        };
        let trump = self.trump();
        let trumps = hand.subset_of_suit(trump);
        let follow = hand.subset_of_suit(base);
        let trump_winning = winning.suit() == trump;
        let overtrumps = if trump_winning {
            trumps.intersection(CardSet::trump_above(winning))
        } else {
            CardSet::EMPTY
        };

        if !follow.is_empty() {
            let lone_jack = CardSet::singleton(Card::new(trump, Rank::Jack));
            if follow == trumps && trumps == lone_jack {
                // The jack of trump never has to follow.
                return hand;
            }
            if !overtrumps.is_empty() {
                return overtrumps.union(follow);
            }
            return follow;
        }

        if trumps.is_empty() || !trump_winning {
            return hand;
        }

        let others = hand.difference(trumps);
        match (overtrumps.is_empty(), others.is_empty()) {
            (false, false) => overtrumps.union(others),
            (false, true) => overtrumps,
            // No undertrumping while another card is available.
            (true, false) => others,
            (true, true) => trumps,
        }
    }

    const fn slot(packed: u32, slot: usize) -> u32 {
        bits32::extract(packed, slot as u32 * CARD_SIZE, CARD_SIZE)
    }
}

impl fmt::Display for Trick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, card) in self.cards().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{card}")?;
        }
        f.write_str("}")
    }
}
