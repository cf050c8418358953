use crate::bits::bits32;
use crate::model::error::{ModelError, PackedKind};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;

const RANK_START: u32 = 0;
const RANK_SIZE: u32 = 4;
const SUIT_START: u32 = 4;
const SUIT_SIZE: u32 = 2;
const CARD_SIZE: u32 = RANK_SIZE + SUIT_SIZE;

/// A card packed into six bits: rank in bits 0..4, suit in bits 4..6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card(u8);

impl Card {
    /// Packed value of an empty trick slot. Never a valid card.
    pub const INVALID_PACKED: u32 = 0b11_1111;
    pub const PACKED_SIZE: u32 = CARD_SIZE;

    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Card(((suit as u8) << SUIT_START) | ((rank as u8) << RANK_START))
    }

    pub const fn is_valid_packed(packed: u32) -> bool {
        bits32::extract(packed, RANK_START, RANK_SIZE) < Rank::COUNT as u32
            && bits32::extract(packed, CARD_SIZE, bits32::WIDTH - CARD_SIZE) == 0
    }

    pub fn from_packed(packed: u32) -> Result<Self, ModelError> {
        if Self::is_valid_packed(packed) {
            Ok(Card(packed as u8))
        } else {
            Err(ModelError::invalid(PackedKind::Card, packed))
        }
    }

    pub const fn packed(self) -> u32 {
        self.0 as u32
    }

    pub const fn suit(self) -> Suit {
        match bits32::extract(self.0 as u32, SUIT_START, SUIT_SIZE) {
            0 => Suit::Spades,
            1 => Suit::Hearts,
            2 => Suit::Diamonds,
            _ => Suit::Clubs,
        }
    }

    pub const fn rank(self) -> Rank {
        match bits32::extract(self.0 as u32, RANK_START, RANK_SIZE) {
            0 => Rank::Six,
            1 => Rank::Seven,
            2 => Rank::Eight,
            3 => Rank::Nine,
            4 => Rank::Ten,
            5 => Rank::Jack,
            6 => Rank::Queen,
            7 => Rank::King,
            _ => Rank::Ace,
        }
    }

    /// Whether `self` beats `other` when `trump` is the trump suit.
    ///
    /// Cards of different suits only beat each other through trump; `self` is assumed to be
    /// played after `other`, so an off-suit discard never wins.
    pub fn is_better(self, trump: Suit, other: Card) -> bool {
        if self.suit() == other.suit() {
            if self.suit() == trump {
                self.rank().trump_ordinal() > other.rank().trump_ordinal()
            } else {
                self.rank() > other.rank()
            }
        } else {
            self.suit() == trump
        }
    }

    pub fn points(self, trump: Suit) -> u32 {
        let is_trump = self.suit() == trump;
        match self.rank() {
            Rank::Nine if is_trump => 14,
            Rank::Jack if is_trump => 20,
            Rank::Jack => 2,
            Rank::Ten => 10,
            Rank::Queen => 3,
            Rank::King => 4,
            Rank::Ace => 11,
            Rank::Six | Rank::Seven | Rank::Eight | Rank::Nine => 0,
        }
    }

    /// Bit index of this card inside a packed card set.
    pub(crate) const fn set_index(self) -> u32 {
        self.suit() as u32 * 16 + self.rank() as u32
    }

    /// Inverse of [`Card::set_index`]; `index` must be a valid card-set bit position.
    pub(crate) const fn from_set_index(index: u32) -> Card {
        Card((((index / 16) << SUIT_START) | (index % 16)) as u8)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit(), self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::Card;
    use crate::model::error::ModelError;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn every_card_roundtrips_through_its_fields() {
        for suit in Suit::ALL {
            for rank in Rank::ORDERED {
                let card = Card::new(suit, rank);
                assert!(Card::is_valid_packed(card.packed()));
                assert_eq!(card.suit(), suit);
                assert_eq!(card.rank(), rank);
                assert_eq!(Card::from_packed(card.packed()), Ok(card));
            }
        }
    }

    #[test]
    fn packed_layout_puts_suit_above_rank() {
        let card = Card::new(Suit::Diamonds, Rank::King);
        assert_eq!(card.packed(), 0b10_0111);
    }

    #[test]
    fn malformed_packed_values_are_rejected() {
        assert!(!Card::is_valid_packed(Card::INVALID_PACKED));
        assert!(!Card::is_valid_packed(0b1001));
        assert!(!Card::is_valid_packed(0b100_0000));
        assert!(matches!(
            Card::from_packed(0b1111),
            Err(ModelError::InvalidPacked { .. })
        ));
    }

    #[test]
    fn trump_beats_higher_off_suit_card() {
        let trump = Suit::Hearts;
        let six_of_trump = Card::new(Suit::Hearts, Rank::Six);
        let ace_of_spades = Card::new(Suit::Spades, Rank::Ace);
        assert!(six_of_trump.is_better(trump, ace_of_spades));
        assert!(!ace_of_spades.is_better(trump, six_of_trump));
    }

    #[test]
    fn trump_ranks_use_trump_order() {
        let trump = Suit::Clubs;
        let nine = Card::new(Suit::Clubs, Rank::Nine);
        let ace = Card::new(Suit::Clubs, Rank::Ace);
        let jack = Card::new(Suit::Clubs, Rank::Jack);
        assert!(nine.is_better(trump, ace));
        assert!(jack.is_better(trump, nine));
        let plain_nine = Card::new(Suit::Spades, Rank::Nine);
        let plain_ace = Card::new(Suit::Spades, Rank::Ace);
        assert!(plain_ace.is_better(trump, plain_nine));
    }

    #[test]
    fn off_suit_discard_never_wins() {
        let trump = Suit::Spades;
        let led = Card::new(Suit::Hearts, Rank::Six);
        let discard = Card::new(Suit::Clubs, Rank::Ace);
        assert!(!discard.is_better(trump, led));
    }

    #[test]
    fn points_depend_on_trump() {
        let jack = Card::new(Suit::Hearts, Rank::Jack);
        let nine = Card::new(Suit::Hearts, Rank::Nine);
        assert_eq!(jack.points(Suit::Hearts), 20);
        assert_eq!(jack.points(Suit::Spades), 2);
        assert_eq!(nine.points(Suit::Hearts), 14);
        assert_eq!(nine.points(Suit::Spades), 0);
        assert_eq!(Card::new(Suit::Clubs, Rank::Ace).points(Suit::Spades), 11);
        assert_eq!(Card::new(Suit::Clubs, Rank::Ten).points(Suit::Clubs), 10);
    }

    #[test]
    fn display_joins_suit_and_rank() {
        assert_eq!(Card::new(Suit::Spades, Rank::Ace).to_string(), "♠A");
        assert_eq!(Card::new(Suit::Hearts, Rank::Ten).to_string(), "♡10");
    }
}
