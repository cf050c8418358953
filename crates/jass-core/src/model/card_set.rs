use crate::model::card::Card;
use crate::model::error::{ModelError, PackedKind};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;

const SUIT_STRIDE: u32 = 16;
const SUIT_MASK: u64 = 0b1_1111_1111;

/// A set of cards packed into 64 bits: one 16-bit group per suit, one bit per rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CardSet(u64);

const TRUMP_ABOVE: [CardSet; 36] = build_trump_above();

const fn trump_ordinal_at(rank_index: usize) -> u8 {
    match Rank::from_index(rank_index) {
        Some(rank) => rank.trump_ordinal(),
        None => 0,
    }
}

// Trump order is not monotonic in bit position, hence a table.
const fn build_trump_above() -> [CardSet; 36] {
    let mut table = [CardSet::EMPTY; 36];
    let mut suit = 0;
    while suit < Suit::COUNT {
        let mut rank = 0;
        while rank < Rank::COUNT {
            let mut above = 0u64;
            let mut other = 0;
            while other < Rank::COUNT {
                if trump_ordinal_at(other) > trump_ordinal_at(rank) {
                    above |= 1 << (suit * SUIT_STRIDE as usize + other);
                }
                other += 1;
            }
            table[suit * Rank::COUNT + rank] = CardSet(above);
            rank += 1;
        }
        suit += 1;
    }
    table
}

impl CardSet {
    pub const EMPTY: CardSet = CardSet(0);
    pub const ALL_CARDS: CardSet = CardSet(
        SUIT_MASK | SUIT_MASK << SUIT_STRIDE | SUIT_MASK << (2 * SUIT_STRIDE) | SUIT_MASK << (3 * SUIT_STRIDE),
    );

    pub const fn is_valid_packed(packed: u64) -> bool {
        packed & !Self::ALL_CARDS.0 == 0
    }

    pub fn from_packed(packed: u64) -> Result<Self, ModelError> {
        if Self::is_valid_packed(packed) {
            Ok(CardSet(packed))
        } else {
            Err(ModelError::invalid(PackedKind::CardSet, packed))
        }
    }

    pub const fn packed(self) -> u64 {
        self.0
    }

    pub const fn singleton(card: Card) -> Self {
        CardSet(1 << card.set_index())
    }

    pub fn of<I: IntoIterator<Item = Card>>(cards: I) -> Self {
        cards.into_iter().collect()
    }

    /// Trump cards of `card`'s suit that outrank it when that suit is trump.
    pub fn trump_above(card: Card) -> Self {
        TRUMP_ABOVE[card.suit().index() * Rank::COUNT + card.rank().index()]
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn size(self) -> usize {
        self.0.count_ones() as usize
    }

    /// The `index`-th card in increasing bit order (suit-major, rank-minor).
    pub fn get(self, index: usize) -> Option<Card> {
        self.iter().nth(index)
    }

    pub const fn add(self, card: Card) -> Self {
        CardSet(self.0 | Self::singleton(card).0)
    }

    pub const fn remove(self, card: Card) -> Self {
        CardSet(self.0 & !Self::singleton(card).0)
    }

    pub const fn contains(self, card: Card) -> bool {
        self.0 & Self::singleton(card).0 != 0
    }

    pub const fn complement(self) -> Self {
        CardSet(Self::ALL_CARDS.0 ^ self.0)
    }

    pub const fn union(self, other: CardSet) -> Self {
        CardSet(self.0 | other.0)
    }

    pub const fn intersection(self, other: CardSet) -> Self {
        CardSet(self.0 & other.0)
    }

    pub const fn difference(self, other: CardSet) -> Self {
        CardSet(self.0 & !other.0)
    }

    pub const fn subset_of_suit(self, suit: Suit) -> Self {
        CardSet(self.0 & (SUIT_MASK << (suit as u32 * SUIT_STRIDE)))
    }

    pub const fn iter(self) -> CardSetIter {
        CardSetIter { bits: self.0 }
    }
}

/// Cards of a [`CardSet`] in increasing bit order.
#[derive(Debug, Clone)]
pub struct CardSetIter {
    bits: u64,
}

impl Iterator for CardSetIter {
    type Item = Card;

    fn next(&mut self) -> Option<Card> {
        if self.bits == 0 {
            return None;
        }
        let position = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        Some(Card::from_set_index(position))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits.count_ones() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CardSetIter {}

impl IntoIterator for CardSet {
    type Item = Card;
    type IntoIter = CardSetIter;

    fn into_iter(self) -> CardSetIter {
        self.iter()
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        iter.into_iter().fold(CardSet::EMPTY, CardSet::add)
    }
}

impl fmt::Display for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, card) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{card}")?;
        }
        f.write_str("}")
    }
}
