use crate::model::HAND_SIZE;
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::player::PlayerId;
use rand::seq::SliceRandom;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    fn standard() -> Self {
        Self {
            cards: CardSet::ALL_CARDS.iter().collect(),
        }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.cards.shuffle(rng);
        deck
    }

    /// Consecutive runs of nine cards, one per player in seat order.
    pub fn deal(&self) -> [CardSet; PlayerId::COUNT] {
        let mut hands = [CardSet::EMPTY; PlayerId::COUNT];
        for (hand, cards) in hands.iter_mut().zip(self.cards.chunks(HAND_SIZE)) {
            *hand = CardSet::of(cards.iter().copied());
        }
        hands
    }
}
