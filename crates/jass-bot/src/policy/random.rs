use super::{Player, PlayerError};
use jass_core::model::card::Card;
use jass_core::model::card_set::CardSet;
use jass_core::model::turn_state::TurnState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Plays a uniformly random legal card.
#[derive(Debug, Clone)]
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn card_to_play(&mut self, state: &TurnState, hand: CardSet) -> Result<Card, PlayerError> {
        let legal = state.trick().playable_cards(hand);
        if legal.is_empty() {
            return Err(PlayerError::NoPlayableCard { hand });
        }
        legal
            .get(self.rng.gen_range(0..legal.size()))
            .ok_or(PlayerError::NoPlayableCard { hand })
    }
}
