mod logging;
mod paced;
mod random;

pub use logging::LoggingPlayer;
pub use paced::PacedPlayer;
pub use random::RandomPlayer;

use jass_core::model::card::Card;
use jass_core::model::card_set::CardSet;
use jass_core::model::error::ModelError;
use jass_core::model::player::{PlayerId, TeamId};
use jass_core::model::score::Score;
use jass_core::model::suit::Suit;
use jass_core::model::trick::Trick;
use jass_core::model::turn_state::TurnState;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error("no playable card in {hand}")]
    NoPlayableCard { hand: CardSet },
    #[error("{player} is not on move")]
    NotOnMove { player: PlayerId },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A seat at the table, driven by the match orchestrator.
///
/// Only [`Player::card_to_play`] is required; the notification hooks default to no-ops.
pub trait Player: Send {
    /// Chooses a card from `state.trick().playable_cards(hand)`.
    fn card_to_play(&mut self, state: &TurnState, hand: CardSet) -> Result<Card, PlayerError>;

    fn set_players(&mut self, _own_id: PlayerId, _names: &[String; PlayerId::COUNT]) {}

    fn update_hand(&mut self, _hand: CardSet) {}

    fn set_trump(&mut self, _trump: Suit) {}

    fn update_trick(&mut self, _trick: Trick) {}

    fn update_score(&mut self, _score: Score) {}

    fn set_winning_team(&mut self, _team: TeamId) {}
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn card_to_play(&mut self, state: &TurnState, hand: CardSet) -> Result<Card, PlayerError> {
        (**self).card_to_play(state, hand)
    }

    fn set_players(&mut self, own_id: PlayerId, names: &[String; PlayerId::COUNT]) {
        (**self).set_players(own_id, names);
    }

    fn update_hand(&mut self, hand: CardSet) {
        (**self).update_hand(hand);
    }

    fn set_trump(&mut self, trump: Suit) {
        (**self).set_trump(trump);
    }

    fn update_trick(&mut self, trick: Trick) {
        (**self).update_trick(trick);
    }

    fn update_score(&mut self, score: Score) {
        (**self).update_score(score);
    }

    fn set_winning_team(&mut self, team: TeamId) {
        (**self).set_winning_team(team);
    }
}
