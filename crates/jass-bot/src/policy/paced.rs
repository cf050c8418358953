use super::{Player, PlayerError};
use jass_core::model::card::Card;
use jass_core::model::card_set::CardSet;
use jass_core::model::player::{PlayerId, TeamId};
use jass_core::model::score::Score;
use jass_core::model::suit::Suit;
use jass_core::model::trick::Trick;
use jass_core::model::turn_state::TurnState;
use std::thread;
use std::time::{Duration, Instant};

/// Wraps a player so that each decision takes at least `min_time` of wall-clock time.
#[derive(Debug)]
pub struct PacedPlayer<P> {
    inner: P,
    min_time: Duration,
}

impl<P: Player> PacedPlayer<P> {
    pub fn new(inner: P, min_time: Duration) -> Self {
        Self { inner, min_time }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Player> Player for PacedPlayer<P> {
    fn card_to_play(&mut self, state: &TurnState, hand: CardSet) -> Result<Card, PlayerError> {
        let started = Instant::now();
        let card = self.inner.card_to_play(state, hand)?;
        if let Some(remaining) = self.min_time.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
        Ok(card)
    }

    fn set_players(&mut self, own_id: PlayerId, names: &[String; PlayerId::COUNT]) {
        self.inner.set_players(own_id, names);
    }

    fn update_hand(&mut self, hand: CardSet) {
        self.inner.update_hand(hand);
    }

    fn set_trump(&mut self, trump: Suit) {
        self.inner.set_trump(trump);
    }

    fn update_trick(&mut self, trick: Trick) {
        self.inner.update_trick(trick);
    }

    fn update_score(&mut self, score: Score) {
        self.inner.update_score(score);
    }

    fn set_winning_team(&mut self, team: TeamId) {
        self.inner.set_winning_team(team);
    }
}
