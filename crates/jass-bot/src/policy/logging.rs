use super::{Player, PlayerError};
use jass_core::model::card::Card;
use jass_core::model::card_set::CardSet;
use jass_core::model::player::{PlayerId, TeamId};
use jass_core::model::score::Score;
use jass_core::model::suit::Suit;
use jass_core::model::trick::Trick;
use jass_core::model::turn_state::TurnState;
use tracing::{Level, event};

/// Wraps a player and reports everything it sees and plays on the `jass_bot::table` target.
#[derive(Debug)]
pub struct LoggingPlayer<P> {
    inner: P,
    seat: Option<PlayerId>,
}

impl<P: Player> LoggingPlayer<P> {
    pub fn new(inner: P) -> Self {
        Self { inner, seat: None }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }

    fn seat_label(&self) -> String {
        self.seat
            .map(|seat| seat.to_string())
            .unwrap_or_else(|| "unseated".to_string())
    }
}

impl<P: Player> Player for LoggingPlayer<P> {
    fn card_to_play(&mut self, state: &TurnState, hand: CardSet) -> Result<Card, PlayerError> {
        let result = self.inner.card_to_play(state, hand);
        if tracing::enabled!(target: "jass_bot::table", Level::INFO) {
            match &result {
                Ok(card) => event!(
                    target: "jass_bot::table",
                    Level::INFO,
                    seat = %self.seat_label(),
                    hand = %hand,
                    trick = %state.trick(),
                    card = %card,
                    "card played"
                ),
                Err(err) => event!(
                    target: "jass_bot::table",
                    Level::WARN,
                    seat = %self.seat_label(),
                    hand = %hand,
                    error = %err,
                    "no card chosen"
                ),
            }
        }
        result
    }

    fn set_players(&mut self, own_id: PlayerId, names: &[String; PlayerId::COUNT]) {
        self.seat = Some(own_id);
        event!(
            target: "jass_bot::table",
            Level::INFO,
            seat = %own_id,
            players = %names.join(", "),
            "players seated"
        );
        self.inner.set_players(own_id, names);
    }

    fn update_hand(&mut self, hand: CardSet) {
        event!(target: "jass_bot::table", Level::INFO, seat = %self.seat_label(), hand = %hand, "hand");
        self.inner.update_hand(hand);
    }

    fn set_trump(&mut self, trump: Suit) {
        event!(target: "jass_bot::table", Level::INFO, seat = %self.seat_label(), trump = %trump, "trump");
        self.inner.set_trump(trump);
    }

    fn update_trick(&mut self, trick: Trick) {
        event!(
            target: "jass_bot::table",
            Level::INFO,
            seat = %self.seat_label(),
            index = trick.index(),
            trick = %trick,
            "trick"
        );
        self.inner.update_trick(trick);
    }

    fn update_score(&mut self, score: Score) {
        event!(target: "jass_bot::table", Level::INFO, seat = %self.seat_label(), score = %score, "score");
        self.inner.update_score(score);
    }

    fn set_winning_team(&mut self, team: TeamId) {
        event!(target: "jass_bot::table", Level::INFO, seat = %self.seat_label(), team = %team, "match won");
        self.inner.set_winning_team(team);
    }
}

#[cfg(test)]
mod tests {
    use super::LoggingPlayer;
    use crate::policy::{Player, RandomPlayer};
    use jass_core::model::card_set::CardSet;
    use jass_core::model::player::PlayerId;
    use jass_core::model::score::Score;
    use jass_core::model::suit::Suit;
    use jass_core::model::turn_state::TurnState;

    #[test]
    fn forwards_decisions_unchanged() {
        let state = TurnState::initial(Suit::Diamonds, Score::INITIAL, PlayerId::Player2);
        let hand: CardSet = CardSet::ALL_CARDS.iter().skip(9).take(9).collect();
        let names = ["a", "b", "c", "d"].map(String::from);

        let mut plain = RandomPlayer::new(8);
        let mut logged = LoggingPlayer::new(RandomPlayer::new(8));
        logged.set_players(PlayerId::Player2, &names);
        logged.set_trump(Suit::Diamonds);
        for _ in 0..5 {
            assert_eq!(
                logged.card_to_play(&state, hand),
                plain.card_to_play(&state, hand)
            );
        }
    }
}
