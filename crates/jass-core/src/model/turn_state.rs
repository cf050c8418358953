use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::error::ModelError;
use crate::model::player::PlayerId;
use crate::model::score::Score;
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use std::fmt;

/// Score, current trick and unplayed cards of one turn.
///
/// Every transition returns a new value; a state whose trick is [`Trick::INVALID`] is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnState {
    score: Score,
    unplayed: CardSet,
    trick: Trick,
}

impl TurnState {
    /// Start of a turn: every card is unplayed and `first_player` leads.
    pub fn initial(trump: Suit, score: Score, first_player: PlayerId) -> Self {
        Self {
            score,
            unplayed: CardSet::ALL_CARDS,
            trick: Trick::first_empty(trump, first_player),
        }
    }

    pub fn from_packed_components(
        score: u64,
        unplayed: u64,
        trick: u32,
    ) -> Result<Self, ModelError> {
        let trick = if trick == Trick::INVALID.packed() {
            Trick::INVALID
        } else {
            Trick::from_packed(trick)?
        };
        Ok(Self {
            score: Score::from_packed(score)?,
            unplayed: CardSet::from_packed(unplayed)?,
            trick,
        })
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn unplayed_cards(&self) -> CardSet {
        self.unplayed
    }

    pub fn trick(&self) -> Trick {
        self.trick
    }

    pub fn packed_score(&self) -> u64 {
        self.score.packed()
    }

    pub fn packed_unplayed_cards(&self) -> u64 {
        self.unplayed.packed()
    }

    pub fn packed_trick(&self) -> u32 {
        self.trick.packed()
    }

    pub fn is_terminal(&self) -> bool {
        self.trick == Trick::INVALID
    }

    /// Player expected to add the next card to the current trick.
    pub fn next_player(&self) -> Result<PlayerId, ModelError> {
        if self.is_terminal() {
            return Err(ModelError::TurnOver);
        }
        if self.trick.is_full() {
            return Err(ModelError::TrickFull);
        }
        Ok(self.trick.leader().offset(self.trick.size()))
    }

    pub fn with_new_card_played(&self, card: Card) -> Result<Self, ModelError> {
        Ok(Self {
            score: self.score,
            unplayed: self.unplayed.remove(card),
            trick: self.trick.with_added_card(card)?,
        })
    }

    /// Credits the winner of the full current trick and opens the next one.
    pub fn with_trick_collected(&self) -> Result<Self, ModelError> {
        if self.is_terminal() {
            return Err(ModelError::TurnOver);
        }
        let winner = self.trick.winning_player().ok_or(ModelError::TrickNotFull)?;
        let next = self.trick.next_empty()?;
        let played = CardSet::of(self.trick.cards());
        Ok(Self {
            score: self
                .score
                .with_additional_trick(winner.team(), self.trick.points()),
            unplayed: self.unplayed.difference(played),
            trick: next,
        })
    }

    /// Plays `card`, collecting the trick when it was the fourth card.
    pub fn with_new_card_played_and_trick_collected(
        &self,
        card: Card,
    ) -> Result<Self, ModelError> {
        let played = self.with_new_card_played(card)?;
        if played.trick.is_full() {
            played.with_trick_collected()
        } else {
            Ok(played)
        }
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_terminal() {
            write!(f, "score {} | turn over", self.score)
        } else {
            write!(
                f,
                "score {} | trick #{} {} trump {} | {} unplayed",
                self.score,
                self.trick.index(),
                self.trick,
                self.trick.trump(),
                self.unplayed.size()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TurnState;
    use crate::model::card::Card;
    use crate::model::card_set::CardSet;
    use crate::model::error::ModelError;
    use crate::model::player::{PlayerId, TeamId};
    use crate::model::rank::Rank;
    use crate::model::score::Score;
    use crate::model::suit::Suit;
    use crate::model::trick::Trick;

    fn play_all(state: TurnState, cards: &[Card]) -> TurnState {
        cards.iter().fold(state, |state, &card| {
            state.with_new_card_played_and_trick_collected(card).unwrap()
        })
    }

    // One card of `rank` per suit, in suit order.
    fn rank_trick(rank: Rank) -> [Card; 4] {
        Suit::ALL.map(|suit| Card::new(suit, rank))
    }

    #[test]
    fn initial_state_has_every_card_unplayed() {
        let state = TurnState::initial(Suit::Clubs, Score::INITIAL, PlayerId::Player2);
        assert_eq!(state.unplayed_cards(), CardSet::ALL_CARDS);
        assert_eq!(state.trick().trump(), Suit::Clubs);
        assert_eq!(state.next_player(), Ok(PlayerId::Player2));
        assert!(!state.is_terminal());
    }

    #[test]
    fn playing_a_card_advances_next_player() {
        let state = TurnState::initial(Suit::Clubs, Score::INITIAL, PlayerId::Player4);
        let card = Card::new(Suit::Hearts, Rank::Ace);
        let next = state.with_new_card_played(card).unwrap();
        assert!(!next.unplayed_cards().contains(card));
        assert_eq!(next.trick().card(0), Some(card));
        assert_eq!(next.next_player(), Ok(PlayerId::Player1));
        // The original value is untouched.
        assert_eq!(state.trick().size(), 0);
    }

    #[test]
    fn full_trick_must_be_collected_before_playing_on() {
        let state = TurnState::initial(Suit::Spades, Score::INITIAL, PlayerId::Player1);
        let full = rank_trick(Rank::Six)
            .iter()
            .try_fold(state, |state, &card| state.with_new_card_played(card))
            .unwrap();
        assert_eq!(full.next_player(), Err(ModelError::TrickFull));
        assert_eq!(
            full.with_new_card_played(Card::new(Suit::Spades, Rank::Ace)),
            Err(ModelError::TrickFull)
        );
        assert_eq!(state.with_trick_collected(), Err(ModelError::TrickNotFull));
    }

    #[test]
    fn collecting_credits_winner_and_opens_next_trick() {
        let state = TurnState::initial(Suit::Diamonds, Score::INITIAL, PlayerId::Player1);
        // ♠K ♡K ♢K ♣K: the trump king played by player 3 wins.
        let collected = play_all(state, &rank_trick(Rank::King));
        assert_eq!(collected.score().turn_tricks(TeamId::Team1), 1);
        assert_eq!(collected.score().turn_points(TeamId::Team1), 16);
        assert_eq!(collected.score().turn_points(TeamId::Team2), 0);
        assert_eq!(collected.trick().index(), 1);
        assert_eq!(collected.trick().leader(), PlayerId::Player3);
        assert_eq!(collected.unplayed_cards().size(), 32);
    }

    #[test]
    fn ninth_trick_ends_the_turn() {
        let mut state = TurnState::initial(Suit::Spades, Score::INITIAL, PlayerId::Player1);
        for rank in Rank::ORDERED {
            // The leader always plays the spade.
            state = play_all(state, &rank_trick(rank));
        }
        assert!(state.is_terminal());
        assert_eq!(state.trick(), Trick::INVALID);
        assert!(state.unplayed_cards().is_empty());
        assert_eq!(state.next_player(), Err(ModelError::TurnOver));
        assert_eq!(state.with_trick_collected(), Err(ModelError::TurnOver));

        // Player 1 leads the spade every time, so team 1 wins all tricks and the match bonus.
        let score = state.score();
        assert_eq!(score.turn_tricks(TeamId::Team1), 9);
        assert_eq!(score.turn_points(TeamId::Team1), 257);
        assert_eq!(score.turn_points(TeamId::Team2), 0);
    }

    #[test]
    fn packed_components_round_trip() {
        let state = play_all(
            TurnState::initial(Suit::Hearts, Score::INITIAL, PlayerId::Player2),
            &[Card::new(Suit::Clubs, Rank::Ten), Card::new(Suit::Clubs, Rank::Ace)],
        );
        let restored = TurnState::from_packed_components(
            state.packed_score(),
            state.packed_unplayed_cards(),
            state.packed_trick(),
        )
        .unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn packed_components_accept_terminal_trick() {
        let restored =
            TurnState::from_packed_components(0, 0, Trick::INVALID.packed()).unwrap();
        assert!(restored.is_terminal());
        assert!(TurnState::from_packed_components(0, u64::MAX, 0).is_err());
    }
}
