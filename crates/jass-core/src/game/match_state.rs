use crate::model::WINNING_POINTS;
use crate::model::card::Card;
use crate::model::card_set::CardSet;
use crate::model::deck::Deck;
use crate::model::error::ModelError;
use crate::model::player::{PlayerId, TeamId};
use crate::model::rank::Rank;
use crate::model::score::Score;
use crate::model::suit::Suit;
use crate::model::trick::Trick;
use crate::model::turn_state::TurnState;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use thiserror::Error;

const FIRST_LEAD_CARD: Card = Card::new(Suit::Diamonds, Rank::Seven);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("the match is already over")]
    GameOver,
    #[error("{player} does not hold {card}")]
    NotInHand { player: PlayerId, card: Card },
    #[error("{card} is not a legal play for {player}")]
    IllegalCard { player: PlayerId, card: Card },
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// A full trick as it lay on the table before being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrickSummary {
    pub trick: Trick,
    pub winner: PlayerId,
    pub points: u32,
}

impl TrickSummary {
    pub fn team(&self) -> TeamId {
        self.winner.team()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayOutcome {
    pub player: PlayerId,
    pub card: Card,
    /// Set when the card completed a trick.
    pub trick: Option<TrickSummary>,
    /// Score at the end of the turn, before turn points move to game points.
    pub completed_turn: Option<Score>,
    pub winner: Option<TeamId>,
}

/// Owns the hands and the current [`TurnState`] of a seeded match.
#[derive(Debug, Clone)]
pub struct MatchState {
    seed: u64,
    shuffle_rng: StdRng,
    trump_rng: StdRng,
    hands: [CardSet; PlayerId::COUNT],
    turn_state: TurnState,
    turn_number: u32,
    first_player: PlayerId,
    winner: Option<TeamId>,
}

impl MatchState {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut shuffle_rng = StdRng::seed_from_u64(rng.next_u64());
        let mut trump_rng = StdRng::seed_from_u64(rng.next_u64());

        let hands = Deck::shuffled(&mut shuffle_rng).deal();
        let first_player = PlayerId::ALL
            .into_iter()
            .find(|player| hands[player.index()].contains(FIRST_LEAD_CARD))
            .unwrap_or(PlayerId::Player1);
        let trump = Self::draw_trump(&mut trump_rng);

        Self {
            seed,
            shuffle_rng,
            trump_rng,
            hands,
            turn_state: TurnState::initial(trump, Score::INITIAL, first_player),
            turn_number: 0,
            first_player,
            winner: None,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn turn_state(&self) -> &TurnState {
        &self.turn_state
    }

    pub fn score(&self) -> Score {
        self.turn_state.score()
    }

    pub fn trump(&self) -> Suit {
        self.turn_state.trick().trump()
    }

    pub fn hand(&self, player: PlayerId) -> CardSet {
        self.hands[player.index()]
    }

    pub fn hands(&self) -> &[CardSet; PlayerId::COUNT] {
        &self.hands
    }

    /// Zero-based number of the turn being played.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winning_team(&self) -> Option<TeamId> {
        self.winner
    }

    pub fn expected_player(&self) -> Result<PlayerId, MatchError> {
        if self.is_game_over() {
            return Err(MatchError::GameOver);
        }
        Ok(self.turn_state.next_player()?)
    }

    /// Plays `card` for the player on move, collecting the trick and dealing the next turn
    /// as needed. Nothing changes when an error is returned.
    pub fn play_card(&mut self, card: Card) -> Result<PlayOutcome, MatchError> {
        let player = self.expected_player()?;
        let hand = self.hand(player);
        if !hand.contains(card) {
            return Err(MatchError::NotInHand { player, card });
        }
        if !self.turn_state.trick().playable_cards(hand).contains(card) {
            return Err(MatchError::IllegalCard { player, card });
        }

        let played = self.turn_state.with_new_card_played(card)?;
        let mut outcome = PlayOutcome {
            player,
            card,
            trick: None,
            completed_turn: None,
            winner: None,
        };
        if !played.trick().is_full() {
            self.hands[player.index()] = hand.remove(card);
            self.turn_state = played;
            return Ok(outcome);
        }

        let full = played.trick();
        let winner = full.winning_player().ok_or(ModelError::TrickNotFull)?;
        let collected = played.with_trick_collected()?;
        self.hands[player.index()] = hand.remove(card);
        outcome.trick = Some(TrickSummary {
            trick: full,
            winner,
            points: full.points(),
        });

        let team = winner.team();
        if collected.score().total_points(team) >= WINNING_POINTS {
            self.winner = Some(team);
            outcome.winner = Some(team);
            self.turn_state = collected;
            return Ok(outcome);
        }

        if collected.is_terminal() {
            outcome.completed_turn = Some(collected.score());
            self.start_next_turn(collected.score().next_turn());
        } else {
            self.turn_state = collected;
        }
        Ok(outcome)
    }

    fn start_next_turn(&mut self, score: Score) {
        self.turn_number += 1;
        self.hands = Deck::shuffled(&mut self.shuffle_rng).deal();
        let trump = Self::draw_trump(&mut self.trump_rng);
        let leader = self.first_player.offset(self.turn_number as usize);
        self.turn_state = TurnState::initial(trump, score, leader);
    }

    fn draw_trump(rng: &mut StdRng) -> Suit {
        Suit::ALL[rng.gen_range(0..Suit::COUNT)]
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{FIRST_LEAD_CARD, MatchError, MatchState};
    use crate::model::TURN_POINTS;
    use crate::model::card_set::CardSet;
    use crate::model::player::{PlayerId, TeamId};

    // Plays the lowest legal card for whoever is on move.
    fn play_lowest(state: &mut MatchState) -> super::PlayOutcome {
        let player = state.expected_player().unwrap();
        let legal = state
            .turn_state()
            .trick()
            .playable_cards(state.hand(player));
        let card = legal.get(0).unwrap();
        state.play_card(card).unwrap()
    }

    #[test]
    fn seven_of_diamonds_leads_first_turn() {
        let state = MatchState::with_seed(11);
        let leader = state.expected_player().unwrap();
        assert!(state.hand(leader).contains(FIRST_LEAD_CARD));
        assert_eq!(state.turn_number(), 0);
        assert_eq!(state.turn_state().unplayed_cards(), CardSet::ALL_CARDS);
    }

    #[test]
    fn same_seed_deals_same_match() {
        let a = MatchState::with_seed(99);
        let b = MatchState::with_seed(99);
        assert_eq!(a.hands(), b.hands());
        assert_eq!(a.trump(), b.trump());
        assert_ne!(a.hands(), MatchState::with_seed(100).hands());
    }

    #[test]
    fn rejects_card_not_in_hand() {
        let mut state = MatchState::with_seed(5);
        let player = state.expected_player().unwrap();
        let foreign = state.hand(player.next()).get(0).unwrap();
        assert_eq!(
            state.play_card(foreign),
            Err(MatchError::NotInHand {
                player,
                card: foreign
            })
        );
        assert_eq!(state.hand(player).size(), 9);
    }

    #[test]
    fn rejects_illegal_card() {
        // Find a position where the second player must follow and holds an off-suit card.
        for seed in 0..200 {
            let mut state = MatchState::with_seed(seed);
            play_lowest(&mut state);
            let player = state.expected_player().unwrap();
            let hand = state.hand(player);
            let legal = state.turn_state().trick().playable_cards(hand);
            if let Some(illegal) = hand.difference(legal).get(0) {
                assert_eq!(
                    state.play_card(illegal),
                    Err(MatchError::IllegalCard {
                        player,
                        card: illegal
                    })
                );
                return;
            }
        }
        panic!("no seed produced a constrained second hand");
    }

    #[test]
    fn first_turn_distributes_all_points() {
        let mut state = MatchState::with_seed(3);
        let first = state.expected_player().unwrap();
        let mut tricks = 0;
        let completed = loop {
            let outcome = play_lowest(&mut state);
            if outcome.trick.is_some() {
                tricks += 1;
            }
            if let Some(score) = outcome.completed_turn {
                break score;
            }
        };
        assert_eq!(tricks, 9);
        let total = completed.turn_points(TeamId::Team1) + completed.turn_points(TeamId::Team2);
        assert!(total == TURN_POINTS || total == TURN_POINTS + 100);

        assert_eq!(state.turn_number(), 1);
        assert_eq!(state.expected_player().unwrap(), first.next());
        assert_eq!(state.score().game_points(TeamId::Team1), completed.turn_points(TeamId::Team1));
        assert_eq!(state.score().turn_tricks(TeamId::Team1), 0);
        for player in PlayerId::ALL {
            assert_eq!(state.hand(player).size(), 9);
        }
    }

    #[test]
    fn match_ends_once_a_team_reaches_winning_points() {
        let mut state = MatchState::with_seed(21);
        let mut plays = 0;
        while !state.is_game_over() {
            play_lowest(&mut state);
            plays += 1;
            assert!(plays < 36 * 40, "match did not terminate");
        }
        let winner = state.winning_team().unwrap();
        assert!(state.score().total_points(winner) >= 1000);
        assert!(state.score().total_points(winner.other()) < 1000);
        assert_eq!(state.expected_player(), Err(MatchError::GameOver));
    }
}
