use crate::policy::{Player, PlayerError};
use jass_core::game::match_state::{MatchError, MatchState, PlayOutcome};
use jass_core::model::player::{PlayerId, TeamId};
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{player} failed to choose a card: {source}")]
    Player {
        player: PlayerId,
        #[source]
        source: PlayerError,
    },
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Drives four players through a [`MatchState`], keeping them informed through their hooks.
pub struct JassGame {
    state: MatchState,
    players: [Box<dyn Player>; PlayerId::COUNT],
    names: [String; PlayerId::COUNT],
    seated: bool,
    announced_turn: Option<u32>,
}

impl JassGame {
    pub fn new(
        seed: u64,
        players: [Box<dyn Player>; PlayerId::COUNT],
        names: [String; PlayerId::COUNT],
    ) -> Self {
        Self {
            state: MatchState::with_seed(seed),
            players,
            names,
            seated: false,
            announced_turn: None,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn winning_team(&self) -> Option<TeamId> {
        self.state.winning_team()
    }

    /// Plays cards until the current trick is complete and returns the outcome of its last card.
    pub fn advance_to_end_of_next_trick(&mut self) -> Result<PlayOutcome, GameError> {
        if self.state.is_game_over() {
            return Err(MatchError::GameOver.into());
        }
        self.announce_turn();

        loop {
            let seat = self.state.expected_player()?;
            let hand = self.state.hand(seat);
            let card = self.players[seat.index()]
                .card_to_play(self.state.turn_state(), hand)
                .map_err(|source| GameError::Player {
                    player: seat,
                    source,
                })?;
            let outcome = self.state.play_card(card)?;
            self.players[seat.index()].update_hand(hand.remove(card));

            let Some(summary) = outcome.trick else {
                let trick = self.state.turn_state().trick();
                self.each_player(|player| player.update_trick(trick));
                continue;
            };

            self.each_player(|player| player.update_trick(summary.trick));
            let score = self.state.score();
            self.each_player(|player| player.update_score(score));
            event!(
                target: "jass_bot::game",
                Level::DEBUG,
                trick = %summary.trick,
                index = summary.trick.index(),
                winner = %summary.winner,
                points = summary.points,
            );

            if let Some(turn_score) = outcome.completed_turn {
                event!(
                    target: "jass_bot::game",
                    Level::INFO,
                    turn = self.state.turn_number(),
                    score = %turn_score,
                    "turn completed"
                );
            }
            if let Some(team) = outcome.winner {
                event!(
                    target: "jass_bot::game",
                    Level::INFO,
                    team = %team,
                    score = %score,
                    "match won"
                );
                self.each_player(|player| player.set_winning_team(team));
            }
            return Ok(outcome);
        }
    }

    /// Plays tricks until one team reaches the winning total.
    pub fn play_to_end(&mut self) -> Result<TeamId, GameError> {
        loop {
            let outcome = self.advance_to_end_of_next_trick()?;
            if let Some(team) = outcome.winner {
                return Ok(team);
            }
        }
    }

    fn announce_turn(&mut self) {
        if !self.seated {
            for seat in PlayerId::ALL {
                self.players[seat.index()].set_players(seat, &self.names);
            }
            self.seated = true;
        }
        let turn = self.state.turn_number();
        if self.announced_turn == Some(turn) {
            return;
        }
        self.announced_turn = Some(turn);

        let trump = self.state.trump();
        let score = self.state.score();
        let trick = self.state.turn_state().trick();
        for seat in PlayerId::ALL {
            let hand = self.state.hand(seat);
            let player = &mut self.players[seat.index()];
            player.set_trump(trump);
            player.update_hand(hand);
            player.update_trick(trick);
            player.update_score(score);
        }
    }

    fn each_player(&mut self, mut notify: impl FnMut(&mut dyn Player)) {
        for player in self.players.iter_mut() {
            notify(&mut **player);
        }
    }
}
