//! Monte Carlo Tree Search over determinized playouts of the current turn.
//!
//! Hidden cards are pooled: any opponent may play any unplayed card outside the searching
//! player's hand. Each node stores the player whose card led to it, and its value is kept
//! from that player's team's point of view so UCB1 maximises for whoever is choosing.

mod config;
mod tree;

pub use config::{MIN_ITERATIONS, MctsConfig, MctsConfigError};

use crate::policy::{Player, PlayerError};
use jass_core::model::TURN_POINTS;
use jass_core::model::card::Card;
use jass_core::model::card_set::CardSet;
use jass_core::model::player::{PlayerId, TeamId};
use jass_core::model::turn_state::TurnState;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{Level, event};
use tree::{Node, NodeId, Tree};

#[derive(Debug, Clone)]
pub struct MctsPlayer {
    own_id: PlayerId,
    rng: StdRng,
    config: MctsConfig,
}

impl MctsPlayer {
    pub fn new(own_id: PlayerId, seed: u64, iterations: usize) -> Result<Self, MctsConfigError> {
        Self::with_config(own_id, seed, MctsConfig::with_iterations(iterations))
    }

    pub fn with_config(
        own_id: PlayerId,
        seed: u64,
        config: MctsConfig,
    ) -> Result<Self, MctsConfigError> {
        config.validate()?;
        Ok(Self {
            own_id,
            rng: StdRng::seed_from_u64(seed),
            config,
        })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    fn team(&self) -> TeamId {
        self.own_id.team()
    }

    /// Moves available from `state`: own legal cards on our move, otherwise the legal part
    /// of the hidden pool.
    fn legal_moves(&self, state: &TurnState, hand: CardSet) -> Result<CardSet, PlayerError> {
        if state.is_terminal() {
            return Ok(CardSet::EMPTY);
        }
        let candidates = if state.next_player()? == self.own_id {
            hand
        } else {
            state.unplayed_cards().difference(hand)
        };
        Ok(state.trick().playable_cards(candidates))
    }

    fn random_card(&mut self, cards: CardSet) -> Result<Card, PlayerError> {
        if cards.is_empty() {
            return Err(PlayerError::NoPlayableCard { hand: cards });
        }
        cards
            .get(self.rng.gen_range(0..cards.size()))
            .ok_or(PlayerError::NoPlayableCard { hand: cards })
    }

    /// Plays the turn out at random and returns our team's turn points.
    fn rollout(&mut self, mut state: TurnState, mut hand: CardSet) -> Result<u32, PlayerError> {
        while !state.is_terminal() {
            let legal = self.legal_moves(&state, hand)?;
            let card = self.random_card(legal)?;
            hand = hand.remove(card);
            state = state.with_new_card_played_and_trick_collected(card)?;
        }
        Ok(state.score().turn_points(self.team()))
    }

    fn value_for(&self, mover: Option<PlayerId>, points: u32) -> f64 {
        match mover {
            Some(player) if player.team() != self.team() => {
                f64::from(TURN_POINTS) - f64::from(points)
            }
            _ => f64::from(points),
        }
    }

    fn select(&self, tree: &Tree) -> Vec<NodeId> {
        let mut path = vec![Tree::root()];
        let mut current = Tree::root();
        while tree.node(current).unused.is_empty() {
            match tree.best_child(current, self.config.exploration) {
                Some((_, child)) => {
                    path.push(child);
                    current = child;
                }
                // Terminal state: nothing left to expand.
                None => break,
            }
        }
        path
    }

    fn iterate(&mut self, tree: &mut Tree) -> Result<(), PlayerError> {
        let mut path = self.select(tree);
        let leaf = *path.last().unwrap_or(&Tree::root());
        let (state, hand, unused) = {
            let node = tree.node(leaf);
            (node.state, node.hand, node.unused)
        };

        let points = if unused.is_empty() {
            self.rollout(state, hand)?
        } else {
            let card = self.random_card(unused)?;
            tree.node_mut(leaf).unused = unused.remove(card);
            let mover = state.next_player()?;
            let child_state = state.with_new_card_played_and_trick_collected(card)?;
            let child_hand = hand.remove(card);
            let child_unused = self.legal_moves(&child_state, child_hand)?;
            let points = self.rollout(child_state, child_hand)?;
            let child = tree.add_child(
                leaf,
                card,
                Node::new(child_state, child_hand, child_unused, Some(mover)),
            );
            path.push(child);
            points
        };

        for &id in path.iter().rev() {
            let value = self.value_for(tree.node(id).mover, points);
            let node = tree.node_mut(id);
            node.visits += 1;
            node.total += value;
        }
        Ok(())
    }
}

impl Player for MctsPlayer {
    fn card_to_play(&mut self, state: &TurnState, hand: CardSet) -> Result<Card, PlayerError> {
        if hand.size() == 1 {
            return hand.get(0).ok_or(PlayerError::NoPlayableCard { hand });
        }
        let on_move = state.next_player()?;
        if on_move != self.own_id {
            return Err(PlayerError::NotOnMove {
                player: self.own_id,
            });
        }
        let legal = self.legal_moves(state, hand)?;
        if legal.size() <= 1 {
            return legal.get(0).ok_or(PlayerError::NoPlayableCard { hand });
        }

        let mut tree = Tree::with_root(Node::new(*state, hand, legal, None));
        tree.node_mut(Tree::root()).visits = 1;
        for _ in 1..self.config.iterations {
            self.iterate(&mut tree)?;
        }

        let (card, child) = tree
            .best_child(Tree::root(), 0.0)
            .ok_or(PlayerError::NoPlayableCard { hand })?;

        if tracing::enabled!(target: "jass_bot::mcts", Level::DEBUG) {
            let node = tree.node(child);
            event!(
                target: "jass_bot::mcts",
                Level::DEBUG,
                seat = %self.own_id,
                iterations = self.config.iterations,
                nodes = tree.len(),
                legal = %legal,
                card = %card,
                visits = node.visits,
                average = node.total / f64::from(node.visits.max(1)),
            );
        }
        Ok(card)
    }
}
