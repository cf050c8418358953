pub mod game;
pub mod mcts;
pub mod policy;

pub use game::{GameError, JassGame};
pub use mcts::{MctsConfig, MctsConfigError, MctsPlayer};
pub use policy::{LoggingPlayer, PacedPlayer, Player, PlayerError, RandomPlayer};
