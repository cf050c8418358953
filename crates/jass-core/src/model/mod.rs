pub mod card;
pub mod card_set;
pub mod deck;
pub mod error;
pub mod player;
pub mod rank;
pub mod score;
pub mod suit;
pub mod trick;
pub mod turn_state;

pub const HAND_SIZE: usize = 9;
pub const TRICKS_PER_TURN: u32 = 9;
/// A team reaching this many total points wins the match.
pub const WINNING_POINTS: u32 = 1000;
/// Bonus for taking all nine tricks of a turn.
pub const MATCH_ADDITIONAL_POINTS: u32 = 100;
pub const LAST_TRICK_ADDITIONAL_POINTS: u32 = 5;
/// Card points of one turn including the last-trick bonus.
pub const TURN_POINTS: u32 = 157;
