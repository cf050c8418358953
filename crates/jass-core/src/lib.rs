//! Packed card, score and trick codecs for Schieber Jass, the rules engine built on them,
//! and a seeded match driver.

pub mod bits;
pub mod game;
pub mod model;
