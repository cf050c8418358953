//! Unsigned base-16 text form of the packed values.
//!
//! Encoding is lowercase without a prefix; decoding accepts either case and rejects signs,
//! prefixes and values wider than the target word.

use crate::model::card_set::CardSet;
use crate::model::error::ModelError;
use crate::model::score::Score;
use crate::model::trick::Trick;
use crate::model::turn_state::TurnState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{text:?} is not an unsigned base-16 value of at most {bits} bits")]
    InvalidHex { text: String, bits: u32 },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("snapshot json: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn encode_u64(value: u64) -> String {
    format!("{value:x}")
}

pub fn encode_u32(value: u32) -> String {
    format!("{value:x}")
}

pub fn decode_u64(text: &str) -> Result<u64, CodecError> {
    checked_digits(text, u64::BITS)?;
    u64::from_str_radix(text, 16).map_err(|_| invalid(text, u64::BITS))
}

pub fn decode_u32(text: &str) -> Result<u32, CodecError> {
    checked_digits(text, u32::BITS)?;
    u32::from_str_radix(text, 16).map_err(|_| invalid(text, u32::BITS))
}

// `from_str_radix` alone would accept a leading `+`.
fn checked_digits(text: &str, bits: u32) -> Result<(), CodecError> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(invalid(text, bits));
    }
    Ok(())
}

fn invalid(text: &str, bits: u32) -> CodecError {
    CodecError::InvalidHex {
        text: text.to_string(),
        bits,
    }
}

/// Packed values that travel as hex text.
pub trait HexPacked: Sized {
    fn to_hex(&self) -> String;
    fn from_hex(text: &str) -> Result<Self, CodecError>;
}

impl HexPacked for Score {
    fn to_hex(&self) -> String {
        encode_u64(self.packed())
    }

    fn from_hex(text: &str) -> Result<Self, CodecError> {
        Ok(Score::from_packed(decode_u64(text)?)?)
    }
}

impl HexPacked for CardSet {
    fn to_hex(&self) -> String {
        encode_u64(self.packed())
    }

    fn from_hex(text: &str) -> Result<Self, CodecError> {
        Ok(CardSet::from_packed(decode_u64(text)?)?)
    }
}

impl HexPacked for Trick {
    fn to_hex(&self) -> String {
        encode_u32(self.packed())
    }

    fn from_hex(text: &str) -> Result<Self, CodecError> {
        Ok(Trick::from_packed(decode_u32(text)?)?)
    }
}

/// The three packed components of a [`TurnState`] as hex strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnSnapshot {
    pub score: String,
    pub unplayed: String,
    pub trick: String,
}

impl TurnSnapshot {
    pub fn capture(state: &TurnState) -> Self {
        TurnSnapshot {
            score: encode_u64(state.packed_score()),
            unplayed: encode_u64(state.packed_unplayed_cards()),
            trick: encode_u32(state.packed_trick()),
        }
    }

    pub fn restore(&self) -> Result<TurnState, CodecError> {
        Ok(TurnState::from_packed_components(
            decode_u64(&self.score)?,
            decode_u64(&self.unplayed)?,
            decode_u32(&self.trick)?,
        )?)
    }

    pub fn to_json(state: &TurnState) -> Result<String, CodecError> {
        Ok(serde_json::to_string_pretty(&Self::capture(state))?)
    }

    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{CodecError, HexPacked, TurnSnapshot, decode_u32, decode_u64, encode_u64};
    use crate::model::card::Card;
    use crate::model::card_set::CardSet;
    use crate::model::player::PlayerId;
    use crate::model::rank::Rank;
    use crate::model::score::Score;
    use crate::model::suit::Suit;
    use crate::model::trick::Trick;
    use crate::model::turn_state::TurnState;

    #[test]
    fn encodes_lowercase_without_prefix() {
        assert_eq!(encode_u64(0), "0");
        assert_eq!(CardSet::ALL_CARDS.to_hex(), "1ff01ff01ff01ff");
        assert_eq!(Trick::INVALID.to_hex(), "ffffffff");
    }

    #[test]
    fn decodes_either_case() {
        assert_eq!(decode_u64("1FF01ff").unwrap(), 0x1ff_01ff);
        assert_eq!(decode_u32("ffffffff").unwrap(), u32::MAX);
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["", "+1", "-1", "0x10", "12 ", "g"] {
            assert!(
                matches!(decode_u64(text), Err(CodecError::InvalidHex { .. })),
                "{text:?} should be rejected"
            );
        }
        assert!(decode_u32("100000000").is_err());
    }

    #[test]
    fn decoded_values_are_validated() {
        assert!(matches!(
            CardSet::from_hex("ffffffffffffffff"),
            Err(CodecError::Model(_))
        ));
        assert!(matches!(Trick::from_hex("ffffffff"), Err(CodecError::Model(_))));
        assert_eq!(Score::from_hex("0").unwrap(), Score::INITIAL);
    }

    #[test]
    fn snapshot_restores_turn_state() {
        let state = TurnState::initial(Suit::Hearts, Score::INITIAL, PlayerId::Player3)
            .with_new_card_played(Card::new(Suit::Clubs, Rank::Queen))
            .unwrap();
        let json = TurnSnapshot::to_json(&state).unwrap();
        assert!(json.contains("\"unplayed\""));
        let restored = TurnSnapshot::from_json(&json).unwrap().restore().unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn snapshot_accepts_terminal_trick() {
        let snapshot = TurnSnapshot {
            score: "0".into(),
            unplayed: "0".into(),
            trick: "ffffffff".into(),
        };
        assert!(snapshot.restore().unwrap().is_terminal());
    }
}
