use crate::bits::BitsError;
use core::fmt;
use thiserror::Error;

/// Which packed representation failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackedKind {
    Card,
    CardSet,
    Score,
    Trick,
}

impl fmt::Display for PackedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PackedKind::Card => "card",
            PackedKind::CardSet => "card set",
            PackedKind::Score => "score",
            PackedKind::Trick => "trick",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid packed {kind}: {bits:#x}")]
    InvalidPacked { kind: PackedKind, bits: u64 },
    #[error("score field out of range: {0}")]
    ScoreField(#[from] BitsError),
    #[error("trick already holds four cards")]
    TrickFull,
    #[error("trick is not full yet")]
    TrickNotFull,
    #[error("turn is over")]
    TurnOver,
}

impl ModelError {
    pub(crate) fn invalid(kind: PackedKind, bits: impl Into<u64>) -> Self {
        ModelError::InvalidPacked {
            kind,
            bits: bits.into(),
        }
    }
}
