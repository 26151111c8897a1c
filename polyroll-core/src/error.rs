/// Error types shared by every polyroll crate
use thiserror::Error;

use crate::dice::DieType;

/// Errors raised by catalog lookups, camera placement and the input parsers.
#[derive(Debug, Error)]
pub enum DiceError {
    #[error("unknown die type `{0}` (expected one of d4, d6, d8, d10, d12, d20)")]
    UnknownDieType(String),

    #[error("face {face} is out of range [1, {face_count}] for {die}")]
    InvalidFaceIndex {
        die: DieType,
        face: usize,
        face_count: usize,
    },

    #[error("invalid color `{0}`")]
    InvalidColor(String),

    #[error("invalid render style: {0}")]
    InvalidStyle(String),

    #[error("invalid dice notation `{0}`")]
    InvalidNotation(String),

    #[error("invalid roll: {0}")]
    InvalidRoll(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`DiceError`].
pub type Result<T> = std::result::Result<T, DiceError>;
