/// Die types supported by the catalog
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter};

use crate::error::{DiceError, Result};

/// One of the six polyhedral dice, keyed by its number of faces.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumCount,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum DieType {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
}

impl DieType {
    /// All die types in catalog order.
    pub const ALL: [DieType; 6] = [
        DieType::D4,
        DieType::D6,
        DieType::D8,
        DieType::D10,
        DieType::D12,
        DieType::D20,
    ];

    /// Number of faces, which is also the highest rollable outcome.
    pub fn face_count(self) -> usize {
        match self {
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
        }
    }

    /// Position of this die in [`DieType::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.face_count())
    }
}

impl TryFrom<u32> for DieType {
    type Error = DiceError;

    fn try_from(sides: u32) -> Result<Self> {
        match sides {
            4 => Ok(DieType::D4),
            6 => Ok(DieType::D6),
            8 => Ok(DieType::D8),
            10 => Ok(DieType::D10),
            12 => Ok(DieType::D12),
            20 => Ok(DieType::D20),
            _ => Err(DiceError::UnknownDieType(sides.to_string())),
        }
    }
}

impl FromStr for DieType {
    type Err = DiceError;

    /// Accepts `d20`, `D20` and bare `20`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('d')
            .or_else(|| trimmed.strip_prefix('D'))
            .unwrap_or(trimmed);

        // Reject signs and leading zeros so only the canonical spellings parse.
        if digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || digits.starts_with('0')
        {
            return Err(DiceError::UnknownDieType(s.to_string()));
        }

        digits
            .parse::<u32>()
            .map_err(|_| DiceError::UnknownDieType(s.to_string()))
            .and_then(DieType::try_from)
            .map_err(|_| DiceError::UnknownDieType(s.to_string()))
    }
}

impl TryFrom<String> for DieType {
    type Error = DiceError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<DieType> for String {
    fn from(die: DieType) -> Self {
        die.to_string()
    }
}
