/// Random rolls with a caller-owned RNG
use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::dice::DieType;
use crate::error::{DiceError, Result};

pub const MAX_COUNT: u32 = 100;
pub const MAX_MODIFIER: i32 = 100;

/// How many dice of which type to throw, and the modifier added to each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RollRequest {
    pub die: DieType,
    pub count: u32,
    pub modifier: i32,
}

impl RollRequest {
    /// `count` must be in `1..=100` and `modifier` in `-100..=100`.
    pub fn new(die: DieType, count: u32, modifier: i32) -> Result<Self> {
        if !(1..=MAX_COUNT).contains(&count) {
            return Err(DiceError::InvalidRoll(format!(
                "count {count} is outside 1..={MAX_COUNT}"
            )));
        }
        if !(-MAX_MODIFIER..=MAX_MODIFIER).contains(&modifier) {
            return Err(DiceError::InvalidRoll(format!(
                "modifier {modifier} is outside -{MAX_MODIFIER}..={MAX_MODIFIER}"
            )));
        }
        Ok(Self { die, count, modifier })
    }

    /// One die, no modifier.
    pub fn single(die: DieType) -> Self {
        Self {
            die,
            count: 1,
            modifier: 0,
        }
    }

    /// Same request with `count` moved by `delta`, saturating at the limits.
    pub fn with_count_delta(self, delta: i32) -> Self {
        let count = (self.count as i64 + delta as i64).clamp(1, MAX_COUNT as i64) as u32;
        Self { count, ..self }
    }

    /// Same request with `modifier` moved by `delta`, saturating at the limits.
    pub fn with_modifier_delta(self, delta: i32) -> Self {
        let modifier = self.modifier.saturating_add(delta).clamp(-MAX_MODIFIER, MAX_MODIFIER);
        Self { modifier, ..self }
    }

    pub fn with_die(self, die: DieType) -> Self {
        Self { die, ..self }
    }
}

impl fmt::Display for RollRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count != 1 {
            write!(f, "{}", self.count)?;
        }
        write!(f, "{}", self.die)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

/// The result of one [`roll`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollOutcome {
    pub die: DieType,
    pub count: u32,
    pub modifier: i32,
    /// Raw faces that came up, each in `[1, face_count]`.
    pub faces: Vec<usize>,
    /// `faces[i] + modifier`.
    pub results: Vec<i64>,
    pub total: i64,
}

impl RollOutcome {
    /// The face the viewer should present: the last die thrown.
    pub fn shown_face(&self) -> usize {
        self.faces.last().copied().unwrap_or(1)
    }
}

/// Throw `request.count` dice, drawing each face uniformly from `rng`.
pub fn roll<R: Rng + ?Sized>(request: &RollRequest, rng: &mut R) -> RollOutcome {
    let sides = request.die.face_count();
    let faces: Vec<usize> = (0..request.count).map(|_| rng.gen_range(1..=sides)).collect();
    let results: Vec<i64> = faces
        .iter()
        .map(|&face| face as i64 + request.modifier as i64)
        .collect();
    let total = results.iter().sum();

    log::info!("rolled {request}: {results:?} = {total}");

    RollOutcome {
        die: request.die,
        count: request.count,
        modifier: request.modifier,
        faces,
        results,
        total,
    }
}
