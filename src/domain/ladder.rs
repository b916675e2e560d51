//! Discretized price ladder.
//!
//! The ladder venue only accepts prices that sit on its odds ladder: either
//! an explicit set of allowed prices or every multiple of a fixed step.
//! Any continuous price must be aligned before it is quoted or submitted.
//!
//! Rounding policy:
//! - Fixed step: nearest multiple, half-way cases round away from zero
//!   (`f64::round`).
//! - Explicit levels: nearest level; when two levels are equally close
//!   (within [`TIE_EPSILON`]) the higher one wins.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Distance tolerance under which two ladder levels count as a tie.
pub const TIE_EPSILON: f64 = 1e-12;

/// Allowed prices on a venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OddsLadder {
    /// Every positive multiple of the step.
    Step(f64),
    /// Explicit allowed prices, in any order.
    Levels(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LadderError {
    /// The ladder itself is malformed (as published by the venue).
    #[error("invalid odds ladder definition: {ladder:?}")]
    InvalidDefinition { ladder: OddsLadder },
    /// The price cannot be placed on this ladder.
    #[error("price {price} not compatible with ladder {ladder:?}")]
    Incompatible { price: f64, ladder: OddsLadder },
}

impl OddsLadder {
    /// Check that a published ladder is usable: a finite positive step, or
    /// a non-empty set of finite positive levels.
    pub fn validate(&self) -> Result<(), LadderError> {
        let valid = match self {
            Self::Step(step) => step.is_finite() && *step > 0.0,
            Self::Levels(levels) => {
                !levels.is_empty() && levels.iter().all(|l| l.is_finite() && *l > 0.0)
            }
        };
        if valid {
            Ok(())
        } else {
            Err(LadderError::InvalidDefinition {
                ladder: self.clone(),
            })
        }
    }

    /// Align `price` onto this ladder. See [`align`].
    pub fn align(&self, price: f64) -> Result<f64, LadderError> {
        align(price, self)
    }
}

/// Map a continuous price to the nearest allowed ladder price.
///
/// Fails with [`LadderError::Incompatible`] when the price is not finite,
/// the level set is empty or holds a non-finite entry, or the step is not
/// a finite positive number.
pub fn align(price: f64, ladder: &OddsLadder) -> Result<f64, LadderError> {
    let incompatible = || LadderError::Incompatible {
        price,
        ladder: ladder.clone(),
    };

    if !price.is_finite() {
        return Err(incompatible());
    }

    match ladder {
        OddsLadder::Step(step) => {
            if !(step.is_finite() && *step > 0.0) {
                return Err(incompatible());
            }
            Ok((price / step).round() * step)
        }
        OddsLadder::Levels(levels) => {
            let (&first, rest) = levels.split_first().ok_or_else(incompatible)?;
            if !first.is_finite() {
                return Err(incompatible());
            }
            let mut best = first;
            let mut best_diff = (first - price).abs();
            for &level in rest {
                if !level.is_finite() {
                    return Err(incompatible());
                }
                let diff = (level - price).abs();
                let closer = diff < best_diff - TIE_EPSILON;
                let tie_higher = (diff - best_diff).abs() <= TIE_EPSILON && level > best;
                if closer || tie_higher {
                    best = level;
                    best_diff = diff;
                }
            }
            Ok(best)
        }
    }
}
