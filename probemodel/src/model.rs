use std::fmt;

use serde::Deserialize;

use crate::error::{ModelError, Result};

/// Collision resolution strategy of an open address table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionStrategy {
    Linear,
    Double,
}

/// Outcome of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Fail,
}

impl Outcome {
    pub const ALL: [Outcome; 2] = [Outcome::Success, Outcome::Fail];
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => f.write_str("success"),
            Outcome::Fail => f.write_str("fail"),
        }
    }
}

/// Expected number of probes for a successful search with linear probing.
pub fn linear_success(lambda: f64) -> f64 {
    0.5 * (1.0 + 1.0 / (1.0 - lambda))
}

/// Expected number of probes for an unsuccessful search with linear probing.
pub fn linear_fail(lambda: f64) -> f64 {
    let complement = 1.0 - lambda;
    0.5 * (1.0 + 1.0 / (complement * complement))
}

/// Expected number of probes for a successful search with double hashing.
///
/// Evaluates to NaN at `lambda == 0` (0 / 0), use
/// [`ProbeModel::probes_or_limit`] when the grid may contain zero.
pub fn double_success(lambda: f64) -> f64 {
    // ln_1p keeps precision for small lambda
    -(-lambda).ln_1p() / lambda
}

/// Expected number of probes for an unsuccessful search with double hashing.
pub fn double_fail(lambda: f64) -> f64 {
    let complement = 1.0 - lambda;
    1.0 / (complement * complement)
}

/// A closed form λ -> expected probe count for one
/// (collision strategy, search outcome) pair.
///
/// The model never clamps: a load factor outside [0, 1) is an error,
/// and so is λ = 0 for double hashing success unless the caller goes
/// through [`ProbeModel::probes_or_limit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct ProbeModel {
    pub strategy: CollisionStrategy,
    pub outcome: Outcome,
}

impl Default for ProbeModel {
    fn default() -> Self {
        Self::LINEAR_SUCCESS
    }
}

impl fmt::Display for ProbeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = match self.strategy {
            CollisionStrategy::Linear => "linear probing",
            CollisionStrategy::Double => "double hashing",
        };
        write!(f, "{strategy} ({})", self.outcome)
    }
}

impl ProbeModel {
    pub const LINEAR_SUCCESS: Self = Self::new(CollisionStrategy::Linear, Outcome::Success);
    pub const LINEAR_FAIL: Self = Self::new(CollisionStrategy::Linear, Outcome::Fail);
    pub const DOUBLE_SUCCESS: Self = Self::new(CollisionStrategy::Double, Outcome::Success);
    pub const DOUBLE_FAIL: Self = Self::new(CollisionStrategy::Double, Outcome::Fail);

    pub const fn new(strategy: CollisionStrategy, outcome: Outcome) -> Self {
        Self { strategy, outcome }
    }

    /// Expected probe count at `lambda`.
    ///
    /// Fails with [`ModelError::InvalidDomain`] if `lambda` is not in [0, 1),
    /// or if it is exactly 0 for double hashing success.
    pub fn probes(&self, lambda: f64) -> Result<f64> {
        self.check_domain(lambda)?;
        match (self.strategy, self.outcome) {
            (CollisionStrategy::Linear, Outcome::Success) => Ok(linear_success(lambda)),
            (CollisionStrategy::Linear, Outcome::Fail) => Ok(linear_fail(lambda)),
            (CollisionStrategy::Double, Outcome::Success) => {
                if lambda == 0.0 {
                    return Err(self.invalid(lambda));
                }
                Ok(double_success(lambda))
            }
            (CollisionStrategy::Double, Outcome::Fail) => Ok(double_fail(lambda)),
        }
    }

    /// Same as [`probes`](Self::probes) but substitutes the limiting value 1
    /// for double hashing success at λ = 0.
    pub fn probes_or_limit(&self, lambda: f64) -> Result<f64> {
        if lambda == 0.0 && *self == Self::DOUBLE_SUCCESS {
            return Ok(1.0);
        }
        self.probes(lambda)
    }

    fn check_domain(&self, lambda: f64) -> Result<()> {
        // NaN fails both comparisons
        if (0.0..1.0).contains(&lambda) {
            Ok(())
        } else {
            Err(self.invalid(lambda))
        }
    }

    fn invalid(&self, lambda: f64) -> ModelError {
        ModelError::InvalidDomain {
            model: *self,
            lambda,
        }
    }
}
