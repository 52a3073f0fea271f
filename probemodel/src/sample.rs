use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::{ModelError, Result};
use crate::model::Outcome;

/// One measured row of the search benchmark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadFactorSample {
    pub load_factor: f64,
    pub success_time: f64,
    pub fail_time: f64,
}

impl LoadFactorSample {
    pub fn new(load_factor: f64, success_time: f64, fail_time: f64) -> Self {
        Self {
            load_factor,
            success_time,
            fail_time,
        }
    }

    /// Measured time for the given search outcome
    pub fn time(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Success => self.success_time,
            Outcome::Fail => self.fail_time,
        }
    }

    /// λ must lie in [0, 1) and both times must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.load_factor) {
            return Err(ModelError::InvalidInput(format!(
                "load factor {} is outside [0, 1)",
                self.load_factor
            )));
        }
        for outcome in Outcome::ALL {
            let time = self.time(outcome);
            if !time.is_finite() || time < 0.0 {
                return Err(ModelError::InvalidInput(format!(
                    "{outcome} time {time} at load factor {} is not a non-negative number",
                    self.load_factor
                )));
            }
        }
        Ok(())
    }
}

/// Collects the (λ, time) points of one outcome, in input order
pub fn measured_points(samples: &[LoadFactorSample], outcome: Outcome) -> Vec<(f64, f64)> {
    samples
        .iter()
        .map(|s| (s.load_factor, s.time(outcome)))
        .collect()
}

/// Growth policy used by the insertion benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResizePolicy {
    /// Table preallocated, never rehashed
    NoRehash,
    /// Capacity doubles on every rehash
    Doubling,
    /// Capacity grows by a fixed number of slots on every rehash
    AddFixedIncrement,
}

impl ResizePolicy {
    pub const ALL: [ResizePolicy; 3] = [
        ResizePolicy::NoRehash,
        ResizePolicy::Doubling,
        ResizePolicy::AddFixedIncrement,
    ];
}

impl fmt::Display for ResizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResizePolicy::NoRehash => "No Rehash",
            ResizePolicy::Doubling => "Rehash (Double)",
            ResizePolicy::AddFixedIncrement => "Rehash (Add Fixed Increment)",
        };
        f.write_str(name)
    }
}

/// One measured row of the insertion benchmark, initial size is 2^q.
/// A policy missing from the input has no entry in `times`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResizeSample {
    pub q: u32,
    pub times: FxHashMap<ResizePolicy, f64>,
}

impl ResizeSample {
    pub fn new(q: u32) -> Self {
        Self {
            q,
            times: FxHashMap::default(),
        }
    }

    pub fn with_time(mut self, policy: ResizePolicy, micros: f64) -> Self {
        self.times.insert(policy, micros);
        self
    }

    /// Microseconds per insertion for `policy`, if it was measured
    pub fn time(&self, policy: ResizePolicy) -> Option<f64> {
        self.times.get(&policy).copied()
    }
}
