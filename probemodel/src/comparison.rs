use serde::Deserialize;

use crate::error::{ModelError, Result};
use crate::estimator::{ScaleEstimator, ScaleFactor};
use crate::model::{CollisionStrategy, Outcome, ProbeModel};
use crate::sample::{LoadFactorSample, measured_points};

/// Evenly spaced load factors, both ends included
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LambdaGrid {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

impl Default for LambdaGrid {
    fn default() -> Self {
        Self {
            start: 0.01,
            end: 0.99,
            points: 100,
        }
    }
}

impl LambdaGrid {
    pub fn new(start: f64, end: f64, points: usize) -> Result<Self> {
        let grid = Self { start, end, points };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0 <= self.start && self.start < self.end && self.end < 1.0) {
            return Err(format!(
                "grid bounds must satisfy 0 <= start < end < 1, got {}..{}",
                self.start, self.end
            )
            .into());
        }
        if self.points < 2 {
            return Err(format!("grid needs at least 2 points, got {}", self.points).into());
        }
        Ok(())
    }

    pub fn lambdas(&self) -> Vec<f64> {
        if self.points < 2 {
            return Vec::new();
        }
        let step = (self.end - self.start) / (self.points - 1) as f64;
        (0..self.points)
            .map(|i| {
                if i == self.points - 1 {
                    self.end
                } else {
                    self.start + step * i as f64
                }
            })
            .collect()
    }
}

/// Everything a comparison chart needs for one search outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSeries {
    outcome: Outcome,
    scale: ScaleFactor,
    grid: Vec<f64>,
    linear: Vec<f64>,
    double: Vec<f64>,
    measured: Vec<(f64, f64)>,
    scaled: Vec<(f64, f64)>,
}

impl ComparisonSeries {
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn scale(&self) -> ScaleFactor {
        self.scale
    }

    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    /// Linear probing curve, one value per grid point
    pub fn linear(&self) -> &[f64] {
        &self.linear
    }

    /// Double hashing curve, one value per grid point
    pub fn double(&self) -> &[f64] {
        &self.double
    }

    /// Raw (λ, time) points as measured
    pub fn measured(&self) -> &[(f64, f64)] {
        &self.measured
    }

    /// (λ, Q * time) at the measured load factors
    pub fn scaled(&self) -> &[(f64, f64)] {
        &self.scaled
    }

    pub fn linear_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.grid.iter().copied().zip(self.linear.iter().copied())
    }

    pub fn double_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.grid.iter().copied().zip(self.double.iter().copied())
    }
}

/// Samples the theoretical curves on a grid and scales the measured series.
#[derive(Debug, Clone, Default)]
pub struct ComparisonBuilder {
    grid: LambdaGrid,
}

impl ComparisonBuilder {
    pub fn new(grid: LambdaGrid) -> Result<Self> {
        grid.validate()?;
        Ok(Self { grid })
    }

    pub fn grid(&self) -> &LambdaGrid {
        &self.grid
    }

    pub fn build(
        &self,
        samples: &[LoadFactorSample],
        outcome: Outcome,
        scale: ScaleFactor,
    ) -> Result<ComparisonSeries> {
        if samples.is_empty() {
            return Err(ModelError::InvalidInput(
                "no load factor samples to compare".to_string(),
            ));
        }
        validate_samples(samples)?;

        let grid = self.grid.lambdas();
        let linear = curve(ProbeModel::new(CollisionStrategy::Linear, outcome), &grid)?;
        let double = curve(ProbeModel::new(CollisionStrategy::Double, outcome), &grid)?;

        let measured = measured_points(samples, outcome);
        let scaled = measured
            .iter()
            .map(|&(lambda, time)| (lambda, scale.apply(time)))
            .collect();

        Ok(ComparisonSeries {
            outcome,
            scale,
            grid,
            linear,
            double,
            measured,
            scaled,
        })
    }
}

fn validate_samples(samples: &[LoadFactorSample]) -> Result<()> {
    samples.iter().try_for_each(LoadFactorSample::validate)
}

fn curve(model: ProbeModel, grid: &[f64]) -> Result<Vec<f64>> {
    grid.iter().map(|&l| model.probes_or_limit(l)).collect()
}

/// Success and fail comparisons sharing one scale factor
#[derive(Debug, Clone, PartialEq)]
pub struct Comparisons {
    pub success: ComparisonSeries,
    pub fail: ComparisonSeries,
}

impl Comparisons {
    pub fn scale(&self) -> ScaleFactor {
        self.success.scale()
    }

    pub fn get(&self, outcome: Outcome) -> &ComparisonSeries {
        match outcome {
            Outcome::Success => &self.success,
            Outcome::Fail => &self.fail,
        }
    }
}

/// Derives Q once from the reference outcome's series, then builds both
/// comparisons with it. The first failure is returned as is.
pub fn build_comparisons(
    samples: &[LoadFactorSample],
    estimator: &ScaleEstimator,
    builder: &ComparisonBuilder,
) -> Result<Comparisons> {
    validate_samples(samples)?;
    let reference = estimator.config().reference.outcome;
    let scale = estimator.estimate(&measured_points(samples, reference))?;

    Ok(Comparisons {
        success: builder.build(samples, Outcome::Success, scale)?,
        fail: builder.build(samples, Outcome::Fail, scale)?,
    })
}
