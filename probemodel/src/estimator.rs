use serde::Deserialize;

use crate::error::{ModelError, Result};
use crate::model::ProbeModel;

/// How Q is derived from a measured series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalePolicy {
    /// Ratio at a single anchor sample
    #[default]
    SingleAnchor,
    /// Mean of the per-sample ratios, zero-valued samples excluded
    MeanRatio,
}

/// How the single anchor sample is picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSelection {
    /// Sample with λ closest to the anchor, earliest wins ties
    #[default]
    Nearest,
    /// First sample in input order with λ >= anchor
    FirstAtOrAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub policy: ScalePolicy,
    pub anchor_lambda: f64,
    pub anchor: AnchorSelection,
    pub reference: ProbeModel,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            policy: ScalePolicy::SingleAnchor,
            anchor_lambda: 0.5,
            anchor: AnchorSelection::Nearest,
            reference: ProbeModel::LINEAR_SUCCESS,
        }
    }
}

impl ScaleConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.anchor_lambda) {
            return Err(format!(
                "anchor_lambda must be in [0, 1), got {}",
                self.anchor_lambda
            )
            .into());
        }
        Ok(())
    }
}

/// Unit conversion from measured time to probe count.
///
/// Only the estimator and [`ScaleFactor::new`] build one, so a value
/// of this type is always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub fn new(q: f64) -> Result<Self> {
        if q.is_finite() && q > 0.0 {
            Ok(Self(q))
        } else {
            Err(ModelError::DegenerateScale(format!(
                "scale factor must be finite and positive, got {q}"
            )))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn apply(&self, measured: f64) -> f64 {
        self.0 * measured
    }
}

/// Derives Q so that `Q * value_i ≈ M(λ_i)` for the configured reference model M.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleEstimator {
    config: ScaleConfig,
}

impl ScaleEstimator {
    pub fn new(config: ScaleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScaleConfig {
        &self.config
    }

    /// Estimate Q from `(λ, measured value)` points.
    pub fn estimate(&self, measured: &[(f64, f64)]) -> Result<ScaleFactor> {
        if measured.is_empty() {
            return Err(ModelError::DegenerateScale(
                "no measured samples to derive a scale from".to_string(),
            ));
        }
        for &(lambda, value) in measured {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("measured value at λ = {lambda} is {value}").into());
            }
        }

        let q = match self.config.policy {
            ScalePolicy::SingleAnchor => self.single_anchor(measured)?,
            ScalePolicy::MeanRatio => self.mean_ratio(measured)?,
        };
        ScaleFactor::new(q)
    }

    fn single_anchor(&self, measured: &[(f64, f64)]) -> Result<f64> {
        let (lambda, value) = self.pick_anchor(measured)?;
        if value == 0.0 {
            return Err(ModelError::DegenerateScale(format!(
                "anchor sample at λ = {lambda} has a zero measurement"
            )));
        }
        let expected = self.config.reference.probes_or_limit(lambda)?;
        Ok(expected / value)
    }

    fn pick_anchor(&self, measured: &[(f64, f64)]) -> Result<(f64, f64)> {
        let target = self.config.anchor_lambda;
        match self.config.anchor {
            AnchorSelection::Nearest => {
                let mut best = measured[0];
                for &point in &measured[1..] {
                    // strict comparison keeps the earliest of equally close samples
                    if (point.0 - target).abs() < (best.0 - target).abs() {
                        best = point;
                    }
                }
                Ok(best)
            }
            AnchorSelection::FirstAtOrAbove => measured
                .iter()
                .copied()
                .find(|&(lambda, _)| lambda >= target)
                .ok_or_else(|| {
                    ModelError::DegenerateScale(format!("no sample with λ >= {target}"))
                }),
        }
    }

    fn mean_ratio(&self, measured: &[(f64, f64)]) -> Result<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for &(lambda, value) in measured {
            // zero samples are dropped, not averaged in
            if value == 0.0 {
                continue;
            }
            sum += self.config.reference.probes_or_limit(lambda)? / value;
            count += 1;
        }
        if count == 0 {
            return Err(ModelError::DegenerateScale(
                "every measured sample is zero".to_string(),
            ));
        }
        Ok(sum / count as f64)
    }
}
