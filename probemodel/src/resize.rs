use crate::error::{ModelError, Result};
use crate::sample::{ResizePolicy, ResizeSample};

/// Raw insertion cost per policy, keyed by q. No model or scaling is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeComparison {
    series: Vec<(ResizePolicy, Vec<(u32, f64)>)>,
}

impl ResizeComparison {
    /// Splits the rows into one series per policy, in [`ResizePolicy::ALL`] order.
    /// Policies without any measurement are left out.
    pub fn from_samples(samples: &[ResizeSample]) -> Result<Self> {
        let series: Vec<_> = ResizePolicy::ALL
            .into_iter()
            .filter_map(|policy| {
                let points: Vec<(u32, f64)> = samples
                    .iter()
                    .filter_map(|s| s.time(policy).map(|t| (s.q, t)))
                    .collect();
                (!points.is_empty()).then_some((policy, points))
            })
            .collect();

        if series.is_empty() {
            return Err(ModelError::InvalidInput(
                "no resize policy has any measurement".to_string(),
            ));
        }
        Ok(Self { series })
    }

    pub fn series(&self) -> &[(ResizePolicy, Vec<(u32, f64)>)] {
        &self.series
    }

    pub fn get(&self, policy: ResizePolicy) -> Option<&[(u32, f64)]> {
        self.series
            .iter()
            .find(|(p, _)| *p == policy)
            .map(|(_, points)| points.as_slice())
    }

    /// Smallest and largest q across every series
    pub fn q_range(&self) -> (u32, u32) {
        let qs = self.series.iter().flat_map(|(_, points)| points.iter().map(|p| p.0));
        qs.fold((u32::MAX, u32::MIN), |(lo, hi), q| (lo.min(q), hi.max(q)))
    }

    /// A log q axis needs every q to be at least 1, since log(0) is undefined
    pub fn log_q_axis(&self) -> bool {
        self.q_range().0 >= 1
    }

    /// Largest time across every series
    pub fn max_time(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|(_, points)| points.iter().map(|p| p.1))
            .fold(0.0, f64::max)
    }
}
