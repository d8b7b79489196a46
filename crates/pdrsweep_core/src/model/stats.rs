use serde::{Deserialize, Serialize};

use crate::error::SweepError;

/// Mean and population standard deviation of the runs for one combination
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStat {
    pub mean: f64,
    pub std: f64,
}

impl SummaryStat {
    /// Reduce a set of run metrics. Sample order does not matter.
    pub fn from_samples(samples: &[f64]) -> Result<Self, SweepError> {
        if samples.is_empty() {
            return Err(SweepError::EmptyReduction);
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        Ok(Self {
            mean,
            std: variance.sqrt(),
        })
    }
}
