//! Comparison of a measured delivery curve against a published reference.
//!
//! Reference values are interpolated linearly in `log10(rate)`, matching the
//! log-scaled x axis the curves are read from.

use serde::{Deserialize, Serialize};

use crate::error::SweepError;
use crate::sweep::CurvePoint;

/// A single (arrival rate, delivery ratio) reference sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub arrival_rate: f64,
    pub value: f64,
}

/// Reference curve sorted by arrival rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ReferencePoint>", into = "Vec<ReferencePoint>")]
pub struct ReferenceCurve {
    points: Vec<ReferencePoint>,
}

impl ReferenceCurve {
    pub fn new(mut points: Vec<ReferencePoint>) -> Result<Self, SweepError> {
        if points.is_empty() {
            return Err(SweepError::InvalidArgument(
                "reference curve needs at least one point".to_string(),
            ));
        }
        if let Some(bad) = points
            .iter()
            .find(|p| !p.arrival_rate.is_finite() || p.arrival_rate <= 0.0 || !p.value.is_finite())
        {
            return Err(SweepError::InvalidArgument(format!(
                "invalid reference point ({}, {})",
                bad.arrival_rate, bad.value
            )));
        }
        points.sort_by(|a, b| a.arrival_rate.total_cmp(&b.arrival_rate));
        Ok(Self { points })
    }

    #[must_use]
    pub fn points(&self) -> &[ReferencePoint] {
        &self.points
    }

    /// Reference value at `arrival_rate`, clamped to the curve's end values
    /// outside its range
    #[must_use]
    pub fn value_at(&self, arrival_rate: f64) -> f64 {
        if arrival_rate.is_nan() {
            return f64::NAN;
        }
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        if arrival_rate <= first.arrival_rate {
            return first.value;
        }
        if arrival_rate >= last.arrival_rate {
            return last.value;
        }

        let upper = self
            .points
            .partition_point(|p| p.arrival_rate < arrival_rate);
        let (lo, hi) = (self.points[upper - 1], self.points[upper]);
        if hi.arrival_rate == arrival_rate {
            return hi.value;
        }
        let t = (arrival_rate.log10() - lo.arrival_rate.log10())
            / (hi.arrival_rate.log10() - lo.arrival_rate.log10());
        lo.value + t * (hi.value - lo.value)
    }

    /// Per-point deviation of a measured curve from this reference
    #[must_use]
    pub fn compare(&self, measured: &[CurvePoint]) -> Comparison {
        let deltas: Vec<PointDelta> = measured
            .iter()
            .map(|p| {
                let reference = self.value_at(p.arrival_rate);
                PointDelta {
                    arrival_rate: p.arrival_rate,
                    measured: p.mean,
                    reference,
                    delta: p.mean - reference,
                }
            })
            .collect();

        let max_abs_delta = deltas.iter().map(|d| d.delta.abs()).fold(0.0, f64::max);
        let rmse = if deltas.is_empty() {
            0.0
        } else {
            (deltas.iter().map(|d| d.delta * d.delta).sum::<f64>() / deltas.len() as f64).sqrt()
        };

        Comparison {
            deltas,
            max_abs_delta,
            rmse,
        }
    }
}

impl TryFrom<Vec<ReferencePoint>> for ReferenceCurve {
    type Error = SweepError;

    fn try_from(points: Vec<ReferencePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<ReferenceCurve> for Vec<ReferencePoint> {
    fn from(curve: ReferenceCurve) -> Self {
        curve.points
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointDelta {
    pub arrival_rate: f64,
    pub measured: f64,
    pub reference: f64,
    /// `measured - reference`
    pub delta: f64,
}

/// Result of [`ReferenceCurve::compare`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub deltas: Vec<PointDelta>,
    pub max_abs_delta: f64,
    pub rmse: f64,
}
