//! Sweep parameters: arrival rates, periods and the combinations run by the
//! simulator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SweepError;

/// Target packet arrival rate for the whole device population, in packets/second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ArrivalRate(f64);

impl ArrivalRate {
    /// Create a rate, rejecting zero, negative and non-finite values
    pub fn new(packets_per_second: f64) -> Result<Self, SweepError> {
        if !packets_per_second.is_finite() || packets_per_second <= 0.0 {
            return Err(SweepError::InvalidArgument(format!(
                "arrival rate must be positive and finite, got {packets_per_second}"
            )));
        }
        Ok(Self(packets_per_second))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ArrivalRate {
    type Error = SweepError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ArrivalRate> for f64 {
    fn from(rate: ArrivalRate) -> Self {
        rate.0
    }
}

impl fmt::Display for ArrivalRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pkt/s", self.0)
    }
}

/// Application period in whole seconds, the simulator's native load parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Period(u64);

impl Period {
    pub fn from_seconds(seconds: u64) -> Result<Self, SweepError> {
        if seconds == 0 {
            return Err(SweepError::InvalidArgument(
                "period must be at least one second".to_string(),
            ));
        }
        Ok(Self(seconds))
    }

    #[must_use]
    pub fn seconds(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for Period {
    type Error = SweepError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_seconds(value)
    }
}

impl From<Period> for u64 {
    fn from(period: Period) -> Self {
        period.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// One point of the load sweep.
///
/// Several rates may round to the same period, so the originating rate is
/// kept alongside the period it was translated to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub arrival_rate: ArrivalRate,
    pub period: Period,
}

/// A single simulator configuration. Identity is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParameterCombination {
    pub period: Period,
    /// Whether end devices require an ACK
    pub confirmed: bool,
}

impl ParameterCombination {
    #[must_use]
    pub fn new(period: Period, confirmed: bool) -> Self {
        Self { period, confirmed }
    }
}

impl fmt::Display for ParameterCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(period={}, confirmed={})",
            self.period.seconds(),
            self.confirmed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrival_rate_rejects_non_positive() {
        assert!(ArrivalRate::new(0.0).is_err());
        assert!(ArrivalRate::new(-1.0).is_err());
        assert!(ArrivalRate::new(f64::NAN).is_err());
        assert!(ArrivalRate::new(f64::INFINITY).is_err());
        assert_eq!(ArrivalRate::new(0.5).map(ArrivalRate::value), Ok(0.5));
    }

    #[test]
    fn test_period_rejects_zero() {
        assert!(Period::from_seconds(0).is_err());
        assert_eq!(Period::from_seconds(120).map(Period::seconds), Ok(120));
    }

    #[test]
    fn test_combination_structural_identity() {
        let period = Period::from_seconds(1200).unwrap();
        let a = ParameterCombination::new(period, true);
        let b = ParameterCombination::new(Period::from_seconds(1200).unwrap(), true);
        assert_eq!(a, b);
        assert_ne!(a, ParameterCombination::new(period, false));
        assert_eq!(a.to_string(), "(period=1200, confirmed=true)");
    }
}
