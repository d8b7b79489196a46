//! Combination space: every sweep period crossed with every traffic mode.

use serde::{Deserialize, Serialize};

use crate::model::{ArrivalRate, ParameterCombination, Period, SweepPoint};

/// Cartesian product of `periods` and `flags`, period-major.
///
/// Duplicate periods are kept; they map to the same combination value.
#[must_use]
pub fn build_combinations(periods: &[Period], flags: &[bool]) -> Vec<ParameterCombination> {
    periods
        .iter()
        .flat_map(|&period| {
            flags
                .iter()
                .map(move |&confirmed| ParameterCombination::new(period, confirmed))
        })
        .collect()
}

/// Ordered sweep points together with the traffic modes to run at each one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSpace {
    points: Vec<SweepPoint>,
    flags: Vec<bool>,
}

impl SweepSpace {
    #[must_use]
    pub fn new(points: Vec<SweepPoint>, flags: Vec<bool>) -> Self {
        Self { points, flags }
    }

    #[must_use]
    pub fn points(&self) -> &[SweepPoint] {
        &self.points
    }

    #[must_use]
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// Periods in sweep order, duplicates included
    #[must_use]
    pub fn periods(&self) -> Vec<Period> {
        self.points.iter().map(|p| p.period).collect()
    }

    #[must_use]
    pub fn combinations(&self) -> Vec<ParameterCombination> {
        build_combinations(&self.periods(), &self.flags)
    }

    /// Shape of the (point, flag) plane
    #[must_use]
    pub fn shape(&self) -> [usize; 2] {
        [self.points.len(), self.flags.len()]
    }

    /// Combination at a (point index, flag index) position
    #[must_use]
    pub fn combination_at(&self, point_idx: usize, flag_idx: usize) -> Option<ParameterCombination> {
        let point = self.points.get(point_idx)?;
        let flag = self.flags.get(flag_idx)?;
        Some(ParameterCombination::new(point.period, *flag))
    }

    #[must_use]
    pub fn flag_index(&self, confirmed: bool) -> Option<usize> {
        self.flags.iter().position(|&f| f == confirmed)
    }

    /// All arrival rates that were translated to `period`
    #[must_use]
    pub fn rates_for_period(&self, period: Period) -> Vec<ArrivalRate> {
        self.points
            .iter()
            .filter(|p| p.period == period)
            .map(|p| p.arrival_rate)
            .collect()
    }

    /// True when two distinct rates share a period and so share runs
    #[must_use]
    pub fn has_period_collisions(&self) -> bool {
        let mut periods = self.periods();
        periods.sort_unstable();
        periods.windows(2).any(|w| w[0] == w[1])
    }
}
