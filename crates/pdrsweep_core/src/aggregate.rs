//! Result cube assembly and reduction over runs.
//!
//! The cube is a labeled 3-axis array `[point, confirmed, run]`. The point
//! axis follows sweep order, so each slot is tied to the arrival rate it was
//! translated from even when two rates share a period.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SweepError;
use crate::grid::SweepGrid;
use crate::model::{ParameterCombination, SummaryStat, SweepPoint};
use crate::space::SweepSpace;

const POINT_AXIS: usize = 0;
const FLAG_AXIS: usize = 1;
const RUN_AXIS: usize = 2;

/// Per-run metrics for every combination of a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultCube {
    space: SweepSpace,
    runs: usize,
    values: SweepGrid<Option<f64>>,
}

impl ResultCube {
    /// An empty cube sized for `space` with `runs` runs per combination
    #[must_use]
    pub fn new(space: SweepSpace, runs: usize) -> Self {
        let [points, flags] = space.shape();
        Self {
            values: SweepGrid::new(vec![points, flags, runs], None),
            space,
            runs,
        }
    }

    #[must_use]
    pub fn space(&self) -> &SweepSpace {
        &self.space
    }

    #[must_use]
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Axis sizes: points, traffic modes, runs
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    /// Record one run's metric
    pub fn set(
        &mut self,
        point_idx: usize,
        flag_idx: usize,
        run: usize,
        metric: f64,
    ) -> Result<(), SweepError> {
        if self.values.set(&[point_idx, flag_idx, run], Some(metric)) {
            Ok(())
        } else {
            Err(SweepError::InvalidArgument(format!(
                "cube index [{point_idx}, {flag_idx}, {run}] out of range for shape {:?}",
                self.values.shape()
            )))
        }
    }

    #[must_use]
    pub fn get(&self, point_idx: usize, flag_idx: usize, run: usize) -> Option<f64> {
        self.values
            .get(&[point_idx, flag_idx, run])
            .copied()
            .flatten()
    }

    /// Run metrics for one (point, mode) slot, `None` where a run is missing
    #[must_use]
    pub fn samples(&self, point_idx: usize, flag_idx: usize) -> Option<Vec<Option<f64>>> {
        self.values
            .lane(RUN_AXIS, &[point_idx, flag_idx, 0])
            .map(|runs| runs.into_iter().copied().collect())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.values.data().iter().all(Option::is_some)
    }

    /// Copy of the cube restricted to one traffic mode
    #[must_use]
    pub fn select_confirmed(&self, confirmed: bool) -> Option<ResultCube> {
        let flag_idx = self.space.flag_index(confirmed)?;
        let sliced = self.values.select(FLAG_AXIS, flag_idx)?;
        let [points, _] = self.space.shape();
        let values = SweepGrid::from_data(vec![points, 1, self.runs], sliced.data().to_vec())?;

        Some(ResultCube {
            space: SweepSpace::new(self.space.points().to_vec(), vec![confirmed]),
            runs: self.runs,
            values,
        })
    }
}

/// Request exactly `runs` metrics for every combination of `space`.
///
/// `metric_fn` is called with run indices `0..runs`. The first error it
/// returns is propagated unchanged; nothing is retried here.
pub fn aggregate<F>(
    space: &SweepSpace,
    runs: usize,
    mut metric_fn: F,
) -> Result<ResultCube, SweepError>
where
    F: FnMut(&ParameterCombination, usize) -> Result<f64, SweepError>,
{
    let mut cube = ResultCube::new(space.clone(), runs);
    let [points, flags] = space.shape();

    for point_idx in 0..points {
        for flag_idx in 0..flags {
            let Some(combination) = space.combination_at(point_idx, flag_idx) else {
                continue;
            };
            for run in 0..runs {
                let metric = metric_fn(&combination, run)?;
                cube.set(point_idx, flag_idx, run, metric)?;
            }
        }
    }

    Ok(cube)
}

/// Reduce the run axis to mean and population standard deviation.
///
/// Fails with `EmptyReduction` for a zero-run cube, and with `MissingRun`
/// if any combination lacks one of its runs.
pub fn reduce(cube: &ResultCube) -> Result<SummaryTable, SweepError> {
    if cube.runs == 0 {
        return Err(SweepError::EmptyReduction);
    }

    let [points, flags] = cube.space.shape();
    let mut stats = SweepGrid::new(vec![points, flags], SummaryStat::default());

    for indices in stats.indices() {
        let (point_idx, flag_idx) = (indices[POINT_AXIS], indices[FLAG_AXIS]);
        let combination = cube
            .space
            .combination_at(point_idx, flag_idx)
            .ok_or_else(|| {
                SweepError::InvalidArgument(format!("no combination at {indices:?}"))
            })?;
        let samples = cube.samples(point_idx, flag_idx).unwrap_or_default();

        let mut values = Vec::with_capacity(samples.len());
        for (run, sample) in samples.into_iter().enumerate() {
            match sample {
                Some(v) => values.push(v),
                None => {
                    return Err(SweepError::MissingRun {
                        combination,
                        run,
                        reason: "no metric recorded for run".to_string(),
                    });
                }
            }
        }

        let stat = SummaryStat::from_samples(&values)?;
        debug!(%combination, mean = stat.mean, std = stat.std, "reduced runs");
        stats.set(&indices, stat);
    }

    Ok(SummaryTable {
        space: cube.space.clone(),
        stats,
    })
}

/// Summary statistics over the (point, confirmed) plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    space: SweepSpace,
    stats: SweepGrid<SummaryStat>,
}

impl SummaryTable {
    #[must_use]
    pub fn space(&self) -> &SweepSpace {
        &self.space
    }

    #[must_use]
    pub fn get(&self, point_idx: usize, confirmed: bool) -> Option<&SummaryStat> {
        let flag_idx = self.space.flag_index(confirmed)?;
        self.stats.get(&[point_idx, flag_idx])
    }

    /// Statistics for a combination, looked up by its first matching point
    #[must_use]
    pub fn for_combination(&self, combination: &ParameterCombination) -> Option<&SummaryStat> {
        let point_idx = self
            .space
            .points()
            .iter()
            .position(|p| p.period == combination.period)?;
        self.get(point_idx, combination.confirmed)
    }

    /// Statistics of one traffic mode in sweep order
    #[must_use]
    pub fn select(&self, confirmed: bool) -> Option<Vec<(SweepPoint, SummaryStat)>> {
        let flag_idx = self.space.flag_index(confirmed)?;
        let column = self.stats.lane(POINT_AXIS, &[0, flag_idx])?;
        Some(
            self.space
                .points()
                .iter()
                .copied()
                .zip(column.into_iter().copied())
                .collect(),
        )
    }

    /// Iterate over every (combination, statistics) entry in sweep order
    pub fn iter(&self) -> impl Iterator<Item = (ParameterCombination, &SummaryStat)> {
        self.stats.iter().filter_map(|(indices, stat)| {
            self.space
                .combination_at(indices[POINT_AXIS], indices[FLAG_AXIS])
                .map(|c| (c, stat))
        })
    }
}
