//! Campaign execution seam.
//!
//! The pipeline never runs the simulator itself. It asks a
//! [`CampaignGateway`] for the raw output of each (combination, run) pair;
//! the gateway decides whether that means a cache hit or a fresh execution.

use rustc_hash::FxHashMap;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{RunnerError, SweepError};
use crate::model::{ParameterCombination, RawRunOutput};

/// Executes one simulation and returns its stdout
pub trait SimulationRunner: Sync {
    fn run(&self, combination: &ParameterCombination, run: usize) -> Result<String, RunnerError>;
}

/// Supplies raw run output for the sweep
pub trait CampaignGateway {
    /// Return the output of `run` for `combination`, executing it if needed.
    ///
    /// Must be idempotent: a completed run is returned from cache.
    fn ensure_run(
        &mut self,
        combination: &ParameterCombination,
        run: usize,
    ) -> Result<RawRunOutput, SweepError>;

    /// Make sure runs `0..runs` exist for every combination
    fn ensure_all(
        &mut self,
        combinations: &[ParameterCombination],
        runs: usize,
    ) -> Result<(), SweepError> {
        for combination in combinations {
            for run in 0..runs {
                self.ensure_run(combination, run)?;
            }
        }
        Ok(())
    }
}

type RunKey = (ParameterCombination, usize);

/// In-memory gateway that executes each missing run once and remembers it
pub struct MemoizingGateway<R> {
    runner: R,
    cache: FxHashMap<RunKey, RawRunOutput>,
    executed: usize,
}

impl<R: SimulationRunner> MemoizingGateway<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            cache: FxHashMap::default(),
            executed: 0,
        }
    }

    /// Number of simulator executions performed so far
    #[must_use]
    pub fn executed_count(&self) -> usize {
        self.executed
    }

    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn contains(&self, combination: &ParameterCombination, run: usize) -> bool {
        self.cache.contains_key(&(*combination, run))
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn store(
        &mut self,
        key: RunKey,
        outcome: Result<String, RunnerError>,
    ) -> Result<RawRunOutput, SweepError> {
        let (combination, run) = key;
        let stdout = outcome.map_err(|e| SweepError::MissingRun {
            combination,
            run,
            reason: e.to_string(),
        })?;
        let raw = RawRunOutput::parse(&stdout)?;
        self.cache.insert(key, raw.clone());
        Ok(raw)
    }

    fn missing_keys(&self, combinations: &[ParameterCombination], runs: usize) -> Vec<RunKey> {
        let mut missing: Vec<RunKey> = combinations
            .iter()
            .flat_map(|c| (0..runs).map(move |run| (*c, run)))
            .filter(|key| !self.cache.contains_key(key))
            .collect();
        // Colliding periods produce the same combination more than once
        missing.sort_unstable();
        missing.dedup();
        missing
    }
}

impl<R: SimulationRunner> CampaignGateway for MemoizingGateway<R> {
    fn ensure_run(
        &mut self,
        combination: &ParameterCombination,
        run: usize,
    ) -> Result<RawRunOutput, SweepError> {
        let key = (*combination, run);
        if let Some(raw) = self.cache.get(&key) {
            return Ok(raw.clone());
        }

        debug!(%combination, run, "executing simulation");
        let outcome = self.runner.run(combination, run);
        self.executed += 1;
        self.store(key, outcome)
    }

    fn ensure_all(
        &mut self,
        combinations: &[ParameterCombination],
        runs: usize,
    ) -> Result<(), SweepError> {
        let missing = self.missing_keys(combinations, runs);
        if missing.is_empty() {
            debug!("all runs already available");
            return Ok(());
        }
        info!(
            "running {} missing simulations ({} combinations x {runs} runs requested)",
            missing.len(),
            combinations.len()
        );

        #[cfg(feature = "parallel")]
        let outcomes: Vec<(RunKey, Result<String, RunnerError>)> = {
            let runner = &self.runner;
            missing
                .into_par_iter()
                .map(|key| {
                    let outcome = runner.run(&key.0, key.1);
                    (key, outcome)
                })
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<(RunKey, Result<String, RunnerError>)> = missing
            .into_iter()
            .map(|key| {
                let outcome = self.runner.run(&key.0, key.1);
                (key, outcome)
            })
            .collect();

        self.executed += outcomes.len();
        // Keep every successful run even when another one in the batch failed
        let mut first_error = None;
        for (key, outcome) in outcomes {
            if let Err(e) = self.store(key, outcome) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::model::Period;

    struct CountingRunner {
        calls: AtomicUsize,
    }

    impl SimulationRunner for CountingRunner {
        fn run(
            &self,
            combination: &ParameterCombination,
            run: usize,
        ) -> Result<String, RunnerError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if combination.period.seconds() == 13 {
                return Err(RunnerError::Other("no such scenario".to_string()));
            }
            Ok(format!("100 {}", 50 + run))
        }
    }

    fn gateway() -> MemoizingGateway<CountingRunner> {
        MemoizingGateway::new(CountingRunner {
            calls: AtomicUsize::new(0),
        })
    }

    fn combo(seconds: u64, confirmed: bool) -> ParameterCombination {
        ParameterCombination::new(Period::from_seconds(seconds).unwrap(), confirmed)
    }

    #[test]
    fn test_ensure_run_is_idempotent() {
        let mut gw = gateway();
        let first = gw.ensure_run(&combo(120, false), 3).unwrap();
        let second = gw.ensure_run(&combo(120, false), 3).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.received(), 53.0);
        assert_eq!(gw.executed_count(), 1);
        assert_eq!(gw.runner().calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_ensure_all_executes_only_missing() {
        let mut gw = gateway();
        gw.ensure_run(&combo(120, true), 0).unwrap();

        let combos = [combo(120, false), combo(120, true), combo(120, true)];
        gw.ensure_all(&combos, 2).unwrap();
        assert_eq!(gw.cached_count(), 4);
        assert_eq!(gw.executed_count(), 4);

        gw.ensure_all(&combos, 2).unwrap();
        assert_eq!(gw.executed_count(), 4);
        assert!(gw.contains(&combo(120, false), 1));
    }

    #[test]
    fn test_runner_failure_is_missing_run() {
        let mut gw = gateway();
        let err = gw.ensure_run(&combo(13, false), 0).unwrap_err();
        assert!(matches!(err, SweepError::MissingRun { run: 0, .. }));
        assert!(!gw.contains(&combo(13, false), 0));

        let err = gw.ensure_all(&[combo(13, true)], 1).unwrap_err();
        assert!(matches!(err, SweepError::MissingRun { .. }));
    }

    #[test]
    fn test_failed_batch_keeps_successful_runs() {
        let mut gw = gateway();
        // Period 13 sorts ahead of the runs that succeed
        let combos = [combo(13, false), combo(120, false), combo(1200, false)];
        let err = gw.ensure_all(&combos, 2).unwrap_err();
        assert!(matches!(err, SweepError::MissingRun { run: 0, .. }));
        assert_eq!(gw.executed_count(), 6);
        assert_eq!(gw.cached_count(), 4);

        gw.ensure_all(&combos[1..], 2).unwrap();
        assert_eq!(gw.executed_count(), 6);
        assert_eq!(gw.runner().calls.load(Ordering::Relaxed), 6);
    }
}
