//! Scripted simulator used by the pipeline tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::RunnerError;
use crate::gateway::SimulationRunner;
use crate::model::ParameterCombination;

/// Returns canned stdout per (period, confirmed, run), or a default line
pub struct ScriptedRunner {
    outputs: HashMap<(u64, bool, usize), String>,
    default_output: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self {
            outputs: HashMap::new(),
            default_output: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_default(mut self, stdout: &str) -> Self {
        self.default_output = Some(stdout.to_string());
        self
    }

    pub fn with_output(mut self, period: u64, confirmed: bool, run: usize, stdout: &str) -> Self {
        self.outputs
            .insert((period, confirmed, run), stdout.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl SimulationRunner for ScriptedRunner {
    fn run(&self, combination: &ParameterCombination, run: usize) -> Result<String, RunnerError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let key = (combination.period.seconds(), combination.confirmed, run);
        self.outputs
            .get(&key)
            .or(self.default_output.as_ref())
            .cloned()
            .ok_or_else(|| RunnerError::ExitStatus {
                code: Some(1),
                stderr: format!("no scripted output for {combination} run {run}"),
            })
    }
}
