//! Launches the external simulator for one (combination, run) pair.

use std::path::PathBuf;
use std::process::Command;

use pdrsweep_core::{ParameterCombination, RunnerError, SimulationRunner};

use crate::config::SimulatorConfig;

/// Runs the simulator as a child process and captures its stdout
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandRunner {
    pub fn new(config: &SimulatorConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_dir: config.working_dir.clone(),
        }
    }

    /// Arguments for one run with placeholders filled in
    pub fn arguments(&self, combination: &ParameterCombination, run: usize) -> Vec<String> {
        let period = combination.period.seconds().to_string();
        let confirmed = combination.confirmed.to_string();
        let percentage = if combination.confirmed { "100" } else { "0" };
        let run = run.to_string();
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{period}", &period)
                    .replace("{confirmed_percentage}", percentage)
                    .replace("{confirmed}", &confirmed)
                    .replace("{run}", &run)
            })
            .collect()
    }
}

impl SimulationRunner for CommandRunner {
    fn run(&self, combination: &ParameterCombination, run: usize) -> Result<String, RunnerError> {
        let args = self.arguments(combination, run);
        tracing::debug!(program = %self.program, ?args, "launching simulator");

        let mut command = Command::new(&self.program);
        command.args(&args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = command
            .output()
            .map_err(|e| RunnerError::Spawn(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(%combination, run, status = %output.status, "simulator failed");
            return Err(RunnerError::ExitStatus {
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
