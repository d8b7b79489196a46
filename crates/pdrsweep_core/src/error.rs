use std::fmt;

use crate::model::ParameterCombination;

/// Errors raised while validating a sweep configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroPopulation,
    NoTrafficModes,
    DuplicateTrafficMode(bool),
    EmptyRateSchedule,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroPopulation => write!(f, "population size must be positive"),
            ConfigError::NoTrafficModes => write!(f, "at least one traffic mode is required"),
            ConfigError::DuplicateTrafficMode(flag) => {
                write!(f, "traffic mode confirmed={flag} listed more than once")
            }
            ConfigError::EmptyRateSchedule => write!(f, "rate schedule produced no arrival rates"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors surfaced by the sweep pipeline.
///
/// None of these are retried by the pipeline itself; callers decide whether
/// to re-invoke the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepError {
    /// Non-positive rate or population, or an out-of-range index
    InvalidArgument(String),
    /// Raw simulator output has the wrong shape or contents
    MalformedOutput { output: String, reason: String },
    /// A run reported zero packets in a denominator field
    DivideByZero { field: &'static str },
    /// The gateway could not supply a requested run
    MissingRun {
        combination: ParameterCombination,
        run: usize,
        reason: String,
    },
    /// Reduction over zero samples
    EmptyReduction,
    Config(ConfigError),
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            SweepError::MalformedOutput { output, reason } => {
                write!(f, "malformed simulator output {output:?}: {reason}")
            }
            SweepError::DivideByZero { field } => {
                write!(f, "cannot compute metric: {field} is zero")
            }
            SweepError::MissingRun {
                combination,
                run,
                reason,
            } => write!(f, "run {run} for {combination} unavailable: {reason}"),
            SweepError::EmptyReduction => write!(f, "cannot reduce over zero runs"),
            SweepError::Config(e) => write!(f, "configuration error: {e}"),
        }
    }
}

impl std::error::Error for SweepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SweepError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SweepError {
    fn from(e: ConfigError) -> Self {
        SweepError::Config(e)
    }
}

/// Failure reported by a [`crate::gateway::SimulationRunner`]
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerError {
    Spawn(String),
    ExitStatus { code: Option<i32>, stderr: String },
    Other(String),
}

impl fmt::Display for RunnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::Spawn(msg) => write!(f, "failed to start simulator: {msg}"),
            RunnerError::ExitStatus { code: Some(code), stderr } => {
                write!(f, "simulator exited with status {code}: {stderr}")
            }
            RunnerError::ExitStatus { code: None, stderr } => {
                write!(f, "simulator terminated by signal: {stderr}")
            }
            RunnerError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for RunnerError {}

pub type Result<T> = std::result::Result<T, SweepError>;
