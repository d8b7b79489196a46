//! Campaign and reference files.
//!
//! A campaign file holds the sweep settings and the simulator command:
//!
//! ```yaml
//! sweep:
//!   population: 1200
//!   runs: 10
//!   rates:
//!     log_spaced: { start_exponent: -2.0, stop_exponent: 1.0, count: 14 }
//!   traffic_modes: [false, true]
//! simulator:
//!   program: ./build/src/lorawan/examples/ns3-dev-replicate-fig2davide-default
//!   args: ["--appPeriod={period}", "--confirmedPercentage={confirmed_percentage}", "--RngRun={run}"]
//!   working_dir: ../../..
//! ```
//!
//! The program is the built scenario binary rather than a build wrapper, so
//! stdout holds nothing but the packet counters.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, eyre};
use pdrsweep_core::{ReferenceCurve, SweepConfig};
use serde::{Deserialize, Serialize};

/// Command used to launch one simulation.
///
/// `{period}`, `{confirmed}` (`true` / `false`), `{confirmed_percentage}`
/// (`100` / `0`) and `{run}` are substituted in every argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    pub program: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

fn default_args() -> Vec<String> {
    vec![
        "--appPeriod={period}".to_string(),
        "--confirmedPercentage={confirmed_percentage}".to_string(),
        "--RngRun={run}".to_string(),
    ]
}

/// Contents of a campaign file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignFile {
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulator: Option<SimulatorConfig>,
}

impl CampaignFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read campaign file {}", path.display()))?;
        let campaign = Self::from_yaml(&content)
            .wrap_err_with(|| format!("failed to parse campaign file {}", path.display()))?;
        campaign
            .sweep
            .validate()
            .wrap_err_with(|| format!("invalid sweep in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded campaign file");
        Ok(campaign)
    }

    /// The simulator section, required for running a campaign
    pub fn simulator(&self) -> color_eyre::Result<&SimulatorConfig> {
        self.simulator
            .as_ref()
            .ok_or_else(|| eyre!("campaign file has no `simulator` section"))
    }
}

/// Reference values for one traffic mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSeries {
    pub confirmed: bool,
    pub points: ReferenceCurve,
}

/// Load a YAML list of reference series
pub fn load_references(path: &Path) -> color_eyre::Result<Vec<ReferenceSeries>> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read reference file {}", path.display()))?;
    serde_saphyr::from_str(&content)
        .wrap_err_with(|| format!("failed to parse reference file {}", path.display()))
}
