//! Sweep driver: configuration in, per-traffic-mode delivery curves out.
//!
//! Everything a sweep depends on (population size, run count, rate schedule
//! and traffic modes) comes from an explicit [`SweepConfig`], so concurrent
//! sweeps with different settings never share state.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregate::{ResultCube, SummaryTable, aggregate, reduce};
use crate::error::{ConfigError, SweepError};
use crate::extract::extract;
use crate::gateway::CampaignGateway;
use crate::model::ArrivalRate;
use crate::space::SweepSpace;
use crate::translate::{log_spaced_rates, translate_rates};

/// How target arrival rates are generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSchedule {
    /// `count` rates from `10^start_exponent` to `10^stop_exponent`
    LogSpaced {
        start_exponent: f64,
        stop_exponent: f64,
        count: usize,
    },
    /// Rates listed one by one, in sweep order
    Explicit { values: Vec<f64> },
}

impl Default for RateSchedule {
    fn default() -> Self {
        RateSchedule::LogSpaced {
            start_exponent: -2.0,
            stop_exponent: 1.0,
            count: 14,
        }
    }
}

impl RateSchedule {
    pub fn rates(&self) -> Result<Vec<ArrivalRate>, SweepError> {
        match self {
            RateSchedule::LogSpaced {
                start_exponent,
                stop_exponent,
                count,
            } => log_spaced_rates(*start_exponent, *stop_exponent, *count),
            RateSchedule::Explicit { values } => {
                values.iter().map(|&v| ArrivalRate::new(v)).collect()
            }
        }
    }
}

/// Configuration for one sweep, fixed for its whole duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Number of simulated end devices
    #[serde(default = "default_population")]
    pub population: u32,
    /// Independent runs per parameter combination
    #[serde(default = "default_runs")]
    pub runs: usize,
    #[serde(default)]
    pub rates: RateSchedule,
    /// Values of the `confirmed` flag to sweep
    #[serde(default = "default_traffic_modes")]
    pub traffic_modes: Vec<bool>,
}

fn default_population() -> u32 {
    1200
}

fn default_runs() -> usize {
    10
}

fn default_traffic_modes() -> Vec<bool> {
    vec![false, true]
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            population: default_population(),
            runs: default_runs(),
            rates: RateSchedule::default(),
            traffic_modes: default_traffic_modes(),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.traffic_modes.is_empty() {
            return Err(ConfigError::NoTrafficModes);
        }
        for (i, flag) in self.traffic_modes.iter().enumerate() {
            if self.traffic_modes[..i].contains(flag) {
                return Err(ConfigError::DuplicateTrafficMode(*flag));
            }
        }
        if let RateSchedule::Explicit { values } = &self.rates
            && values.is_empty()
        {
            return Err(ConfigError::EmptyRateSchedule);
        }
        Ok(())
    }

    /// Translate the rate schedule into the sweep's combination space
    pub fn plan(&self) -> Result<SweepSpace, SweepError> {
        self.validate()?;
        let rates = self.rates.rates()?;
        let points = translate_rates(&rates, self.population)?;
        let space = SweepSpace::new(points, self.traffic_modes.clone());

        if space.has_period_collisions() {
            warn!("several arrival rates round to the same period; their runs are shared");
        }
        Ok(space)
    }
}

/// Fetch every run through the gateway and extract its metric
pub fn collect_cube<G>(
    space: &SweepSpace,
    runs: usize,
    population: u32,
    gateway: &mut G,
) -> Result<ResultCube, SweepError>
where
    G: CampaignGateway + ?Sized,
{
    aggregate(space, runs, |combination, run| {
        let raw = gateway.ensure_run(combination, run)?;
        extract(&raw, combination.confirmed, population)
    })
}

/// Run the full pipeline: plan, ensure runs exist, extract, aggregate, reduce
pub fn run_sweep<G>(config: &SweepConfig, gateway: &mut G) -> Result<SweepReport, SweepError>
where
    G: CampaignGateway + ?Sized,
{
    let space = config.plan()?;
    let combinations = space.combinations();
    info!(
        "sweeping {} rates x {} traffic modes ({} combinations, {} runs each)",
        space.points().len(),
        space.flags().len(),
        combinations.len(),
        config.runs
    );

    gateway.ensure_all(&combinations, config.runs)?;
    let cube = collect_cube(&space, config.runs, config.population, gateway)?;
    let table = reduce(&cube)?;

    Ok(SweepReport::from_table(config, &table))
}

/// One point of a delivery-ratio curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Packets per second, plotted on a log axis
    pub arrival_rate: f64,
    pub period: u64,
    pub mean: f64,
    pub std: f64,
}

/// Delivery-ratio curve for a single traffic mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficCurve {
    pub confirmed: bool,
    pub points: Vec<CurvePoint>,
}

impl TrafficCurve {
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.confirmed {
            "Confirmed"
        } else {
            "Unconfirmed"
        }
    }
}

/// Outcome of a sweep, ready to hand to a report or plot consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub population: u32,
    pub runs: usize,
    pub curves: Vec<TrafficCurve>,
}

impl SweepReport {
    #[must_use]
    pub fn from_table(config: &SweepConfig, table: &SummaryTable) -> Self {
        let curves = table
            .space()
            .flags()
            .iter()
            .filter_map(|&confirmed| {
                let points = table
                    .select(confirmed)?
                    .into_iter()
                    .map(|(point, stat)| CurvePoint {
                        arrival_rate: point.arrival_rate.value(),
                        period: point.period.seconds(),
                        mean: stat.mean,
                        std: stat.std,
                    })
                    .collect();
                Some(TrafficCurve { confirmed, points })
            })
            .collect();

        Self {
            population: config.population,
            runs: config.runs,
            curves,
        }
    }

    /// Points of the curve for one traffic mode, in sweep order
    #[must_use]
    pub fn curve(&self, confirmed: bool) -> Option<&[CurvePoint]> {
        self.curves
            .iter()
            .find(|c| c.confirmed == confirmed)
            .map(|c| c.points.as_slice())
    }
}
