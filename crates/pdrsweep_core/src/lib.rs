//! Packet delivery ratio sweep library
//!
//! This crate drives a load sweep over a LoRaWAN simulation campaign and turns
//! the simulator's raw packet counters into delivery-ratio curves.
//! It supports:
//! - Translating target arrival rates into simulator application periods
//! - Building the (period x confirmed traffic) combination space
//! - Parsing per-run packet counters and extracting the delivery ratio
//! - Assembling a labeled [point, confirmed, run] result cube and reducing it
//!   to mean / standard deviation per combination
//! - Comparing the resulting curves against a reference curve
//!
//! The simulator itself sits behind the [`gateway::CampaignGateway`] trait.
//!
//! ```ignore
//! use pdrsweep_core::{MemoizingGateway, SweepConfig, run_sweep};
//!
//! let config = SweepConfig::default();
//! let mut gateway = MemoizingGateway::new(my_runner);
//! let report = run_sweep(&config, &mut gateway)?;
//! for point in report.curve(false).unwrap_or_default() {
//!     println!("{:.3} pkt/s: {:.3}", point.arrival_rate, point.mean);
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod grid;
pub mod reference;
pub mod space;
pub mod sweep;
pub mod translate;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use aggregate::{ResultCube, SummaryTable, aggregate, reduce};
pub use error::{ConfigError, RunnerError, SweepError};
pub use extract::{extract, extract_from_stdout};
pub use gateway::{CampaignGateway, MemoizingGateway, SimulationRunner};
pub use grid::SweepGrid;
pub use model::{ArrivalRate, ParameterCombination, Period, RawRunOutput, SummaryStat, SweepPoint};
pub use reference::{Comparison, ReferenceCurve, ReferencePoint};
pub use space::{SweepSpace, build_combinations};
pub use sweep::{
    CurvePoint, RateSchedule, SweepConfig, SweepReport, TrafficCurve, collect_cube, run_sweep,
};
pub use translate::{log_spaced_rates, rate_to_period, translate_rates};
