//! Data types shared across the sweep pipeline

mod output;
mod params;
mod stats;

pub use output::RawRunOutput;
pub use params::{ArrivalRate, ParameterCombination, Period, SweepPoint};
pub use stats::SummaryStat;
