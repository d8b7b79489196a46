//! Command-line front end for the delivery-ratio sweep.
//!
//! Loads campaign files, launches the simulator through [`runner::CommandRunner`]
//! and renders the reduced curves.

pub mod config;
pub mod logging;
pub mod report;
pub mod runner;

pub use config::{CampaignFile, ReferenceSeries, SimulatorConfig, load_references};
pub use logging::init_logging;
pub use report::{OutputFormat, ReportDocument, render_plan};
pub use runner::CommandRunner;
