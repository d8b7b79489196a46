//! Uplink packet delivery ratio extraction.
//!
//! Unconfirmed traffic is measured per attempt (`received / totalSent`).
//! Confirmed traffic may retransmit, so its delivery ratio is normalized to
//! the device population instead (`received / population`).

use crate::error::SweepError;
use crate::model::RawRunOutput;

/// Compute the delivery-ratio metric of one run.
///
/// The traffic mode is passed explicitly for every call.
pub fn extract(raw: &RawRunOutput, confirmed: bool, population: u32) -> Result<f64, SweepError> {
    if confirmed {
        if population == 0 {
            return Err(SweepError::InvalidArgument(
                "population size must be positive".to_string(),
            ));
        }
        Ok(raw.received() / f64::from(population))
    } else {
        if raw.total_sent() == 0.0 {
            return Err(SweepError::DivideByZero {
                field: "totalSent",
            });
        }
        Ok(raw.received() / raw.total_sent())
    }
}

/// Parse simulator stdout and extract the metric in one step
pub fn extract_from_stdout(
    stdout: &str,
    confirmed: bool,
    population: u32,
) -> Result<f64, SweepError> {
    let raw = RawRunOutput::parse(stdout)?;
    extract(&raw, confirmed, population)
}
