//! Raw per-run simulator output.
//!
//! The simulator prints packet counters as whitespace-separated numbers:
//! `totalSent received [interfered noMoreGateway underSensitivity noMoreTransmissions ...]`.
//! Only the first two are required.

use serde::{Deserialize, Serialize};

use crate::error::SweepError;

const TOTAL_SENT: usize = 0;
const RECEIVED: usize = 1;
const INTERFERED: usize = 2;
const NO_MORE_GATEWAY: usize = 3;
const UNDER_SENSITIVITY: usize = 4;
const NO_MORE_TRANSMISSIONS: usize = 5;

/// Ordered packet counters produced by one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRunOutput {
    fields: Vec<f64>,
}

impl RawRunOutput {
    /// Parse a simulator stdout line (or block) positionally.
    pub fn parse(output: &str) -> Result<Self, SweepError> {
        let malformed = |reason: String| SweepError::MalformedOutput {
            output: output.trim().to_string(),
            reason,
        };

        let fields = output
            .split_ascii_whitespace()
            .enumerate()
            .map(|(i, token)| {
                token
                    .parse::<f64>()
                    .map_err(|_| malformed(format!("field {i} ({token:?}) is not numeric")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_fields(fields).map_err(|e| match e {
            SweepError::MalformedOutput { reason, .. } => malformed(reason),
            other => other,
        })
    }

    /// Build from already-parsed counters, enforcing the output invariants
    pub fn from_fields(fields: Vec<f64>) -> Result<Self, SweepError> {
        let malformed = |reason: String| SweepError::MalformedOutput {
            output: join_fields(&fields),
            reason,
        };

        if fields.len() < 2 {
            return Err(malformed(format!(
                "expected at least 2 fields, found {}",
                fields.len()
            )));
        }
        if let Some((i, v)) = fields
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(malformed(format!(
                "field {i} must be a non-negative number, got {v}"
            )));
        }
        if fields[RECEIVED] > fields[TOTAL_SENT] {
            return Err(malformed(format!(
                "received ({}) exceeds total sent ({})",
                fields[RECEIVED], fields[TOTAL_SENT]
            )));
        }

        Ok(Self { fields })
    }

    #[must_use]
    pub fn total_sent(&self) -> f64 {
        self.fields[TOTAL_SENT]
    }

    #[must_use]
    pub fn received(&self) -> f64 {
        self.fields[RECEIVED]
    }

    #[must_use]
    pub fn interfered(&self) -> Option<f64> {
        self.fields.get(INTERFERED).copied()
    }

    #[must_use]
    pub fn no_more_gateway(&self) -> Option<f64> {
        self.fields.get(NO_MORE_GATEWAY).copied()
    }

    #[must_use]
    pub fn under_sensitivity(&self) -> Option<f64> {
        self.fields.get(UNDER_SENSITIVITY).copied()
    }

    #[must_use]
    pub fn no_more_transmissions(&self) -> Option<f64> {
        self.fields.get(NO_MORE_TRANSMISSIONS).copied()
    }

    #[must_use]
    pub fn fields(&self) -> &[f64] {
        &self.fields
    }
}

fn join_fields(fields: &[f64]) -> String {
    fields
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
