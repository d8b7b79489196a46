//! Text, JSON and YAML rendering of sweep plans and reports.

use std::fmt::Write;

use clap::ValueEnum;
use pdrsweep_core::{Comparison, SweepConfig, SweepReport, SweepSpace};
use serde::{Deserialize, Serialize};

use crate::config::ReferenceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Comparison of one traffic mode's curve against its reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeComparison {
    pub confirmed: bool,
    pub comparison: Comparison,
}

/// Everything emitted by `pdrsweep run`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub report: SweepReport,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comparisons: Vec<ModeComparison>,
}

impl ReportDocument {
    /// Attach reference comparisons for the modes present in both inputs
    pub fn new(report: SweepReport, references: &[ReferenceSeries]) -> Self {
        let comparisons = references
            .iter()
            .filter_map(|series| {
                let curve = report.curve(series.confirmed)?;
                Some(ModeComparison {
                    confirmed: series.confirmed,
                    comparison: series.points.compare(curve),
                })
            })
            .collect();
        Self {
            report,
            comparisons,
        }
    }

    fn comparison(&self, confirmed: bool) -> Option<&Comparison> {
        self.comparisons
            .iter()
            .find(|c| c.confirmed == confirmed)
            .map(|c| &c.comparison)
    }

    pub fn render(&self, format: OutputFormat) -> color_eyre::Result<String> {
        Ok(match format {
            OutputFormat::Text => self.to_text(),
            OutputFormat::Json => serde_json::to_string_pretty(self)? + "\n",
            OutputFormat::Yaml => serde_saphyr::to_string(self)?,
        })
    }

    /// One line per arrival rate, grouped by traffic mode
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for curve in &self.report.curves {
            let _ = writeln!(
                out,
                "UL-PDR for {} traffic ({} devices, {} runs)",
                curve.label().to_lowercase(),
                self.report.population,
                self.report.runs
            );
            let comparison = self.comparison(curve.confirmed);
            for (i, point) in curve.points.iter().enumerate() {
                let _ = write!(
                    out,
                    "{:>8.3} pkt/s: {:.3} (std {:.3}, period {} s)",
                    point.arrival_rate, point.mean, point.std, point.period
                );
                if let Some(delta) = comparison.and_then(|c| c.deltas.get(i)) {
                    let _ = write!(out, "  ref {:.3} delta {:+.3}", delta.reference, delta.delta);
                }
                out.push('\n');
            }
            if let Some(c) = comparison {
                let _ = writeln!(
                    out,
                    "max |delta| {:.3}, rmse {:.3}",
                    c.max_abs_delta, c.rmse
                );
            }
            out.push('\n');
        }
        out
    }
}

/// Rate-to-period table and campaign size for `pdrsweep plan`
pub fn render_plan(config: &SweepConfig, space: &SweepSpace) -> String {
    let mut out = String::new();
    for point in space.points() {
        let _ = writeln!(
            out,
            "For {:.3} pkt/s, {} devices need an application period of {} s",
            point.arrival_rate.value(),
            config.population,
            point.period.seconds()
        );
    }

    let combinations = space.combinations().len();
    let _ = writeln!(
        out,
        "{} rates x {} traffic modes = {} combinations, {} simulations at {} runs each",
        space.points().len(),
        space.flags().len(),
        combinations,
        combinations * config.runs,
        config.runs
    );
    if space.has_period_collisions() {
        out.push_str("warning: some rates round to the same period and will share runs\n");
    }
    out
}
