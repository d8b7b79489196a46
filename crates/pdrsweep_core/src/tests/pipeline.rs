//! End-to-end sweep tests
//!
//! These tests verify:
//! - Rates translate into the expected periods and combination space
//! - Per-run metrics are averaged per combination with population std
//! - Re-aggregating against a warm gateway cache is side-effect free

use super::support::ScriptedRunner;
use crate::gateway::{CampaignGateway, MemoizingGateway};
use crate::sweep::{RateSchedule, SweepConfig, collect_cube, run_sweep};

fn reference_config(runs: usize) -> SweepConfig {
    SweepConfig {
        population: 1200,
        runs,
        rates: RateSchedule::Explicit {
            values: vec![0.1, 1.0, 10.0],
        },
        traffic_modes: vec![false, true],
    }
}

fn reference_runner() -> ScriptedRunner {
    ScriptedRunner::new()
        .with_default("100 50")
        .with_output(1200, false, 0, "1200 1100")
        .with_output(1200, false, 1, "1200 1000")
}

/// Test the reference scenario from rates to summary statistics
#[test]
fn test_end_to_end_reference_scenario() {
    let config = reference_config(2);

    let space = config.plan().unwrap();
    let periods: Vec<u64> = space.periods().iter().map(|p| p.seconds()).collect();
    assert_eq!(periods, vec![12000, 1200, 120]);
    assert_eq!(space.combinations().len(), 6);

    let mut gateway = MemoizingGateway::new(reference_runner());
    let report = run_sweep(&config, &mut gateway).unwrap();

    let unconfirmed = report.curve(false).unwrap();
    assert_eq!(unconfirmed.len(), 3);
    let point = unconfirmed[1];
    assert_eq!(point.period, 1200);
    assert_eq!(point.arrival_rate, 1.0);
    assert!((point.mean - 0.875).abs() < 1e-4, "mean was {}", point.mean);
    assert!((point.std - 0.0417).abs() < 1e-4, "std was {}", point.std);

    // Other points use the default 50/100 output
    assert!((unconfirmed[0].mean - 0.5).abs() < 1e-12);
    assert_eq!(unconfirmed[2].std, 0.0);

    // Confirmed traffic is normalized by the population
    let confirmed = report.curve(true).unwrap();
    assert!((confirmed[0].mean - 50.0 / 1200.0).abs() < 1e-12);

    assert_eq!(report.population, 1200);
    assert_eq!(report.runs, 2);
    assert_eq!(report.curves[0].label(), "Unconfirmed");
    assert_eq!(report.curves[1].label(), "Confirmed");
}

/// Test that the cube records the individual run metrics
#[test]
fn test_cube_holds_run_metrics() {
    let config = reference_config(2);
    let space = config.plan().unwrap();
    let mut gateway = MemoizingGateway::new(reference_runner());

    let cube = collect_cube(&space, 2, 1200, &mut gateway).unwrap();
    assert_eq!(cube.shape(), &[3, 2, 2]);
    let samples: Vec<f64> = cube.samples(1, 0).unwrap().into_iter().flatten().collect();
    assert!((samples[0] - 0.9167).abs() < 1e-4);
    assert!((samples[1] - 0.8333).abs() < 1e-4);
}

/// Test that aggregating twice yields identical cubes without re-running
#[test]
fn test_aggregate_is_idempotent() {
    let config = reference_config(3);
    let space = config.plan().unwrap();
    let mut gateway = MemoizingGateway::new(reference_runner());

    gateway.ensure_all(&space.combinations(), 3).unwrap();
    let executed = gateway.executed_count();
    assert_eq!(executed, 6 * 3);

    let first = collect_cube(&space, 3, 1200, &mut gateway).unwrap();
    let second = collect_cube(&space, 3, 1200, &mut gateway).unwrap();

    assert_eq!(gateway.executed_count(), executed);
    assert_eq!(gateway.runner().calls(), executed);
    let bits = |cube: &crate::aggregate::ResultCube| -> Vec<u64> {
        (0..3)
            .flat_map(|p| (0..2).flat_map(move |f| (0..3).map(move |r| (p, f, r))))
            .map(|(p, f, r)| cube.get(p, f, r).unwrap().to_bits())
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));
    assert_eq!(first, second);
}

/// Test that a second sweep over the same gateway reuses every run
#[test]
fn test_repeat_sweep_uses_cache() {
    let config = reference_config(2);
    let mut gateway = MemoizingGateway::new(reference_runner());

    let first = run_sweep(&config, &mut gateway).unwrap();
    let executed = gateway.executed_count();
    let second = run_sweep(&config, &mut gateway).unwrap();

    assert_eq!(first, second);
    assert_eq!(gateway.executed_count(), executed);
}

/// Test a sweep restricted to confirmed traffic only
#[test]
fn test_single_traffic_mode() {
    let config = SweepConfig {
        traffic_modes: vec![true],
        ..reference_config(1)
    };
    let mut gateway = MemoizingGateway::new(reference_runner());
    let report = run_sweep(&config, &mut gateway).unwrap();

    assert!(report.curve(false).is_none());
    assert_eq!(report.curve(true).unwrap().len(), 3);
    assert_eq!(gateway.executed_count(), 3);
}
