//! Rate-to-period translation.
//!
//! A population of `N` devices each transmitting once per period `T` offers
//! an aggregate load of `N / T` packets per second, so the period needed for
//! a target arrival rate is `ceil(N / rate)`.

use tracing::info;

use crate::error::SweepError;
use crate::model::{ArrivalRate, Period, SweepPoint};

/// Translate a target arrival rate into the simulator's application period.
///
/// The result is non-increasing in `arrival_rate`. Adjacent high rates may
/// round to the same period; such ties are kept as-is.
pub fn rate_to_period(arrival_rate: ArrivalRate, population: u32) -> Result<Period, SweepError> {
    if population == 0 {
        return Err(SweepError::InvalidArgument(
            "population size must be positive".to_string(),
        ));
    }

    let seconds = (f64::from(population) / arrival_rate.value()).ceil();
    if !seconds.is_finite() || seconds >= u64::MAX as f64 {
        return Err(SweepError::InvalidArgument(format!(
            "arrival rate {} yields an unrepresentable period",
            arrival_rate.value()
        )));
    }

    Period::from_seconds(seconds as u64)
}

/// Generate `count` rates evenly spaced on a log10 scale between
/// `10^start_exponent` and `10^stop_exponent`, both endpoints included.
pub fn log_spaced_rates(
    start_exponent: f64,
    stop_exponent: f64,
    count: usize,
) -> Result<Vec<ArrivalRate>, SweepError> {
    if count == 0 {
        return Err(SweepError::InvalidArgument(
            "log-spaced schedule needs at least one point".to_string(),
        ));
    }
    if !start_exponent.is_finite() || !stop_exponent.is_finite() {
        return Err(SweepError::InvalidArgument(format!(
            "exponents must be finite, got {start_exponent}..{stop_exponent}"
        )));
    }
    if count == 1 {
        return Ok(vec![ArrivalRate::new(10f64.powf(start_exponent))?]);
    }

    let step = (stop_exponent - start_exponent) / (count - 1) as f64;
    (0..count)
        .map(|i| {
            // Pin the last exponent so the upper endpoint is exact
            let exponent = if i == count - 1 {
                stop_exponent
            } else {
                start_exponent + step * i as f64
            };
            ArrivalRate::new(10f64.powf(exponent))
        })
        .collect()
}

/// Translate every rate of a schedule, keeping each rate next to its period
pub fn translate_rates(
    rates: &[ArrivalRate],
    population: u32,
) -> Result<Vec<SweepPoint>, SweepError> {
    rates
        .iter()
        .map(|&arrival_rate| {
            let period = rate_to_period(arrival_rate, population)?;
            info!(
                "{:.3} pkt/s over {population} devices needs an application period of {}",
                arrival_rate.value(),
                period
            );
            Ok(SweepPoint {
                arrival_rate,
                period,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn rate(v: f64) -> ArrivalRate {
        ArrivalRate::new(v).unwrap()
    }

    #[test]
    fn test_reference_periods() {
        let periods: Vec<u64> = [0.1, 1.0, 10.0]
            .into_iter()
            .map(|r| rate_to_period(rate(r), 1200).unwrap().seconds())
            .collect();
        assert_eq!(periods, vec![12000, 1200, 120]);
    }

    #[test]
    fn test_rounds_up() {
        assert_eq!(rate_to_period(rate(7.0), 1200).unwrap().seconds(), 172);
        // Very high rates still produce a one-second period
        assert_eq!(rate_to_period(rate(5000.0), 1200).unwrap().seconds(), 1);
    }

    #[test]
    fn test_zero_population() {
        assert!(matches!(
            rate_to_period(rate(1.0), 0),
            Err(SweepError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unrepresentable_period() {
        assert!(rate_to_period(rate(f64::MIN_POSITIVE), 1200).is_err());
        // 1 / 2^-64 is exactly 2^64, one past u64::MAX
        assert!(rate_to_period(rate(2f64.powi(-64)), 1).is_err());
        assert!(rate_to_period(rate(2f64.powi(-63)), 1).is_ok());
    }

    #[test]
    fn test_monotonic_non_increasing() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            let a1: f64 = rng.random_range(1e-3..50.0);
            let a2: f64 = rng.random_range(1e-3..50.0);
            let (lo, hi) = if a1 < a2 { (a1, a2) } else { (a2, a1) };
            let p_lo = rate_to_period(rate(lo), 1200).unwrap();
            let p_hi = rate_to_period(rate(hi), 1200).unwrap();
            assert!(p_hi.seconds() > 0);
            assert!(p_lo >= p_hi, "{lo} -> {p_lo}, {hi} -> {p_hi}");
        }
    }

    #[test]
    fn test_log_spaced_endpoints() {
        let rates = log_spaced_rates(-2.0, 1.0, 14).unwrap();
        assert_eq!(rates.len(), 14);
        assert!((rates[0].value() - 0.01).abs() < 1e-15);
        assert!((rates[13].value() - 10.0).abs() < 1e-12);
        assert!(rates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_log_spaced_edge_cases() {
        assert!(log_spaced_rates(0.0, 1.0, 0).is_err());
        assert!(log_spaced_rates(f64::NAN, 1.0, 3).is_err());
        let single = log_spaced_rates(1.0, 3.0, 1).unwrap();
        assert_eq!(single.len(), 1);
        assert!((single[0].value() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_translate_rates_keeps_rates() {
        let points = translate_rates(&[rate(1.0), rate(10.0)], 1200).unwrap();
        assert_eq!(points[0].arrival_rate, rate(1.0));
        assert_eq!(points[0].period.seconds(), 1200);
        assert_eq!(points[1].period.seconds(), 120);
    }
}
