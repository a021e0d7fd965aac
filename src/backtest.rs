// =============================================================================
// Backtest Evaluator — scoring flagged signals against forward returns
// =============================================================================
//
// Joins each flagged index to the price `horizon` samples ahead and reports
// aggregate signal quality. Signals with no valid forward observation are
// excluded outright — no padding or forward-fill.
//
// Zero qualifying signals is a legitimate outcome, reported explicitly as
// `NoSignals` rather than as empty statistics or a division error.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::pipeline::DerivedSeries;

/// One evaluated signal: when it fired, the index level, and the forward
/// price change.
#[derive(Debug, Clone, Serialize)]
pub struct SignalRecord {
    pub timestamp: NaiveDateTime,
    pub fomo_index: f64,
    pub price_change_pct: f64,
}

/// Aggregate statistics over all qualifying signals.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestSummary {
    pub horizon: usize,
    pub total_signals: usize,
    /// Signals whose forward change was strictly positive.
    pub successful_signals: usize,
    pub success_rate_pct: f64,
    pub avg_change_pct: f64,
    pub min_change_pct: f64,
    pub max_change_pct: f64,
    pub signals: Vec<SignalRecord>,
}

/// Outcome of a backtest run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BacktestOutcome {
    /// No flagged index had a valid forward observation.
    NoSignals,
    Evaluated(BacktestSummary),
}

/// False-positive analysis: high-index rows followed by a price drop.
#[derive(Debug, Clone, Serialize)]
pub struct FalsePositiveReport {
    pub horizon: usize,
    pub fomo_threshold: f64,
    pub drop_threshold: f64,
    pub total_signals: usize,
    pub false_positive_count: usize,
    pub false_positive_rate_pct: f64,
    pub false_positives: Vec<SignalRecord>,
}

/// Outcome of the false-positive analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FalsePositiveOutcome {
    NoSignals,
    Evaluated(FalsePositiveReport),
}

/// Percentage price change from index `i` to `i + horizon`, if the forward
/// observation exists.
fn forward_change(series: &DerivedSeries, i: usize, horizon: usize) -> Option<f64> {
    let future = series.observations.get(i + horizon)?.price;
    let current = series.observations[i].price;
    Some((future - current) / current * 100.0)
}

/// Evaluate the detector's flagged signals at the given forward horizon.
pub fn backtest_signals(series: &DerivedSeries, horizon: usize) -> BacktestOutcome {
    let records: Vec<SignalRecord> = (0..series.len())
        .filter(|&i| series.fomo_signal[i])
        .filter_map(|i| {
            let change = forward_change(series, i, horizon)?;
            Some(SignalRecord {
                timestamp: series.observations[i].timestamp,
                fomo_index: series.fomo_index[i],
                price_change_pct: change,
            })
        })
        .collect();

    if records.is_empty() {
        return BacktestOutcome::NoSignals;
    }

    let total = records.len();
    let successful = records.iter().filter(|r| r.price_change_pct > 0.0).count();
    let sum: f64 = records.iter().map(|r| r.price_change_pct).sum();
    let min = records
        .iter()
        .map(|r| r.price_change_pct)
        .fold(f64::INFINITY, f64::min);
    let max = records
        .iter()
        .map(|r| r.price_change_pct)
        .fold(f64::NEG_INFINITY, f64::max);

    BacktestOutcome::Evaluated(BacktestSummary {
        horizon,
        total_signals: total,
        successful_signals: successful,
        success_rate_pct: successful as f64 / total as f64 * 100.0,
        avg_change_pct: sum / total as f64,
        min_change_pct: min,
        max_change_pct: max,
        signals: records,
    })
}

/// Analyse false positives: rows whose index exceeds `fomo_threshold` but
/// whose forward change falls strictly below `drop_threshold`.
///
/// Unlike `backtest_signals` this reads the index level directly rather than
/// the detector's flags, so it also covers sustained-high regimes the jump
/// detector ignores.
pub fn false_positive_analysis(
    series: &DerivedSeries,
    horizon: usize,
    fomo_threshold: f64,
    drop_threshold: f64,
) -> FalsePositiveOutcome {
    let signals: Vec<SignalRecord> = (0..series.len())
        .filter(|&i| series.fomo_index[i] > fomo_threshold)
        .filter_map(|i| {
            let change = forward_change(series, i, horizon)?;
            Some(SignalRecord {
                timestamp: series.observations[i].timestamp,
                fomo_index: series.fomo_index[i],
                price_change_pct: change,
            })
        })
        .collect();

    if signals.is_empty() {
        return FalsePositiveOutcome::NoSignals;
    }

    let total = signals.len();
    let false_positives: Vec<SignalRecord> = signals
        .into_iter()
        .filter(|r| r.price_change_pct < drop_threshold)
        .collect();

    FalsePositiveOutcome::Evaluated(FalsePositiveReport {
        horizon,
        fomo_threshold,
        drop_threshold,
        total_signals: total,
        false_positive_count: false_positives.len(),
        false_positive_rate_pct: false_positives.len() as f64 / total as f64 * 100.0,
        false_positives,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::quiet_series;
    use crate::pipeline::{self, DerivedSeries};
    use crate::runtime_config::PipelineParams;

    /// Derived series over the given prices with hand-planted index values
    /// and signal flags.
    fn series(prices: &[f64], index: Vec<f64>, flags: Vec<bool>) -> DerivedSeries {
        let mut derived =
            pipeline::run(quiet_series(prices), &PipelineParams::default()).unwrap();
        assert_eq!(index.len(), derived.len());
        assert_eq!(flags.len(), derived.len());
        derived.fomo_index = index;
        derived.fomo_signal = flags;
        derived
    }

    #[test]
    fn no_flags_reports_no_signals() {
        let prices = [100.0, 101.0, 102.0, 103.0];
        let s = series(&prices, vec![0.0; 4], vec![false; 4]);
        assert!(matches!(backtest_signals(&s, 2), BacktestOutcome::NoSignals));
    }

    #[test]
    fn signal_without_forward_observation_is_excluded() {
        // E4: exactly 7 points, one flag at index 0, horizon 7 — index 7 does
        // not exist, so the lone signal is excluded and the run is empty.
        let prices = [100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 106.0];
        let mut flags = vec![false; 7];
        flags[0] = true;
        let s = series(&prices, vec![95.0; 7], flags);
        assert!(matches!(backtest_signals(&s, 7), BacktestOutcome::NoSignals));
    }

    #[test]
    fn summary_statistics() {
        // Two qualifying signals at indices 0 and 2, horizon 2:
        //   100 -> 105  (+5%)    105 -> 99.75  (-5%)
        let prices = [100.0, 101.0, 105.0, 102.0, 99.75];
        let flags = vec![true, false, true, false, false];
        let s = series(&prices, vec![92.0; 5], flags);

        match backtest_signals(&s, 2) {
            BacktestOutcome::Evaluated(sum) => {
                assert_eq!(sum.total_signals, 2);
                assert_eq!(sum.successful_signals, 1);
                assert!((sum.success_rate_pct - 50.0).abs() < 1e-9);
                assert!(sum.avg_change_pct.abs() < 1e-9);
                assert!((sum.min_change_pct + 5.0).abs() < 1e-9);
                assert!((sum.max_change_pct - 5.0).abs() < 1e-9);
            }
            other => panic!("expected Evaluated, got {other:?}"),
        }
    }

    #[test]
    fn zero_forward_change_is_not_a_success() {
        let prices = [100.0, 101.0, 100.0];
        let flags = vec![true, false, false];
        let s = series(&prices, vec![95.0, 0.0, 0.0], flags);
        match backtest_signals(&s, 2) {
            BacktestOutcome::Evaluated(sum) => {
                assert_eq!(sum.total_signals, 1);
                assert_eq!(sum.successful_signals, 0);
            }
            other => panic!("expected Evaluated, got {other:?}"),
        }
    }

    #[test]
    fn false_positive_drop_threshold_is_strict() {
        // E5: a forward change of exactly -5% is NOT a false positive.
        let prices = [100.0, 100.0, 95.0, 94.0];
        let s = series(&prices, vec![85.0, 85.0, 0.0, 0.0], vec![false; 4]);

        match false_positive_analysis(&s, 2, 80.0, -5.0) {
            FalsePositiveOutcome::Evaluated(report) => {
                assert_eq!(report.total_signals, 2);
                // index 0: 100 -> 95 = exactly -5% (excluded, strict <)
                // index 1: 100 -> 94 = -6% (counted)
                assert_eq!(report.false_positive_count, 1);
                assert!((report.false_positive_rate_pct - 50.0).abs() < 1e-9);
            }
            other => panic!("expected Evaluated, got {other:?}"),
        }
    }

    #[test]
    fn false_positive_analysis_ignores_low_index_rows() {
        let prices = [100.0, 100.0, 80.0];
        let s = series(&prices, vec![79.0, 10.0, 0.0], vec![false; 3]);
        assert!(matches!(
            false_positive_analysis(&s, 1, 80.0, -5.0),
            FalsePositiveOutcome::NoSignals
        ));
    }
}
