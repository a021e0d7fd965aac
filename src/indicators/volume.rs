// =============================================================================
// Volume analysis — oscillator and summary metrics
// =============================================================================
//
// Oscillator: (SMA5 - SMA15) / SMA15 * 100 over raw volumes. Positive means
// recent volume runs above its baseline.
//
// The metrics bundle feeds the single-token composite score and the volume
// bar display: total / average / median volume, dispersion (population std
// dev and coefficient-of-variation %), and a least-squares trend slope.

use serde::{Deserialize, Serialize};

/// Summary metrics over a volume history. All fields default to 0 when the
/// history is empty or too short for the underlying calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeMetrics {
    pub total_volume: f64,
    pub average_volume: f64,
    pub median_volume: f64,
    pub volume_std_dev: f64,
    /// Coefficient of variation as a percentage: std / mean * 100.
    pub volume_volatility: f64,
    /// Least-squares slope of volume against sample index.
    pub volume_trend: f64,
    pub volume_oscillator: f64,
}

impl Default for VolumeMetrics {
    fn default() -> Self {
        Self {
            total_volume: 0.0,
            average_volume: 0.0,
            median_volume: 0.0,
            volume_std_dev: 0.0,
            volume_volatility: 0.0,
            volume_trend: 0.0,
            volume_oscillator: 0.0,
        }
    }
}

/// Volume oscillator: percentage spread of the short SMA over the long SMA,
/// both taken at the end of the history.
///
/// Returns 0 when the history is shorter than `long_period` or the long SMA
/// is zero.
pub fn volume_oscillator(volumes: &[f64], short_period: usize, long_period: usize) -> f64 {
    if short_period == 0 || long_period == 0 || volumes.len() < long_period {
        return 0.0;
    }

    let short_ma =
        volumes[volumes.len() - short_period..].iter().sum::<f64>() / short_period as f64;
    let long_ma = volumes[volumes.len() - long_period..].iter().sum::<f64>() / long_period as f64;

    if long_ma == 0.0 {
        return 0.0;
    }

    let value = (short_ma - long_ma) / long_ma * 100.0;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Compute the full metrics bundle over a volume history.
///
/// An empty history yields the all-zero default bundle.
pub fn volume_metrics(volumes: &[f64]) -> VolumeMetrics {
    if volumes.is_empty() {
        return VolumeMetrics::default();
    }

    let n = volumes.len() as f64;
    let total: f64 = volumes.iter().sum();
    let mean = total / n;

    let variance = volumes.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let std_dev = variance.sqrt();
    let volatility = if mean != 0.0 { std_dev / mean * 100.0 } else { 0.0 };

    VolumeMetrics {
        total_volume: total,
        average_volume: mean,
        median_volume: median(volumes),
        volume_std_dev: std_dev,
        volume_volatility: volatility,
        volume_trend: trend_slope(volumes),
        volume_oscillator: volume_oscillator(volumes, 5, 15),
    }
}

/// Median of a non-empty slice (mean of the two middle values for even
/// lengths).
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Least-squares slope of `values` against their indices 0..n.
///
/// Returns 0 for histories shorter than two points (no trend is definable).
fn trend_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 2 {
        return 0.0;
    }

    let sum_x = (0..values.len()).map(|i| i as f64).sum::<f64>();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, v)| i as f64 * v).sum();
    let sum_x2: f64 = (0..values.len()).map(|i| (i as f64) * (i as f64)).sum();

    let denom = n * sum_x2 - sum_x * sum_x;
    if denom == 0.0 {
        return 0.0;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    if slope.is_finite() {
        slope
    } else {
        0.0
    }
}
