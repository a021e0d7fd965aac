// =============================================================================
// Z-score normalization — global and adaptive (rolling)
// =============================================================================
//
// Global:    z[i] = (x[i] - mean(S)) / std(S)       over the entire series
// Adaptive:  z[i] = (x[i] - mean_w[i]) / std_w[i]   over a trailing window
//
// The global form is used for the social-volume metrics (a spike is measured
// against the asset's whole history); the adaptive form for price and volume
// momentum (a spike is measured against recent behaviour).

use super::{finite, rolling_mean, rolling_std};

/// Global z-score against the mean/std of the whole series.
///
/// Undefined slots in the input are excluded from the mean/std and stay
/// undefined in the output. A zero standard deviation makes every output
/// `None`.
pub fn zscore(series: &[Option<f64>]) -> Vec<Option<f64>> {
    let defined: Vec<f64> = series.iter().filter_map(|&v| v).collect();
    if defined.is_empty() {
        return vec![None; series.len()];
    }

    let n = defined.len() as f64;
    let mean = defined.iter().sum::<f64>() / n;
    let std = (defined.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n).sqrt();

    if std == 0.0 {
        return vec![None; series.len()];
    }

    series
        .iter()
        .map(|&v| finite((v? - mean) / std))
        .collect()
}

/// Adaptive z-score against a trailing `window`-point mean/std.
///
/// `None` wherever the rolling statistics are undefined or the rolling
/// standard deviation is zero.
pub fn adaptive_zscore(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let means = rolling_mean(series, window);
    let stds = rolling_std(series, window);

    series
        .iter()
        .zip(means.iter().zip(stds.iter()))
        .map(|(&v, (&mean, &std))| {
            let std = std?;
            if std == 0.0 {
                return None;
            }
            finite((v? - mean?) / std)
        })
        .collect()
}
