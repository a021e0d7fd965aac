// =============================================================================
// Min-max rescaling to [0, 100]
// =============================================================================
//
//   scaled[i] = 100 * (x[i] - min_w[i]) / (max_w[i] - min_w[i])
//
// against the trailing `window`-point minimum and maximum. The value at the
// rolling minimum maps to 0, at the rolling maximum to 100. A zero range
// (flat window) is a degenerate denominator and yields `None`.

use super::{finite, rolling_max, rolling_min};

/// Rescale each point into [0, 100] against its trailing `window` range.
pub fn minmax_rescale(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mins = rolling_min(series, window);
    let maxs = rolling_max(series, window);

    series
        .iter()
        .zip(mins.iter().zip(maxs.iter()))
        .map(|(&v, (&min, &max))| {
            let (min, max) = (min?, max?);
            let range = max - min;
            if range == 0.0 {
                return None;
            }
            finite(100.0 * (v? - min) / range)
        })
        .collect()
}
