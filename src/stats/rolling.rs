// =============================================================================
// Rolling-window statistics
// =============================================================================
//
// Trailing-window mean / standard deviation / min / max. Each output index
// covers the `window` points ending at that index; earlier indices (and any
// window containing an undefined slot) are `None`.
//
// Standard deviation uses the POPULATION convention (divide by n, not n-1) so
// that results are reproducible across consumers without a ddof argument.

use super::{finite, window_at};

/// Trailing mean over `window` points.
pub fn rolling_mean(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..series.len())
        .map(|i| {
            let w = window_at(series, window, i)?;
            finite(w.iter().sum::<f64>() / w.len() as f64)
        })
        .collect()
}

/// Trailing population standard deviation over `window` points.
pub fn rolling_std(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..series.len())
        .map(|i| {
            let w = window_at(series, window, i)?;
            let n = w.len() as f64;
            let mean = w.iter().sum::<f64>() / n;
            let var = w.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
            finite(var.sqrt())
        })
        .collect()
}

/// Trailing minimum over `window` points.
pub fn rolling_min(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..series.len())
        .map(|i| {
            let w = window_at(series, window, i)?;
            w.into_iter().reduce(f64::min)
        })
        .collect()
}

/// Trailing maximum over `window` points.
pub fn rolling_max(series: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..series.len())
        .map(|i| {
            let w = window_at(series, window, i)?;
            w.into_iter().reduce(f64::max)
        })
        .collect()
}
