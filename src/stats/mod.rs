// =============================================================================
// Series Statistics Library
// =============================================================================
//
// Pure, side-effect-free rolling and whole-series statistics over ordered
// numeric sequences. Undefined values are first-class: inputs and outputs are
// `Option<f64>` slots aligned index-for-index with the series.
//
// Every function returns `None` at index `i` when:
//   - fewer than `window` points exist up to and including `i`, or
//   - any point inside the trailing window is itself undefined, or
//   - the denominator (standard deviation / range) is zero.
//
// Nothing here panics or divides by zero into infinity; the undefined-value
// policy is the caller's to resolve (each consuming formula documents its own
// coalescing rule).

pub mod rescale;
pub mod rolling;
pub mod zscore;

pub use rescale::minmax_rescale;
pub use rolling::{rolling_max, rolling_mean, rolling_min, rolling_std};
pub use zscore::{adaptive_zscore, zscore};

/// Wrap a fully-defined series so it can enter the `Option`-based pipeline.
pub fn lift(series: &[f64]) -> Vec<Option<f64>> {
    series.iter().map(|&v| Some(v)).collect()
}

/// The trailing `window` values ending at `i`, or `None` if the window is not
/// fully populated or contains an undefined slot.
pub(crate) fn window_at(series: &[Option<f64>], window: usize, i: usize) -> Option<Vec<f64>> {
    if window == 0 || i + 1 < window {
        return None;
    }
    series[i + 1 - window..=i].iter().copied().collect()
}

/// `Some(v)` only when `v` is finite.
pub(crate) fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
