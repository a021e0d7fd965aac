// =============================================================================
// Single-Token Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicators over a fetched price/volume history,
// feeding the standalone single-token composite score. Unlike the series
// pipeline these are snapshot indicators: each returns one value for the end
// of the history, with a documented neutral default when data is short.

pub mod rsi;
pub mod volume;

pub use rsi::rsi;
pub use volume::{volume_metrics, volume_oscillator, VolumeMetrics};
