// =============================================================================
// Signals Module
// =============================================================================
//
// Discrete FOMO-signal detection over the computed index series.

pub mod detector;

pub use detector::detect;
