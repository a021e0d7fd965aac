// =============================================================================
// Composite Index Engine
// =============================================================================
//
// Two independent composites for two different views:
//   - `fomo_index`: the [0, 100] FOMO Index over the full derived series,
//     in either of two configured weight variants.
//   - `score`: the single-token snapshot composite (RSI + volume metrics)
//     behind the standalone token view and its trading recommendation.

pub mod fomo_index;
pub mod score;

pub use score::{composite_score, TokenAssessment};
