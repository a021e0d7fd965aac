// =============================================================================
// FOMO Signal Detector
// =============================================================================
//
// Flags index points where the FOMO Index signals crowd mania. Two triggers,
// each reading only the current and immediately preceding value (no
// lookahead):
//
//   spike:  index[i] > spike_threshold (default 90)
//   jump:   index[i] - index[i-1] > jump_threshold (default 20)
//           AND index[i-1] > jump_floor (default 70)
//           AND i >= jump_min_index (default 3, so a jump needs real history)
//
// Each point's flag is an independent predicate — a flag neither persists to
// later points nor retroactively marks earlier ones. Index 0 has no
// predecessor and is never flagged.

use crate::runtime_config::SignalParams;

/// Per-point signal flags for a FOMO Index series.
pub fn detect(index: &[f64], params: &SignalParams) -> Vec<bool> {
    (0..index.len())
        .map(|i| {
            if i == 0 {
                return false;
            }

            let spike = index[i] > params.spike_threshold;
            let jump = index[i] - index[i - 1] > params.jump_threshold
                && i >= params.jump_min_index
                && index[i - 1] > params.jump_floor;

            spike || jump
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime_config::SignalParams;

    fn params() -> SignalParams {
        SignalParams::default()
    }

    /// Spike trigger disabled, so only the jump conditions can flag.
    fn jump_only() -> SignalParams {
        SignalParams {
            spike_threshold: f64::INFINITY,
            ..SignalParams::default()
        }
    }

    #[test]
    fn empty_and_singleton_series() {
        assert!(detect(&[], &params()).is_empty());
        // Index 0 is never a signal, even above the spike threshold.
        assert_eq!(detect(&[99.0], &params()), vec![false]);
    }

    #[test]
    fn spike_trigger() {
        let index = vec![10.0, 95.0, 10.0];
        assert_eq!(detect(&index, &params()), vec![false, true, false]);
    }

    #[test]
    fn spike_threshold_is_strict() {
        // P6 (half): exactly 90 does not trigger.
        let index = vec![10.0, 90.0];
        assert_eq!(detect(&index, &params()), vec![false, false]);
    }

    #[test]
    fn jump_trigger_needs_floor_and_history() {
        // Jump of 21 from 71 at i=3: all three jump conditions hold.
        let index = vec![50.0, 60.0, 71.0, 92.0];
        assert_eq!(detect(&index, &jump_only()), vec![false, false, false, true]);
    }

    #[test]
    fn jump_too_early_is_ignored() {
        // Same jump shape at i=2 fails the minimum-history condition.
        let index = vec![60.0, 71.0, 92.0];
        assert_eq!(detect(&index, &jump_only()), vec![false, false, false]);
    }

    #[test]
    fn jump_without_floor_is_ignored() {
        // A 25-point jump from below the 70 floor is not mania, just noise.
        let index = vec![10.0, 20.0, 30.0, 60.0];
        assert_eq!(detect(&index, &params()), vec![false, false, false, false]);
    }

    #[test]
    fn no_trigger_below_both_thresholds() {
        // P6: index <= 90 and step <= 20 never flags.
        let index = vec![50.0, 65.0, 80.0, 90.0, 85.0];
        assert!(detect(&index, &params()).iter().all(|&f| !f));
    }

    #[test]
    fn flags_are_independent_per_point() {
        // A spike does not persist into the following quiet point.
        let index = vec![10.0, 95.0, 94.0, 10.0];
        assert_eq!(detect(&index, &params()), vec![false, true, true, false]);
    }
}
