// =============================================================================
// FOMO Index — weighted composite over the derived series
// =============================================================================
//
// Two variants exist and disagree on weights and inputs; both are kept behind
// `IndexVariant` rather than guessing which is canonical:
//
//   RawWeighted:  0.4 * price_momentum_z + 0.3 * profit_volume_z
//               + 0.2 * social_fomo_raw  + 0.1 * loss_volume_z,
//     then one STATIC min-max over the whole series maps the observed range
//     onto [0, 100]. Undefined slots (and degenerate ranges) coalesce to 0.
//
//   Normalized:  0.4 * normalized_price + 0.3 * normalized_volume
//              + 0.3 * normalized_social_fomo,
//     each input already rolling-rescaled to [0, 100], undefined inputs
//     counted as 0.
//
// Either way the output is total: one finite value in [0, 100] per
// observation, never undefined.

use crate::pipeline::IndicatorColumns;
use crate::runtime_config::IndexVariant;

/// Compute the FOMO Index column for the selected variant.
pub fn compute(columns: &IndicatorColumns, variant: IndexVariant) -> Vec<f64> {
    match variant {
        IndexVariant::RawWeighted => raw_weighted(columns),
        IndexVariant::Normalized => normalized(columns),
    }
}

fn raw_weighted(c: &IndicatorColumns) -> Vec<f64> {
    let n = c.social_fomo_raw.len();

    // A slot is defined only when every z-score component is.
    let raw: Vec<Option<f64>> = (0..n)
        .map(|i| {
            Some(
                0.4 * c.price_momentum_zscore[i]?
                    + 0.3 * c.profit_volume_zscore[i]?
                    + 0.2 * c.social_fomo_raw[i]
                    + 0.1 * c.loss_volume_zscore[i]?,
            )
        })
        .collect();

    let min = raw.iter().flatten().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().flatten().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    // No defined slots, or a flat composite: everything coalesces to 0.
    if !range.is_finite() || range == 0.0 {
        return vec![0.0; n];
    }

    raw.iter()
        .map(|slot| match slot {
            Some(v) => (v - min) / range * 100.0,
            None => 0.0,
        })
        .collect()
}

fn normalized(c: &IndicatorColumns) -> Vec<f64> {
    let n = c.social_fomo_raw.len();
    (0..n)
        .map(|i| {
            0.4 * c.normalized_price[i].unwrap_or(0.0)
                + 0.3 * c.normalized_volume[i].unwrap_or(0.0)
                + 0.3 * c.normalized_social_fomo[i].unwrap_or(0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::{quiet_series, series_with};
    use crate::pipeline::IndicatorColumns;
    use crate::runtime_config::PipelineParams;

    fn varied_columns() -> IndicatorColumns {
        let obs = series_with(
            &[
                100.0, 104.0, 101.0, 109.0, 103.0, 112.0, 105.0, 118.0, 110.0, 125.0, 115.0,
                130.0, 118.0, 140.0, 121.0,
            ],
            chrono::Duration::days(1),
            |i| [1.0 + i as f64, 2.0, 3.0 + (i % 3) as f64],
            |i| 100.0 + 40.0 * (i % 5) as f64,
            |i| 50.0 + 10.0 * (i % 3) as f64,
        );
        let params = PipelineParams {
            short_window: 4,
            long_window: 6,
            ma_window: 3,
            ..PipelineParams::default()
        };
        IndicatorColumns::build(&obs, &params)
    }

    #[test]
    fn raw_weighted_bounds_and_extremes() {
        let cols = varied_columns();
        let index = compute(&cols, IndexVariant::RawWeighted);

        for &v in &index {
            assert!((0.0..=100.0).contains(&v), "index {v} out of bounds");
        }
        // The static min-max pins the observed extremes to exactly 0 and 100.
        assert!(index.iter().any(|&v| v == 0.0));
        assert!(index.iter().any(|&v| (v - 100.0).abs() < 1e-9));
    }

    #[test]
    fn raw_weighted_undefined_slots_coalesce_to_zero() {
        let cols = varied_columns();
        let index = compute(&cols, IndexVariant::RawWeighted);
        // price_momentum_zscore is undefined at index 0 (no previous price),
        // so the composite there must be the 0 fallback.
        assert_eq!(cols.price_momentum_zscore[0], None);
        assert_eq!(index[0], 0.0);
    }

    #[test]
    fn raw_weighted_flat_inputs_are_all_zero() {
        // Constant on-chain columns have zero variance: their global z-scores
        // are undefined everywhere and the whole index collapses to 0.
        let cols = IndicatorColumns::build(
            &quiet_series(&[100.0, 101.0, 102.0, 103.0]),
            &PipelineParams::default(),
        );
        assert_eq!(compute(&cols, IndexVariant::RawWeighted), vec![0.0; 4]);
    }

    #[test]
    fn normalized_bounds() {
        let cols = varied_columns();
        let index = compute(&cols, IndexVariant::Normalized);
        for &v in &index {
            assert!((0.0..=100.0).contains(&v), "index {v} out of bounds");
        }
    }

    #[test]
    fn normalized_short_series_is_all_zero() {
        // E3: shorter than the long rescale window => normalized inputs all
        // undefined => index exactly 0 everywhere.
        let cols = IndicatorColumns::build(
            &quiet_series(&[100.0, 105.0, 95.0, 102.0]),
            &PipelineParams::default(),
        );
        assert_eq!(compute(&cols, IndexVariant::Normalized), vec![0.0; 4]);
    }
}
