// =============================================================================
// Indicator Builder — derived columns over the raw series
// =============================================================================
//
// Produces every derived column the composite index and signal detector
// consume. Column order here is the real dependency order; each column reads
// only raw fields and columns built above it.
//
// Undefined-value policy: statistical columns are `Option<f64>` and stay
// undefined where history is short or a denominator is zero. Gate and
// multiplier columns are total (`f64` / 1.0 fallbacks): an undefined z-score
// compares false against every threshold and contributes 0 to a blend.

use crate::runtime_config::PipelineParams;
use crate::stats::{adaptive_zscore, lift, minmax_rescale, rolling_mean, zscore};
use crate::types::{Observation, SocialMetric};

/// Price/volume amplification: applied when the price z-score clears this.
const MULTIPLIER_PRICE_Z: f64 = 1.0;
/// ... and total volume runs this far above its 7-period average.
const MULTIPLIER_VOLUME_RATIO: f64 = 1.5;

/// Inner social-gate amplification thresholds (momentum z, profit-volume z).
const GATE_MOMENTUM_Z: f64 = 1.0;
const GATE_PROFIT_VOLUME_Z: f64 = 2.0;

/// Social blend weights in `SocialMetric::ALL` order:
/// [to the moon, get in, i missed it].
const SOCIAL_WEIGHTS: [f64; 3] = [0.4, 0.3, 0.3];

/// Co-occurrence gate: elapsed whole days since the previous observation must
/// lie in this inclusive range.
const GATE_MIN_DAYS: i64 = 1;
const GATE_MAX_DAYS: i64 = 7;

/// All derived columns, index-aligned with the input series.
#[derive(Debug, Clone)]
pub struct IndicatorColumns {
    /// Percentage price change from the previous observation. Undefined at
    /// index 0.
    pub price_change_pct: Vec<Option<f64>>,
    /// 7-period simple moving average of price.
    pub price_ma_short: Vec<Option<f64>>,
    /// Adaptive (rolling short-window) z-score of `price_change_pct`.
    pub price_zscore: Vec<Option<f64>>,
    /// Global z-score of `price_change_pct` over the whole series.
    pub price_momentum_zscore: Vec<Option<f64>>,

    /// Profit + loss on-chain volume.
    pub total_volume: Vec<f64>,
    /// Adaptive z-score of `total_volume`.
    pub volume_zscore: Vec<Option<f64>>,
    /// 7-period simple moving average of `total_volume`.
    pub volume_ma7: Vec<Option<f64>>,
    /// Global z-scores of the profit / loss on-chain legs.
    pub profit_volume_zscore: Vec<Option<f64>>,
    pub loss_volume_zscore: Vec<Option<f64>>,

    /// Global z-score per social metric, in `SocialMetric::ALL` order.
    pub social_zscores: [Vec<Option<f64>>; 3],

    /// 1.0 or 1.5 — price action and volume corroborate each other.
    pub price_volume_multiplier: Vec<f64>,
    /// Gated, weighted social z-score blend. 0 where the gate fails.
    pub social_fomo_raw: Vec<f64>,
    /// `social_fomo_raw * price_volume_multiplier`.
    pub social_fomo_score: Vec<f64>,

    /// Long-window min-max rescales of the three composite inputs, [0, 100].
    pub normalized_price: Vec<Option<f64>>,
    pub normalized_volume: Vec<Option<f64>>,
    pub normalized_social_fomo: Vec<Option<f64>>,
}

impl IndicatorColumns {
    /// Build every derived column for a validated series.
    pub fn build(observations: &[Observation], params: &PipelineParams) -> Self {
        let n = observations.len();
        let prices: Vec<f64> = observations.iter().map(|o| o.price).collect();
        let total_volume: Vec<f64> = observations.iter().map(|o| o.total_volume()).collect();

        // ── Price momentum ──────────────────────────────────────────────
        let price_change_pct: Vec<Option<f64>> = (0..n)
            .map(|i| {
                if i == 0 {
                    None
                } else {
                    Some((prices[i] - prices[i - 1]) / prices[i - 1] * 100.0)
                }
            })
            .collect();

        let price_zscore = adaptive_zscore(&price_change_pct, params.short_window);
        let price_momentum_zscore = zscore(&price_change_pct);
        let price_ma_short = rolling_mean(&lift(&prices), params.ma_window);

        // ── On-chain volume ─────────────────────────────────────────────
        let volume_lifted = lift(&total_volume);
        let volume_zscore = adaptive_zscore(&volume_lifted, params.short_window);
        let volume_ma7 = rolling_mean(&volume_lifted, params.ma_window);

        let profit: Vec<f64> = observations.iter().map(|o| o.onchain_profit_volume).collect();
        let loss: Vec<f64> = observations.iter().map(|o| o.onchain_loss_volume).collect();
        let profit_volume_zscore = zscore(&lift(&profit));
        let loss_volume_zscore = zscore(&lift(&loss));

        // ── Social z-scores (global, non-rolling) ───────────────────────
        let social_zscores: [Vec<Option<f64>>; 3] = SocialMetric::ALL.map(|metric| {
            let counts: Vec<f64> = observations.iter().map(|o| o.social_volume(metric)).collect();
            zscore(&lift(&counts))
        });

        // ── Price/volume multiplier ─────────────────────────────────────
        let price_volume_multiplier: Vec<f64> = (0..n)
            .map(|i| {
                let price_rising = exceeds(price_zscore[i], MULTIPLIER_PRICE_Z);
                let volume_exceeds = volume_ma7[i]
                    .map(|ma| total_volume[i] > ma * MULTIPLIER_VOLUME_RATIO)
                    .unwrap_or(false);
                if price_rising && volume_exceeds {
                    1.5
                } else {
                    1.0
                }
            })
            .collect();

        // ── Social FOMO gate ────────────────────────────────────────────
        let social_fomo_raw: Vec<f64> = (0..n)
            .map(|i| {
                if i == 0 || !gate_open(observations, i) {
                    return 0.0;
                }

                // Undefined z-scores (flat social history) contribute 0.
                let blend: f64 = SOCIAL_WEIGHTS
                    .iter()
                    .zip(social_zscores.iter())
                    .map(|(w, z)| w * z[i].unwrap_or(0.0))
                    .sum();

                let corroborated = exceeds(price_momentum_zscore[i], GATE_MOMENTUM_Z)
                    && exceeds(profit_volume_zscore[i], GATE_PROFIT_VOLUME_Z);
                let multiplier = if corroborated { 1.5 } else { 1.0 };

                blend * multiplier
            })
            .collect();

        let social_fomo_score: Vec<f64> = social_fomo_raw
            .iter()
            .zip(price_volume_multiplier.iter())
            .map(|(raw, mult)| raw * mult)
            .collect();

        // ── Long-window normalization for the composite ─────────────────
        let normalized_price = minmax_rescale(&price_zscore, params.long_window);
        let normalized_volume = minmax_rescale(&volume_zscore, params.long_window);
        let normalized_social_fomo = minmax_rescale(&lift(&social_fomo_score), params.long_window);

        Self {
            price_change_pct,
            price_ma_short,
            price_zscore,
            price_momentum_zscore,
            total_volume,
            volume_zscore,
            volume_ma7,
            profit_volume_zscore,
            loss_volume_zscore,
            social_zscores,
            price_volume_multiplier,
            social_fomo_raw,
            social_fomo_score,
            normalized_price,
            normalized_volume,
            normalized_social_fomo,
        }
    }
}

/// Co-occurrence gate at index `i`: all three social metrics strictly
/// positive, and the elapsed whole days since the previous observation within
/// [1, 7].
fn gate_open(observations: &[Observation], i: usize) -> bool {
    let obs = &observations[i];
    let all_positive = SocialMetric::ALL.iter().all(|&m| obs.social_volume(m) > 0.0);
    if !all_positive {
        return false;
    }

    let days = (obs.timestamp - observations[i - 1].timestamp).num_days();
    (GATE_MIN_DAYS..=GATE_MAX_DAYS).contains(&days)
}

/// Undefined compares false against every threshold.
fn exceeds(value: Option<f64>, threshold: f64) -> bool {
    value.map(|v| v > threshold).unwrap_or(false)
}
