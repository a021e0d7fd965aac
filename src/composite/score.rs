// =============================================================================
// Single-token composite score — RSI + volume snapshot
// =============================================================================
//
// Snapshot composite for the standalone token view, built from the trailing
// RSI and the volume metrics bundle:
//
//   rsi_score               = 100 - |50 - rsi|        (distance from neutral)
//   volume_momentum_score   = clamp((oscillator + 10) * 5, 0, 100)
//   volume_volatility_score = 100 - min(volatility_pct, 100)
//   composite = 0.4 * rsi_score + 0.3 * momentum + 0.3 * volatility
//
// The composite feeds the discrete recommendation bands (see
// `Recommendation::from_score`).

use serde::Serialize;

use crate::indicators::{rsi, volume_metrics, VolumeMetrics};
use crate::types::Recommendation;

/// Composite trading score in [0, 100].
pub fn composite_score(rsi_value: f64, metrics: &VolumeMetrics) -> f64 {
    let rsi_score = 100.0 - (50.0 - rsi_value).abs();
    let volume_momentum_score = ((metrics.volume_oscillator + 10.0) * 5.0).clamp(0.0, 100.0);
    let volume_volatility_score = 100.0 - metrics.volume_volatility.min(100.0);

    0.4 * rsi_score + 0.3 * volume_momentum_score + 0.3 * volume_volatility_score
}

/// Full single-token assessment: indicators, composite, recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct TokenAssessment {
    pub rsi: f64,
    pub volume_metrics: VolumeMetrics,
    pub composite_score: f64,
    pub recommendation: Recommendation,
}

impl TokenAssessment {
    /// Evaluate a fetched price/volume history.
    pub fn evaluate(prices: &[f64], volumes: &[f64], rsi_period: usize) -> Self {
        let rsi_value = rsi(prices, rsi_period);
        let metrics = volume_metrics(volumes);
        let composite = composite_score(rsi_value, &metrics);

        Self {
            rsi: rsi_value,
            volume_metrics: metrics,
            composite_score: composite,
            recommendation: Recommendation::from_score(composite),
        }
    }
}
