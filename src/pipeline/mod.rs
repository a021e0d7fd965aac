// =============================================================================
// Indicator Pipeline
// =============================================================================
//
// One pipeline run consumes one complete, validated input series and produces
// one immutable `DerivedSeries`. Stages are pure and strictly ordered:
//
//   validate -> build indicator columns -> composite index -> signal flags
//
// No stage mutates a shared table; each consumes the previous stage's output.
// The derived series must be recomputed in full whenever the raw series
// changes — there is no incremental update path.

pub mod builder;
pub mod validate;

use serde::Serialize;

use crate::composite::fomo_index;
use crate::error::PipelineError;
use crate::runtime_config::PipelineParams;
use crate::signals::detector;
use crate::types::Observation;

pub use builder::IndicatorColumns;

/// The complete output of one pipeline run. Immutable once built; downstream
/// consumers (signal detector, backtest, export, API) only read it.
#[derive(Debug, Clone)]
pub struct DerivedSeries {
    pub observations: Vec<Observation>,
    pub columns: IndicatorColumns,
    /// Final composite index, one value per observation, always in [0, 100]
    /// (0 where the underlying composite is undefined).
    pub fomo_index: Vec<f64>,
    /// Per-observation signal flag.
    pub fomo_signal: Vec<bool>,
}

/// One row of the derived table, as served to chart/export consumers.
/// Undefined statistical slots serialize as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedRow {
    pub timestamp: chrono::NaiveDateTime,
    pub price: f64,
    pub price_change_pct: Option<f64>,
    pub price_ma_short: Option<f64>,
    pub price_zscore: Option<f64>,
    pub total_volume: f64,
    pub volume_zscore: Option<f64>,
    pub social_zscore_moon: Option<f64>,
    pub social_zscore_get_in: Option<f64>,
    pub social_zscore_missed_it: Option<f64>,
    pub price_volume_multiplier: f64,
    pub social_fomo_raw: f64,
    pub social_fomo_score: f64,
    pub normalized_price: Option<f64>,
    pub normalized_volume: Option<f64>,
    pub normalized_social_fomo: Option<f64>,
    pub fomo_index: f64,
    pub fomo_signal: bool,
}

impl DerivedSeries {
    /// Number of observations in the series.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// The derived table as serializable rows.
    pub fn rows(&self) -> Vec<DerivedRow> {
        let c = &self.columns;
        self.observations
            .iter()
            .enumerate()
            .map(|(i, obs)| DerivedRow {
                timestamp: obs.timestamp,
                price: obs.price,
                price_change_pct: c.price_change_pct[i],
                price_ma_short: c.price_ma_short[i],
                price_zscore: c.price_zscore[i],
                total_volume: c.total_volume[i],
                volume_zscore: c.volume_zscore[i],
                social_zscore_moon: c.social_zscores[0][i],
                social_zscore_get_in: c.social_zscores[1][i],
                social_zscore_missed_it: c.social_zscores[2][i],
                price_volume_multiplier: c.price_volume_multiplier[i],
                social_fomo_raw: c.social_fomo_raw[i],
                social_fomo_score: c.social_fomo_score[i],
                normalized_price: c.normalized_price[i],
                normalized_volume: c.normalized_volume[i],
                normalized_social_fomo: c.normalized_social_fomo[i],
                fomo_index: self.fomo_index[i],
                fomo_signal: self.fomo_signal[i],
            })
            .collect()
    }
}

/// Run the full pipeline over a raw observation series.
///
/// Fails fast on structural input problems; statistical edge cases never
/// fail (they surface as undefined column slots coalesced per formula).
pub fn run(
    observations: Vec<Observation>,
    params: &PipelineParams,
) -> Result<DerivedSeries, PipelineError> {
    validate::validate(&observations)?;

    let columns = IndicatorColumns::build(&observations, params);
    let index = fomo_index::compute(&columns, params.index_variant);
    let signal = detector::detect(&index, &params.signal);

    Ok(DerivedSeries {
        observations,
        columns,
        fomo_index: index,
        fomo_signal: signal,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use crate::types::Observation;

    /// Build a series with the given prices at a fixed cadence. Social and
    /// on-chain columns are filled from the supplied closures.
    pub fn series_with(
        prices: &[f64],
        cadence: Duration,
        social: impl Fn(usize) -> [f64; 3],
        profit: impl Fn(usize) -> f64,
        loss: impl Fn(usize) -> f64,
    ) -> Vec<Observation> {
        let start: NaiveDateTime = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &price)| Observation {
                timestamp: start + cadence * i as i32,
                price,
                social_volumes: social(i),
                onchain_profit_volume: profit(i),
                onchain_loss_volume: loss(i),
            })
            .collect()
    }

    /// Hourly series with all social and on-chain columns at zero.
    pub fn quiet_series(prices: &[f64]) -> Vec<Observation> {
        series_with(prices, Duration::hours(1), |_| [0.0; 3], |_| 0.0, |_| 0.0)
    }
}
