// =============================================================================
// Runtime Configuration — tunable tracker settings with atomic save
// =============================================================================
//
// Central configuration hub for the FOMO tracker. Every tunable parameter of
// the indicator pipeline, signal detector, backtest, and data source lives
// here.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash. All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_short_window() -> usize {
    24 // one day of hourly samples
}

fn default_long_window() -> usize {
    168 // seven days of hourly samples
}

fn default_ma_window() -> usize {
    7
}

fn default_spike_threshold() -> f64 {
    90.0
}

fn default_jump_threshold() -> f64 {
    20.0
}

fn default_jump_floor() -> f64 {
    70.0
}

fn default_jump_min_index() -> usize {
    3
}

fn default_horizon() -> usize {
    7
}

fn default_fp_horizon() -> usize {
    42 // seven days at hourly cadence
}

fn default_fomo_threshold() -> f64 {
    80.0
}

fn default_drop_threshold() -> f64 {
    -5.0
}

fn default_rsi_period() -> usize {
    14
}

fn default_csv_path() -> String {
    "data.csv".to_string()
}

fn default_tokens() -> Vec<String> {
    vec![
        "aave".to_string(),
        "uniswap".to_string(),
        "chainlink".to_string(),
        "ethereum".to_string(),
        "bitcoin".to_string(),
    ]
}

fn default_fetch_days() -> u32 {
    15
}

fn default_refresh_secs() -> u64 {
    900
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

// =============================================================================
// Index variant
// =============================================================================

/// Which of the two composite-index formulas drives `fomo_index`.
///
/// The two formulas disagree on weights and inputs; neither is canonical, so
/// both are kept behind explicit configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexVariant {
    /// Weighted sum of the global z-scores (momentum / profit volume / social
    /// FOMO raw / loss volume at 0.4/0.3/0.2/0.1), then ONE static min-max
    /// over the whole series scaled to [0, 100]. This is the variant the
    /// signal detector and backtest historically consumed.
    RawWeighted,
    /// Weighted sum of the long-window-normalized components (price z /
    /// volume z / social FOMO score at 0.4/0.3/0.3), each already in
    /// [0, 100], undefined inputs counted as 0.
    Normalized,
}

impl Default for IndexVariant {
    fn default() -> Self {
        Self::RawWeighted
    }
}

// =============================================================================
// Parameter blocks
// =============================================================================

/// Signal-detector thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalParams {
    /// Flag when the index alone exceeds this.
    #[serde(default = "default_spike_threshold")]
    pub spike_threshold: f64,

    /// Flag when the index rises more than this in one step...
    #[serde(default = "default_jump_threshold")]
    pub jump_threshold: f64,

    /// ...from a previous value already above this floor...
    #[serde(default = "default_jump_floor")]
    pub jump_floor: f64,

    /// ...with at least this many observations of history.
    #[serde(default = "default_jump_min_index")]
    pub jump_min_index: usize,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            spike_threshold: default_spike_threshold(),
            jump_threshold: default_jump_threshold(),
            jump_floor: default_jump_floor(),
            jump_min_index: default_jump_min_index(),
        }
    }
}

/// Indicator-pipeline windows and index selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Rolling window for adaptive z-scores (samples).
    #[serde(default = "default_short_window")]
    pub short_window: usize,

    /// Rolling window for min-max normalization (samples).
    #[serde(default = "default_long_window")]
    pub long_window: usize,

    /// Short moving-average window for price and volume (samples).
    #[serde(default = "default_ma_window")]
    pub ma_window: usize,

    /// Which composite formula produces `fomo_index`.
    #[serde(default)]
    pub index_variant: IndexVariant,

    #[serde(default)]
    pub signal: SignalParams,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
            ma_window: default_ma_window(),
            index_variant: IndexVariant::default(),
            signal: SignalParams::default(),
        }
    }
}

/// Backtest horizons and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestParams {
    /// Forward horizon for the signal backtest (samples).
    #[serde(default = "default_horizon")]
    pub horizon: usize,

    /// Forward horizon for the false-positive analysis (samples).
    #[serde(default = "default_fp_horizon")]
    pub fp_horizon: usize,

    /// Index threshold above which a row counts as a signal in the
    /// false-positive analysis.
    #[serde(default = "default_fomo_threshold")]
    pub fomo_threshold: f64,

    /// Forward change strictly below this marks a false positive (percent).
    #[serde(default = "default_drop_threshold")]
    pub drop_threshold: f64,
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            fp_horizon: default_fp_horizon(),
            fomo_threshold: default_fomo_threshold(),
            drop_threshold: default_drop_threshold(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the FOMO tracker.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Pipeline ------------------------------------------------------------

    #[serde(default)]
    pub pipeline: PipelineParams,

    #[serde(default)]
    pub backtest: BacktestParams,

    /// RSI look-back for the single-token composite score.
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    // --- Data source ---------------------------------------------------------

    /// Path to the raw observation CSV.
    #[serde(default = "default_csv_path")]
    pub csv_path: String,

    /// Token ids served by the single-token score endpoint.
    #[serde(default = "default_tokens")]
    pub tokens: Vec<String>,

    /// Days of history fetched for a single-token score.
    #[serde(default = "default_fetch_days")]
    pub fetch_days: u32,

    /// Seconds between background recomputes of the derived series.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,

    // --- Server --------------------------------------------------------------

    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineParams::default(),
            backtest: BacktestParams::default(),
            rsi_period: default_rsi_period(),
            csv_path: default_csv_path(),
            tokens: default_tokens(),
            fetch_days: default_fetch_days(),
            refresh_secs: default_refresh_secs(),
            listen_addr: default_listen_addr(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            csv_path = %config.csv_path,
            index_variant = ?config.pipeline.index_variant,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    ///
    /// This prevents corruption if the process crashes mid-write.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.pipeline.short_window, 24);
        assert_eq!(cfg.pipeline.long_window, 168);
        assert_eq!(cfg.pipeline.ma_window, 7);
        assert_eq!(cfg.pipeline.index_variant, IndexVariant::RawWeighted);
        assert_eq!(cfg.backtest.horizon, 7);
        assert_eq!(cfg.backtest.fp_horizon, 42);
        assert!((cfg.backtest.fomo_threshold - 80.0).abs() < f64::EPSILON);
        assert!((cfg.backtest.drop_threshold + 5.0).abs() < f64::EPSILON);
        assert_eq!(cfg.rsi_period, 14);
        assert_eq!(cfg.tokens.len(), 5);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.pipeline.long_window, 168);
        assert_eq!(cfg.pipeline.signal.jump_min_index, 3);
        assert!((cfg.pipeline.signal.spike_threshold - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str(
            r#"{"pipeline": {"index_variant": "normalized", "short_window": 12}}"#,
        )
        .unwrap();
        assert_eq!(cfg.pipeline.index_variant, IndexVariant::Normalized);
        assert_eq!(cfg.pipeline.short_window, 12);
        assert_eq!(cfg.pipeline.long_window, 168);
        assert_eq!(cfg.backtest.horizon, 7);
    }
}
