// =============================================================================
// Central Application State — FOMO tracker
// =============================================================================
//
// The single source of truth for the service. The derived series is computed
// once per raw input and swapped in atomically behind an Arc: request
// handlers read a consistent snapshot while the refresh task replaces it.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for the series snapshot and error ring.
//   - The series itself is immutable once installed; consumers only clone
//     the Arc.
// =============================================================================

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::data_source::CoinGeckoClient;
use crate::pipeline::DerivedSeries;
use crate::runtime_config::RuntimeConfig;

/// Maximum number of recent errors to retain for the dashboard.
const MAX_RECENT_ERRORS: usize = 50;

/// A recorded error event for the dashboard error log.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub message: String,
    /// ISO 8601 timestamp.
    pub at: String,
}

/// Central application state shared across all async tasks via `Arc<AppState>`.
pub struct AppState {
    /// Monotonically increasing version counter, incremented whenever a new
    /// derived series is installed.
    pub state_version: AtomicU64,

    pub runtime_config: RwLock<RuntimeConfig>,

    /// The current derived series, if a pipeline run has succeeded yet.
    derived: RwLock<Option<Arc<DerivedSeries>>>,

    /// When the current series was computed.
    last_refresh: RwLock<Option<NaiveDateTime>>,

    pub coingecko: CoinGeckoClient,

    recent_errors: RwLock<VecDeque<ErrorRecord>>,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            state_version: AtomicU64::new(0),
            runtime_config: RwLock::new(config),
            derived: RwLock::new(None),
            last_refresh: RwLock::new(None),
            coingecko: CoinGeckoClient::new(),
            recent_errors: RwLock::new(VecDeque::with_capacity(MAX_RECENT_ERRORS)),
        }
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::Relaxed)
    }

    /// Install a freshly computed series and bump the state version.
    pub fn install_series(&self, series: DerivedSeries) {
        *self.derived.write() = Some(Arc::new(series));
        *self.last_refresh.write() = Some(Utc::now().naive_utc());
        self.state_version.fetch_add(1, Ordering::Relaxed);
    }

    /// The current derived series snapshot, if any.
    pub fn current_series(&self) -> Option<Arc<DerivedSeries>> {
        self.derived.read().clone()
    }

    pub fn last_refresh(&self) -> Option<NaiveDateTime> {
        *self.last_refresh.read()
    }

    /// Record an error for the dashboard log, trimming the ring to capacity.
    pub fn record_error(&self, message: impl Into<String>) {
        let mut errors = self.recent_errors.write();
        if errors.len() == MAX_RECENT_ERRORS {
            errors.pop_front();
        }
        errors.push_back(ErrorRecord {
            message: message.into(),
            at: Utc::now().to_rfc3339(),
        });
    }

    pub fn recent_errors(&self) -> Vec<ErrorRecord> {
        self.recent_errors.read().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{self, test_support::quiet_series};
    use crate::runtime_config::PipelineParams;

    #[test]
    fn install_bumps_version_and_swaps_snapshot() {
        let state = AppState::new(RuntimeConfig::default());
        assert_eq!(state.current_state_version(), 0);
        assert!(state.current_series().is_none());

        let derived =
            pipeline::run(quiet_series(&[100.0, 101.0, 102.0]), &PipelineParams::default())
                .unwrap();
        state.install_series(derived);

        assert_eq!(state.current_state_version(), 1);
        assert_eq!(state.current_series().unwrap().len(), 3);
        assert!(state.last_refresh().is_some());
    }

    #[test]
    fn error_ring_caps_at_limit() {
        let state = AppState::new(RuntimeConfig::default());
        for i in 0..60 {
            state.record_error(format!("error {i}"));
        }
        let errors = state.recent_errors();
        assert_eq!(errors.len(), 50);
        assert_eq!(errors[0].message, "error 10");
        assert_eq!(errors[49].message, "error 59");
    }
}
