// =============================================================================
// Error taxonomy
// =============================================================================
//
// Two hard failure families exist:
//   - PipelineError: structural problems in the input series. These always
//     propagate to the caller; the pipeline never skips or interpolates a
//     broken row.
//   - FetchError: network-side failures in the data-source collaborator,
//     retried with bounded backoff before surfacing.
//
// Statistical edge cases (short windows, zero variance, zero range) are NOT
// errors. They surface as `None` values inside the derived series and are
// coalesced to a neutral default at each consuming formula.

use thiserror::Error;

/// Structural problems in the raw input series. Fatal to the pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input series is empty")]
    EmptySeries,

    #[error("row {row}: field `{field}` is invalid: {reason}")]
    MalformedInput {
        row: usize,
        field: &'static str,
        reason: String,
    },

    #[error("row {row}: timestamp {current} is not after previous timestamp {previous}")]
    NonMonotonicTimestamps {
        row: usize,
        previous: chrono::NaiveDateTime,
        current: chrono::NaiveDateTime,
    },
}

/// Failures while fetching market data from the external source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limited by data source (HTTP 429)")]
    RateLimited,

    #[error("data source returned HTTP {0}")]
    Status(u16),

    #[error("data source returned an empty payload for `{token_id}`")]
    EmptyPayload { token_id: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to fetch data after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}
