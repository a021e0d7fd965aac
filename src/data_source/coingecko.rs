// =============================================================================
// CoinGecko REST client — historical price/volume fetch with bounded retries
// =============================================================================
//
// Fetches `market_chart/range` history for a token. Transient failures are
// retried up to MAX_ATTEMPTS with a short pause; an HTTP 429 waits out the
// rate-limit window instead. Failures after the final attempt surface as
// `FetchError::AttemptsExhausted` — the caller never sees a partial series.

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::FetchError;

/// Total request attempts before giving up.
const MAX_ATTEMPTS: u32 = 3;
/// Pause between ordinary retry attempts.
const RETRY_PAUSE: Duration = Duration::from_secs(2);
/// Longer pause after a rate-limit response.
const RATE_LIMIT_PAUSE: Duration = Duration::from_secs(30);
/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Price/volume history for one token, oldest first.
#[derive(Debug, Clone)]
pub struct MarketHistory {
    pub prices: Vec<f64>,
    pub volumes: Vec<f64>,
}

/// Raw `market_chart/range` payload: arrays of `[timestamp_ms, value]` pairs.
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    #[serde(default)]
    prices: Vec<[f64; 2]>,
    #[serde(default)]
    total_volumes: Vec<[f64; 2]>,
}

/// CoinGecko REST API client (unauthenticated public endpoints).
#[derive(Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinGeckoClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build reqwest client");

        debug!("CoinGeckoClient initialised (base_url=https://api.coingecko.com)");

        Self {
            base_url: "https://api.coingecko.com".to_string(),
            client,
        }
    }

    #[cfg(test)]
    fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut c = Self::new();
        c.base_url = base_url.into();
        c
    }

    /// Fetch `days` of price/volume history for `token_id`, retrying
    /// transient failures with bounded backoff.
    pub async fn fetch_market_history(
        &self,
        token_id: &str,
        days: u32,
    ) -> Result<MarketHistory, FetchError> {
        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                tokio::time::sleep(RETRY_PAUSE).await;
            }

            match self.fetch_once(token_id, days).await {
                Ok(history) => return Ok(history),
                Err(FetchError::RateLimited) => {
                    warn!(token_id, attempt, "rate limited — waiting before retry");
                    tokio::time::sleep(RATE_LIMIT_PAUSE).await;
                }
                Err(FetchError::EmptyPayload { .. }) => {
                    // A well-formed empty answer will not improve on retry.
                    return Err(FetchError::EmptyPayload {
                        token_id: token_id.to_string(),
                    });
                }
                Err(e) => {
                    warn!(token_id, attempt, error = %e, "market history fetch failed");
                }
            }
        }

        Err(FetchError::AttemptsExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// One fetch attempt, no retry logic.
    async fn fetch_once(&self, token_id: &str, days: u32) -> Result<MarketHistory, FetchError> {
        let now = Utc::now().timestamp();
        let from = now - i64::from(days) * 86_400;
        let url = format!(
            "{}/api/v3/coins/{}/market_chart/range?vs_currency=usd&from={}&to={}",
            self.base_url, token_id, from, now
        );

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();

        if status.as_u16() == 429 {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let chart: MarketChartResponse = resp.json().await?;
        if chart.prices.is_empty() || chart.total_volumes.is_empty() {
            return Err(FetchError::EmptyPayload {
                token_id: token_id.to_string(),
            });
        }

        debug!(token_id, points = chart.prices.len(), "market history fetched");

        Ok(MarketHistory {
            prices: chart.prices.iter().map(|p| p[1]).collect(),
            volumes: chart.total_volumes.iter().map(|v| v[1]).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_chart_payload_extracts_value_column() {
        let json = r#"{
            "prices": [[1700000000000, 42.5], [1700003600000, 43.0]],
            "total_volumes": [[1700000000000, 1000.0], [1700003600000, 1100.0]]
        }"#;
        let chart: MarketChartResponse = serde_json::from_str(json).unwrap();
        let prices: Vec<f64> = chart.prices.iter().map(|p| p[1]).collect();
        let volumes: Vec<f64> = chart.total_volumes.iter().map(|v| v[1]).collect();
        assert_eq!(prices, vec![42.5, 43.0]);
        assert_eq!(volumes, vec![1000.0, 1100.0]);
    }

    #[test]
    fn missing_arrays_deserialise_as_empty() {
        let chart: MarketChartResponse = serde_json::from_str("{}").unwrap();
        assert!(chart.prices.is_empty());
        assert!(chart.total_volumes.is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_exhausts_attempts() {
        // Discard port on localhost: connections are refused immediately
        // without touching the real API.
        let client = CoinGeckoClient::with_base_url("http://127.0.0.1:9");
        let err = client.fetch_market_history("bitcoin", 1).await.unwrap_err();
        assert!(matches!(err, FetchError::AttemptsExhausted { attempts: 3 }));
    }
}
