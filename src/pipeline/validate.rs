// =============================================================================
// Input validation — fail fast on structural problems
// =============================================================================
//
// The pipeline never repairs a broken series: a bad row is a fatal error
// naming the row and field, not a slot to skip or interpolate. Statistical
// gaps (short history, flat windows) are handled downstream and are NOT
// validation concerns.

use crate::error::PipelineError;
use crate::types::{Observation, SocialMetric};

/// Validate the raw input series.
///
/// Checks, in order:
/// 1. non-empty series
/// 2. all numeric fields finite
/// 3. price strictly positive
/// 4. social counts and on-chain volumes non-negative
/// 5. timestamps strictly increasing (no duplicates)
pub fn validate(observations: &[Observation]) -> Result<(), PipelineError> {
    if observations.is_empty() {
        return Err(PipelineError::EmptySeries);
    }

    for (row, obs) in observations.iter().enumerate() {
        check_field(row, "price", obs.price)?;
        if obs.price <= 0.0 {
            return Err(PipelineError::MalformedInput {
                row,
                field: "price",
                reason: format!("must be positive, got {}", obs.price),
            });
        }

        for metric in SocialMetric::ALL {
            let value = obs.social_volume(metric);
            let field = metric.phrase();
            if !value.is_finite() {
                return Err(PipelineError::MalformedInput {
                    row,
                    field: social_field_name(metric),
                    reason: format!("social volume `{field}` is not a finite number"),
                });
            }
            if value < 0.0 {
                return Err(PipelineError::MalformedInput {
                    row,
                    field: social_field_name(metric),
                    reason: format!("social volume `{field}` must be non-negative, got {value}"),
                });
            }
        }

        check_field(row, "onchain_profit_volume", obs.onchain_profit_volume)?;
        check_field(row, "onchain_loss_volume", obs.onchain_loss_volume)?;
        if obs.onchain_profit_volume < 0.0 {
            return Err(PipelineError::MalformedInput {
                row,
                field: "onchain_profit_volume",
                reason: format!("must be non-negative, got {}", obs.onchain_profit_volume),
            });
        }
        if obs.onchain_loss_volume < 0.0 {
            return Err(PipelineError::MalformedInput {
                row,
                field: "onchain_loss_volume",
                reason: format!("must be non-negative, got {}", obs.onchain_loss_volume),
            });
        }
    }

    for (row, pair) in observations.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(PipelineError::NonMonotonicTimestamps {
                row: row + 1,
                previous: pair[0].timestamp,
                current: pair[1].timestamp,
            });
        }
    }

    Ok(())
}

fn check_field(row: usize, field: &'static str, value: f64) -> Result<(), PipelineError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PipelineError::MalformedInput {
            row,
            field,
            reason: "not a finite number".to_string(),
        })
    }
}

fn social_field_name(metric: SocialMetric) -> &'static str {
    match metric {
        SocialMetric::ToTheMoon => "social_volume[to the moon]",
        SocialMetric::GetIn => "social_volume[get in]",
        SocialMetric::IMissedIt => "social_volume[i missed it]",
    }
}
