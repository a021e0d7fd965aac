// =============================================================================
// CSV series loader
// =============================================================================
//
// Loads the raw observation table. Expected header columns (matching the
// upstream data export):
//
//   Date, BTC / USD,
//   Social Volume (to the moon), Social Volume (get in),
//   Social Volume (i missed it),
//   Daily On-Chain Transaction Volume in Profit,
//   Daily On-Chain Transaction Volume in Loss
//
// Rows with any empty required cell are dropped (the export pads leading rows
// of some columns). A present but non-numeric cell is a fatal
// `MalformedInput` — the loader never guesses at a value.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tracing::info;

use crate::error::PipelineError;
use crate::types::Observation;

const COL_DATE: &str = "Date";
const COL_PRICE: &str = "BTC / USD";
const COL_SOCIAL_MOON: &str = "Social Volume (to the moon)";
const COL_SOCIAL_GET_IN: &str = "Social Volume (get in)";
const COL_SOCIAL_MISSED: &str = "Social Volume (i missed it)";
const COL_PROFIT: &str = "Daily On-Chain Transaction Volume in Profit";
const COL_LOSS: &str = "Daily On-Chain Transaction Volume in Loss";

const REQUIRED: [&str; 7] = [
    COL_DATE,
    COL_PRICE,
    COL_SOCIAL_MOON,
    COL_SOCIAL_GET_IN,
    COL_SOCIAL_MISSED,
    COL_PROFIT,
    COL_LOSS,
];

/// Load and parse the observation table at `path`.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Observation>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read series data from {}", path.display()))?;

    let observations = parse_csv(&content)
        .with_context(|| format!("failed to parse series data from {}", path.display()))?;

    info!(
        path = %path.display(),
        rows = observations.len(),
        "observation series loaded"
    );
    Ok(observations)
}

/// Parse CSV text into observations. Pure; fails fast on structural problems.
pub fn parse_csv(content: &str) -> Result<Vec<Observation>, PipelineError> {
    let mut lines = content.lines().enumerate();

    let (_, header) = lines.next().ok_or(PipelineError::EmptySeries)?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();

    let col = |name: &'static str| -> Result<usize, PipelineError> {
        columns
            .iter()
            .position(|&c| c == name)
            .ok_or(PipelineError::MalformedInput {
                row: 0,
                field: name,
                reason: "required column missing from header".to_string(),
            })
    };
    // Resolve all required columns up front so a missing one is reported
    // before any row parsing starts.
    let idx: Vec<usize> = REQUIRED
        .iter()
        .map(|&name| col(name))
        .collect::<Result<_, _>>()?;
    let [date_i, price_i, moon_i, get_in_i, missed_i, profit_i, loss_i] =
        [idx[0], idx[1], idx[2], idx[3], idx[4], idx[5], idx[6]];

    let mut observations = Vec::new();

    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();

        let cell = |i: usize| cells.get(i).copied().unwrap_or("");

        // Rows with any empty required cell are dropped, not errors.
        if REQUIRED
            .iter()
            .zip([date_i, price_i, moon_i, get_in_i, missed_i, profit_i, loss_i])
            .any(|(_, i)| cell(i).is_empty())
        {
            continue;
        }

        let timestamp = parse_date(cell(date_i)).map_err(|reason| {
            PipelineError::MalformedInput {
                row: line_no,
                field: COL_DATE,
                reason,
            }
        })?;

        let number = |field: &'static str, i: usize| -> Result<f64, PipelineError> {
            cell(i)
                .parse::<f64>()
                .map_err(|_| PipelineError::MalformedInput {
                    row: line_no,
                    field,
                    reason: format!("`{}` is not numeric", cell(i)),
                })
        };

        observations.push(Observation {
            timestamp,
            price: number(COL_PRICE, price_i)?,
            social_volumes: [
                number(COL_SOCIAL_MOON, moon_i)?,
                number(COL_SOCIAL_GET_IN, get_in_i)?,
                number(COL_SOCIAL_MISSED, missed_i)?,
            ],
            onchain_profit_volume: number(COL_PROFIT, profit_i)?,
            onchain_loss_volume: number(COL_LOSS, loss_i)?,
        });
    }

    if observations.is_empty() {
        return Err(PipelineError::EmptySeries);
    }
    Ok(observations)
}

/// Accept both datetime and date-only forms.
fn parse_date(value: &str) -> Result<NaiveDateTime, String> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(d.and_hms_opt(0, 0, 0).expect("midnight is always valid"));
    }
    Err(format!("`{value}` is not a recognised date"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,BTC / USD,Social Volume (to the moon),\
Social Volume (get in),Social Volume (i missed it),\
Daily On-Chain Transaction Volume in Profit,\
Daily On-Chain Transaction Volume in Loss";

    #[test]
    fn parses_well_formed_rows() {
        let csv = format!(
            "{HEADER}\n\
             2024-01-01 00:00:00,42000.5,10,20,30,1000,500\n\
             2024-01-01 01:00:00,42100.0,11,21,31,1100,600\n"
        );
        let obs = parse_csv(&csv).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].price, 42000.5);
        assert_eq!(obs[0].social_volumes, [10.0, 20.0, 30.0]);
        assert_eq!(obs[1].onchain_loss_volume, 600.0);
    }

    #[test]
    fn accepts_date_only_rows() {
        let csv = format!("{HEADER}\n2024-01-01,100.0,1,2,3,4,5\n");
        let obs = parse_csv(&csv).unwrap();
        assert_eq!(obs[0].timestamp.time(), chrono::NaiveTime::MIN);
    }

    #[test]
    fn drops_rows_with_empty_cells() {
        let csv = format!(
            "{HEADER}\n\
             2024-01-01 00:00:00,100.0,,2,3,4,5\n\
             2024-01-01 01:00:00,101.0,1,2,3,4,5\n"
        );
        let obs = parse_csv(&csv).unwrap();
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].price, 101.0);
    }

    #[test]
    fn missing_column_names_the_field() {
        let csv = "Date,BTC / USD\n2024-01-01,100.0\n";
        match parse_csv(csv) {
            Err(PipelineError::MalformedInput { field, .. }) => {
                assert_eq!(field, COL_SOCIAL_MOON);
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_cell_names_row_and_field() {
        let csv = format!("{HEADER}\n2024-01-01 00:00:00,abc,1,2,3,4,5\n");
        match parse_csv(&csv) {
            Err(PipelineError::MalformedInput { row, field, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(field, COL_PRICE);
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn bad_date_is_fatal() {
        let csv = format!("{HEADER}\nnot-a-date,100.0,1,2,3,4,5\n");
        assert!(matches!(
            parse_csv(&csv),
            Err(PipelineError::MalformedInput { field: COL_DATE, .. })
        ));
    }

    #[test]
    fn all_rows_empty_is_empty_series() {
        let csv = format!("{HEADER}\n");
        assert!(matches!(parse_csv(&csv), Err(PipelineError::EmptySeries)));
    }
}
