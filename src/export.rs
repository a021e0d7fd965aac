// =============================================================================
// CSV export — derived table view
// =============================================================================
//
// A thin post-processing view over the derived series: filter rows to an
// inclusive [start, end] date range, optionally smooth the FOMO index with a
// trailing moving average, and render the derived table as CSV text.
// Undefined slots (including the leading slots a smoothing window leaves
// behind) render as empty cells.

use chrono::NaiveDateTime;

use crate::pipeline::DerivedSeries;
use crate::stats::{lift, rolling_mean};

const EXPORT_HEADER: &str = "Date,Price,Price Change %,Price MA7,Price Z-Score,\
Total Volume,Volume Z-Score,Social Z-Score (to the moon),\
Social Z-Score (get in),Social Z-Score (i missed it),Price/Volume Multiplier,\
Social FOMO,Social FOMO Score,Normalized Price,Normalized Volume,\
Normalized Social FOMO,FOMO Index,FOMO Signal";

/// Export options supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Inclusive range start; unbounded when absent.
    pub start: Option<NaiveDateTime>,
    /// Inclusive range end; unbounded when absent.
    pub end: Option<NaiveDateTime>,
    /// Trailing moving-average window for the FOMO index column; 0 disables
    /// smoothing.
    pub smoothing_window: usize,
}

/// Render the derived table as CSV text under the given options.
pub fn export_csv(series: &DerivedSeries, options: &ExportOptions) -> String {
    // Smoothing runs over the FULL series so the window is not truncated at
    // the range boundary; filtering applies afterwards.
    let index_column: Vec<Option<f64>> = if options.smoothing_window > 0 {
        rolling_mean(&lift(&series.fomo_index), options.smoothing_window)
    } else {
        series.fomo_index.iter().map(|&v| Some(v)).collect()
    };

    let mut out = String::from(EXPORT_HEADER);
    out.push('\n');

    for (i, obs) in series.observations.iter().enumerate() {
        if let Some(start) = options.start {
            if obs.timestamp < start {
                continue;
            }
        }
        if let Some(end) = options.end {
            if obs.timestamp > end {
                continue;
            }
        }

        let c = &series.columns;
        let row = [
            obs.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            num(Some(obs.price)),
            num(c.price_change_pct[i]),
            num(c.price_ma_short[i]),
            num(c.price_zscore[i]),
            num(Some(c.total_volume[i])),
            num(c.volume_zscore[i]),
            num(c.social_zscores[0][i]),
            num(c.social_zscores[1][i]),
            num(c.social_zscores[2][i]),
            num(Some(c.price_volume_multiplier[i])),
            num(Some(c.social_fomo_raw[i])),
            num(Some(c.social_fomo_score[i])),
            num(c.normalized_price[i]),
            num(c.normalized_volume[i]),
            num(c.normalized_social_fomo[i]),
            num(index_column[i]),
            if series.fomo_signal[i] { "1" } else { "0" }.to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// An undefined slot renders as an empty cell.
fn num(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::quiet_series;
    use crate::pipeline::{self};
    use crate::runtime_config::PipelineParams;

    fn derived() -> pipeline::DerivedSeries {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        pipeline::run(quiet_series(&prices), &PipelineParams::default()).unwrap()
    }

    #[test]
    fn exports_header_and_all_rows_by_default() {
        let csv = export_csv(&derived(), &ExportOptions::default());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 11);
        assert!(lines[0].starts_with("Date,Price,"));
        assert!(lines[1].starts_with("2024-01-01 00:00:00,100,"));
    }

    #[test]
    fn date_range_is_inclusive() {
        let series = derived();
        let start = series.observations[2].timestamp;
        let end = series.observations[5].timestamp;
        let csv = export_csv(
            &series,
            &ExportOptions {
                start: Some(start),
                end: Some(end),
                smoothing_window: 0,
            },
        );
        // Header plus rows 2..=5.
        assert_eq!(csv.lines().count(), 5);
    }

    #[test]
    fn smoothing_blanks_leading_index_cells() {
        let csv = export_csv(
            &derived(),
            &ExportOptions {
                start: None,
                end: None,
                smoothing_window: 3,
            },
        );
        let second_cell = |line: &str| -> String {
            line.split(',').rev().nth(1).unwrap().to_string()
        };
        let lines: Vec<&str> = csv.lines().collect();
        // FOMO Index is the second-to-last column: blank until the window
        // fills at the third data row.
        assert_eq!(second_cell(lines[1]), "");
        assert_eq!(second_cell(lines[2]), "");
        assert_ne!(second_cell(lines[3]), "");
    }
}
