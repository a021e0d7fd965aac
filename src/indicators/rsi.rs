// =============================================================================
// Relative Strength Index (RSI) — trailing-mean form
// =============================================================================
//
// Step 1 — Compute price deltas from consecutive closes.
// Step 2 — avg_gain / avg_loss = mean of the positive / negative deltas over
//          the trailing `period` deltas (losses enter as magnitudes).
// Step 3 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Defaults instead of failures: fewer than `period` deltas yields the neutral
// 50; a zero average loss (no down moves in the window) clamps RSI to 100.
// =============================================================================

/// RSI over the trailing `period` price deltas, in [0, 100].
///
/// Total function: short histories return the neutral 50 rather than an
/// undefined value, so the composite score is always computable.
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return 50.0;
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

    let (sum_gain, sum_loss) = deltas[deltas.len() - period..]
        .iter()
        .fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l + d.abs())
            }
        });

    let avg_gain = sum_gain / period as f64;
    let avg_loss = sum_loss / period as f64;

    if avg_loss == 0.0 {
        return 100.0; // No down moves — clamp rather than divide by zero.
    }

    let rs = avg_gain / avg_loss;
    let value = 100.0 - 100.0 / (1.0 + rs);
    if value.is_finite() {
        value
    } else {
        50.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_short_history_is_neutral() {
        assert_eq!(rsi(&[], 14), 50.0);
        // 14 prices = 13 deltas, one short of the 14 required.
        let prices: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert_eq!(rsi(&prices, 14), 50.0);
    }

    #[test]
    fn rsi_period_zero_is_neutral() {
        assert_eq!(rsi(&[1.0, 2.0, 3.0], 0), 50.0);
    }

    #[test]
    fn rsi_all_gains_is_100() {
        // E2: a steadily rising series has no losses, so avg_loss = 0.
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + 2.5 * i as f64).collect();
        assert_eq!(rsi(&prices, 14), 100.0);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let prices: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        assert!(rsi(&prices, 14).abs() < 1e-10);
    }

    #[test]
    fn rsi_balanced_moves_is_50() {
        // Alternating +1 / -1 deltas: avg_gain == avg_loss => RS = 1 => RSI 50.
        let mut prices = vec![100.0];
        for i in 0..20 {
            let last = *prices.last().unwrap();
            prices.push(if i % 2 == 0 { last + 1.0 } else { last - 1.0 });
        }
        assert!((rsi(&prices, 14) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_range_check() {
        let prices = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let v = rsi(&prices, 14);
        assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
    }
}
