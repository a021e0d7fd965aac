// =============================================================================
// Shared types used across the FOMO tracker
// =============================================================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The three tracked social-volume phrases.
///
/// The set is fixed: the indicator formulas assign each phrase its own weight,
/// so adding a phrase means changing the formulas, not just the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocialMetric {
    /// "to the moon"
    ToTheMoon,
    /// "get in"
    GetIn,
    /// "i missed it"
    IMissedIt,
}

impl SocialMetric {
    /// All metrics, in a stable order.
    pub const ALL: [SocialMetric; 3] =
        [SocialMetric::ToTheMoon, SocialMetric::GetIn, SocialMetric::IMissedIt];

    /// The phrase as it appears in the source data columns.
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::ToTheMoon => "to the moon",
            Self::GetIn => "get in",
            Self::IMissedIt => "i missed it",
        }
    }
}

impl std::fmt::Display for SocialMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.phrase())
    }
}

/// One raw input row: price, social counts, and on-chain volumes at a single
/// timestamp. Timestamps are timezone-naive and must be strictly increasing
/// within a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    /// Asset price in USD. Must be positive.
    pub price: f64,
    /// Social-volume counts in the `SocialMetric::ALL` order:
    /// [to the moon, get in, i missed it]. Non-negative.
    pub social_volumes: [f64; 3],
    /// Daily on-chain transaction volume moved at a profit. Non-negative.
    pub onchain_profit_volume: f64,
    /// Daily on-chain transaction volume moved at a loss. Non-negative.
    pub onchain_loss_volume: f64,
}

impl Observation {
    /// Social-volume count for one metric.
    pub fn social_volume(&self, metric: SocialMetric) -> f64 {
        match metric {
            SocialMetric::ToTheMoon => self.social_volumes[0],
            SocialMetric::GetIn => self.social_volumes[1],
            SocialMetric::IMissedIt => self.social_volumes[2],
        }
    }

    /// Combined on-chain volume (profit + loss legs).
    pub fn total_volume(&self) -> f64 {
        self.onchain_profit_volume + self.onchain_loss_volume
    }
}

/// Discrete trading recommendation derived from the single-token composite
/// score. Bands are checked top-down, first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Recommendation {
    /// Map a composite score onto a recommendation band.
    ///
    /// Thresholds are exclusive lower bounds: a score of exactly 70 is a BUY,
    /// exactly 55 is a HOLD, and so on.
    pub fn from_score(composite: f64) -> Self {
        if composite > 70.0 {
            Self::StrongBuy
        } else if composite > 55.0 {
            Self::Buy
        } else if composite > 45.0 {
            Self::Hold
        } else if composite > 30.0 {
            Self::Sell
        } else {
            Self::StrongSell
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongBuy => write!(f, "STRONG BUY"),
            Self::Buy => write!(f, "BUY"),
            Self::Hold => write!(f, "HOLD"),
            Self::Sell => write!(f, "SELL"),
            Self::StrongSell => write!(f, "STRONG SELL"),
        }
    }
}

/// Gauge zone for the latest FOMO index reading (dashboard display).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GaugeZone {
    /// Index below 20.
    Oversold,
    /// Index in [20, 80].
    Neutral,
    /// Index above 80.
    Overbought,
}

impl GaugeZone {
    pub fn from_index(value: f64) -> Self {
        if value > 80.0 {
            Self::Overbought
        } else if value < 20.0 {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for GaugeZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Oversold => write!(f, "Oversold"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Overbought => write!(f, "Overbought"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_bands_top_down() {
        assert_eq!(Recommendation::from_score(90.0), Recommendation::StrongBuy);
        assert_eq!(Recommendation::from_score(70.0), Recommendation::Buy);
        assert_eq!(Recommendation::from_score(60.0), Recommendation::Buy);
        assert_eq!(Recommendation::from_score(55.0), Recommendation::Hold);
        assert_eq!(Recommendation::from_score(50.0), Recommendation::Hold);
        assert_eq!(Recommendation::from_score(45.0), Recommendation::Sell);
        assert_eq!(Recommendation::from_score(31.0), Recommendation::Sell);
        assert_eq!(Recommendation::from_score(30.0), Recommendation::StrongSell);
        assert_eq!(Recommendation::from_score(0.0), Recommendation::StrongSell);
    }

    #[test]
    fn gauge_zones() {
        assert_eq!(GaugeZone::from_index(10.0), GaugeZone::Oversold);
        assert_eq!(GaugeZone::from_index(20.0), GaugeZone::Neutral);
        assert_eq!(GaugeZone::from_index(80.0), GaugeZone::Neutral);
        assert_eq!(GaugeZone::from_index(95.0), GaugeZone::Overbought);
    }

    #[test]
    fn social_volume_lookup_matches_order() {
        let obs = Observation {
            timestamp: chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            price: 100.0,
            social_volumes: [1.0, 2.0, 3.0],
            onchain_profit_volume: 10.0,
            onchain_loss_volume: 5.0,
        };
        assert_eq!(obs.social_volume(SocialMetric::ToTheMoon), 1.0);
        assert_eq!(obs.social_volume(SocialMetric::GetIn), 2.0);
        assert_eq!(obs.social_volume(SocialMetric::IMissedIt), 3.0);
        assert_eq!(obs.total_volume(), 15.0);
    }
}
