//! Derived metrics over already-fetched collections.
//!
//! Everything here is pure. Empty input yields zeros (or `None` where a
//! zero would be fabricated data, as with the CTR funnel), never NaN.

use std::fmt;

use serde::Serialize;

use crate::models::{Competitor, CtrMetrics, Keyword, PositionPoint, Review, SalesPoint, Sentiment};

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Mean review rating, or exactly `0.0` for an empty set.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();
    sum as f64 / reviews.len() as f64
}

/// Display form of [`average_rating`]: `"0"` for no reviews, else one decimal.
pub fn format_average_rating(reviews: &[Review]) -> String {
    if reviews.is_empty() {
        "0".to_string()
    } else {
        format!("{:.1}", average_rating(reviews))
    }
}

/// Review count per sentiment. All three buckets are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentCounts {
    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Share of one bucket as a percentage of all reviews.
    pub fn share(&self, sentiment: Sentiment) -> f64 {
        percentage(self.get(sentiment) as f64, self.total() as f64)
    }
}

pub fn sentiment_distribution(reviews: &[Review]) -> SentimentCounts {
    reviews
        .iter()
        .fold(SentimentCounts::default(), |mut acc, r| {
            match r.sentiment {
                Sentiment::Positive => acc.positive += 1,
                Sentiment::Negative => acc.negative += 1,
                Sentiment::Neutral => acc.neutral += 1,
            }
            acc
        })
}

// ---------------------------------------------------------------------------
// CTR funnel
// ---------------------------------------------------------------------------

/// Ordered impressions → clicks → conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CtrFunnel {
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
}

impl CtrFunnel {
    /// `None` when there are no impressions to build a funnel from.
    pub fn from_metrics(metrics: &CtrMetrics) -> Option<Self> {
        if metrics.total_impressions == 0 {
            return None;
        }
        Some(Self {
            impressions: metrics.total_impressions,
            clicks: metrics.total_clicks,
            conversions: metrics.total_conversions,
        })
    }

    pub fn stages(&self) -> [(FunnelStage, u64); 3] {
        [
            (FunnelStage::Impressions, self.impressions),
            (FunnelStage::Clicks, self.clicks),
            (FunnelStage::Conversions, self.conversions),
        ]
    }

    /// Clicks per impression, as a fraction.
    pub fn click_through_rate(&self) -> f64 {
        ratio(self.clicks, self.impressions)
    }

    /// Conversions per click, as a fraction.
    pub fn conversion_rate(&self) -> f64 {
        ratio(self.conversions, self.clicks)
    }

    /// Stage value as a percentage of impressions.
    pub fn stage_percentage(&self, stage: FunnelStage) -> f64 {
        let value = match stage {
            FunnelStage::Impressions => self.impressions,
            FunnelStage::Clicks => self.clicks,
            FunnelStage::Conversions => self.conversions,
        };
        percentage(value as f64, self.impressions as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FunnelStage {
    Impressions,
    Clicks,
    Conversions,
}

// ---------------------------------------------------------------------------
// Position delta
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Improved,
    Declined,
    Unchanged,
}

/// Rank change between two observations. Lower rank is better, so moving
/// from 15 to 8 is an improvement of 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionDelta {
    pub previous: u32,
    pub current: u32,
    /// `previous - current`; positive means the product climbed.
    pub delta: i64,
    pub magnitude: u32,
    pub direction: Direction,
}

impl PositionDelta {
    pub fn between(previous: u32, current: u32) -> Self {
        let delta = i64::from(previous) - i64::from(current);
        let direction = match delta {
            d if d > 0 => Direction::Improved,
            d if d < 0 => Direction::Declined,
            _ => Direction::Unchanged,
        };
        Self {
            previous,
            current,
            delta,
            magnitude: previous.abs_diff(current),
            direction,
        }
    }

    /// Change from the first to the last point of a date-ascending series.
    pub fn from_history(points: &[PositionPoint]) -> Option<Self> {
        match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() >= 2 => {
                Some(Self::between(first.position, last.position))
            }
            _ => None,
        }
    }

    /// `"+7"`, `"-5"` or `"0"`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PositionDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Improved => write!(f, "+{}", self.magnitude),
            Direction::Declined => write!(f, "-{}", self.magnitude),
            Direction::Unchanged => f.write_str("0"),
        }
    }
}

// ---------------------------------------------------------------------------
// Ratios and totals
// ---------------------------------------------------------------------------

/// `value / total` as a percentage clamped to `[0, 100]`; `0` for an empty total.
pub fn percentage(value: f64, total: f64) -> f64 {
    if total <= 0.0 || !value.is_finite() || !total.is_finite() {
        return 0.0;
    }
    (value / total * 100.0).clamp(0.0, 100.0)
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64).clamp(0.0, 1.0)
    }
}

/// Click-through rate derived from a keyword's own counts, as a fraction.
pub fn keyword_ctr(keyword: &Keyword) -> f64 {
    ratio(keyword.clicks, keyword.impressions)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SalesTotals {
    pub sales: u64,
    pub revenue: f64,
    pub orders: u64,
}

pub fn sales_totals(history: &[SalesPoint]) -> SalesTotals {
    history.iter().fold(SalesTotals::default(), |acc, p| SalesTotals {
        sales: acc.sales + p.sales_count,
        revenue: acc.revenue + p.revenue,
        orders: acc.orders + p.orders_count,
    })
}

/// Relative difference between our price and the mean competitor price.
///
/// Negative means we are cheaper. `None` without priced competitors.
pub fn competitor_price_gap(product_price: f64, competitors: &[Competitor]) -> Option<f64> {
    let priced: Vec<f64> = competitors
        .iter()
        .map(|c| c.price)
        .filter(|p| *p > 0.0)
        .collect();
    if priced.is_empty() {
        return None;
    }
    let mean = priced.iter().sum::<f64>() / priced.len() as f64;
    Some((product_price - mean) / mean)
}
