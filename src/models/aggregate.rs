use serde::{Deserialize, Serialize};

use super::wire;

// ---------------------------------------------------------------------------
// Stats: Account-level totals over the requested window
// ---------------------------------------------------------------------------

/// Server-computed totals, consumed as-is.
///
/// The service answers `{}` when it has nothing to aggregate, which
/// deserializes to all zeros.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default, deserialize_with = "wire::number")]
    pub total_revenue: f64,
    #[serde(default, deserialize_with = "wire::count")]
    pub total_sales: u64,
    #[serde(default, deserialize_with = "wire::number")]
    pub avg_position: f64,
    #[serde(
        default,
        serialize_with = "wire::as_percent",
        deserialize_with = "wire::percent_fraction"
    )]
    pub avg_ctr: f64,
}

// ---------------------------------------------------------------------------
// CtrMetrics: Impression/click/conversion totals behind the funnel
// ---------------------------------------------------------------------------

/// Funnel basis.
///
/// Account-wide requests return summed `total_*` columns; product-scoped
/// requests return the latest raw row with bare column names, so both
/// spellings are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CtrMetrics {
    #[serde(default, alias = "impressions", deserialize_with = "wire::count")]
    pub total_impressions: u64,
    #[serde(default, alias = "clicks", deserialize_with = "wire::count")]
    pub total_clicks: u64,
    #[serde(default, alias = "conversions", deserialize_with = "wire::count")]
    pub total_conversions: u64,
    #[serde(
        default,
        serialize_with = "wire::as_percent",
        deserialize_with = "wire::percent_fraction"
    )]
    pub ctr: f64,
}
