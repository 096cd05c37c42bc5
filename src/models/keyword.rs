use serde::{Deserialize, Serialize};

use super::wire;

// ---------------------------------------------------------------------------
// Keyword: Search phrase performance for a product
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    #[serde(deserialize_with = "wire::text")]
    pub keyword: String,
    #[serde(default, deserialize_with = "wire::count")]
    pub impressions: u64,
    #[serde(default, deserialize_with = "wire::count")]
    pub clicks: u64,
    /// Click-through rate as reported by the service, as a fraction.
    ///
    /// See [`crate::metrics::keyword_ctr`] for the value derived from
    /// `clicks / impressions`.
    #[serde(
        default,
        serialize_with = "wire::as_percent",
        deserialize_with = "wire::percent_fraction"
    )]
    pub ctr: f64,
    #[serde(default, deserialize_with = "wire::optional_rank")]
    pub position: Option<u32>,
}
