use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{wire, Dated};

// ---------------------------------------------------------------------------
// SalesPoint: One day of sales for a product or a whole account
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesPoint {
    #[serde(deserialize_with = "wire::date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "wire::count")]
    pub sales_count: u64,
    #[serde(default, deserialize_with = "wire::number")]
    pub revenue: f64,
    #[serde(default, deserialize_with = "wire::count")]
    pub orders_count: u64,
}

impl Dated for SalesPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

// ---------------------------------------------------------------------------
// PositionPoint: Search rank observed on a given day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionPoint {
    #[serde(deserialize_with = "wire::date")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "wire::rank")]
    pub position: u32,
    /// Search phrase the rank was measured for, when the service records one.
    #[serde(default)]
    pub keyword: Option<String>,
}

impl Dated for PositionPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
