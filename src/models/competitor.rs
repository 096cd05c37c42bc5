use serde::{Deserialize, Serialize};

use super::{wire, Keyed};

// ---------------------------------------------------------------------------
// Competitor: A rival listing tracked against one of our products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: u64,
    #[serde(default, deserialize_with = "wire::text")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::number")]
    pub price: f64,
    #[serde(default, deserialize_with = "wire::optional_rank")]
    pub position: Option<u32>,
    #[serde(default, deserialize_with = "wire::star_rating")]
    pub rating: f64,
    #[serde(default, deserialize_with = "wire::count")]
    pub reviews_count: u64,
    #[serde(default, deserialize_with = "wire::count")]
    pub sales_estimate: u64,
}

impl Keyed for Competitor {
    fn key(&self) -> u64 {
        self.id
    }
}
