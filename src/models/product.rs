use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{wire, Keyed};
use crate::error::AnalyticsError;

pub type ProductId = u64;

// ---------------------------------------------------------------------------
// Platform: Marketplace a product is listed on
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Wildberries,
    Ozon,
    Yandex,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Wildberries, Platform::Ozon, Platform::Yandex];

    /// Wire name used by the service (`"wildberries"`, `"ozon"`, `"yandex"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Wildberries => "wildberries",
            Platform::Ozon => "ozon",
            Platform::Yandex => "yandex",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wildberries" => Ok(Platform::Wildberries),
            "ozon" => Ok(Platform::Ozon),
            "yandex" => Ok(Platform::Yandex),
            other => Err(AnalyticsError::InvalidArgument(format!(
                "Unknown platform: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// PlatformFilter: "all" or a single marketplace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlatformFilter {
    #[default]
    All,
    Only(Platform),
}

impl PlatformFilter {
    /// The platform to send to the service, or `None` for no filtering.
    pub fn platform(&self) -> Option<Platform> {
        match self {
            PlatformFilter::All => None,
            PlatformFilter::Only(p) => Some(*p),
        }
    }

    pub fn matches(&self, platform: Platform) -> bool {
        self.platform().map_or(true, |p| p == platform)
    }
}

impl From<Platform> for PlatformFilter {
    fn from(platform: Platform) -> Self {
        PlatformFilter::Only(platform)
    }
}

impl From<Option<Platform>> for PlatformFilter {
    fn from(platform: Option<Platform>) -> Self {
        platform.map_or(PlatformFilter::All, PlatformFilter::Only)
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformFilter::All => f.write_str("all"),
            PlatformFilter::Only(p) => p.fmt(f),
        }
    }
}

impl FromStr for PlatformFilter {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(PlatformFilter::All)
        } else {
            trimmed.parse().map(PlatformFilter::Only)
        }
    }
}

// ---------------------------------------------------------------------------
// Product: A tracked listing with its latest rank and CTR
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "wire::text")]
    pub name: String,
    pub platform: Platform,
    #[serde(default, deserialize_with = "wire::number")]
    pub price: f64,
    /// Latest search rank; `None` while the product is unranked.
    #[serde(default, deserialize_with = "wire::optional_rank")]
    pub current_position: Option<u32>,
    /// Latest click-through rate as a fraction.
    #[serde(
        default,
        serialize_with = "wire::as_percent",
        deserialize_with = "wire::percent_fraction"
    )]
    pub ctr: f64,
}

impl Keyed for Product {
    fn key(&self) -> u64 {
        self.id
    }
}
