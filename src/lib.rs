//! Marketplace analytics SDK for Rust.
//!
//! Fetches per-product seller metrics (search rank, sales, click-through,
//! competitor pricing, reviews) from the analytics service, reconciles
//! concurrent responses into one immutable snapshot, and derives summary
//! figures from the raw records.
//!
//! # Quick start
//!
//! ```no_run
//! use market_analytics_sdk::{AnalyticsSdk, Filter, Platform};
//!
//! # async fn example() -> market_analytics_sdk::Result<()> {
//! let sdk = AnalyticsSdk::builder().user_id(1).build()?;
//! let dashboard = sdk.dashboard();
//!
//! // Load products, stats, sales, keywords and CTR for Ozon over 7 days
//! dashboard
//!     .apply_filter(Filter::default().with_platform(Platform::Ozon).with_window_days(7))
//!     .await;
//!
//! // Drill into one product: position history, competitors, reviews
//! dashboard.select_product(1).await;
//!
//! let snapshot = dashboard.snapshot();
//! println!("avg rating {:.1}", snapshot.average_rating());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod models;
pub mod orchestrator;
pub mod query;

pub use client::{AnalyticsClient, AnalyticsSource};
pub use dashboard::{Dashboard, DomainState, DomainStatus, Snapshot, ViewState};
pub use error::{AnalyticsError, Result};
pub use models::{Platform, PlatformFilter, ProductId};
pub use orchestrator::{CycleOutcome, Domain, Filter};
pub use query::QueryBuilder;

use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// AnalyticsSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AnalyticsSdk`] instance.
///
/// Use [`AnalyticsSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](AnalyticsSdkBuilder::build) to create the SDK.
pub struct AnalyticsSdkBuilder {
    base_url: Option<String>,
    user_id: u64,
    timeout: Duration,
    http: Option<reqwest::Client>,
}

impl Default for AnalyticsSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            user_id: config::DEFAULT_USER_ID,
            timeout: config::DEFAULT_TIMEOUT,
            http: None,
        }
    }
}

impl AnalyticsSdkBuilder {
    /// Set the service endpoint.
    ///
    /// If not set, `MARKET_ANALYTICS_API_URL` is used when present, else
    /// [`config::DEFAULT_API_URL`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the seller account whose data is requested. Defaults to `1`.
    pub fn user_id(mut self, user_id: u64) -> Self {
        self.user_id = user_id;
        self
    }

    /// Set the per-request timeout. Defaults to 30 seconds.
    ///
    /// Ignored when a preconfigured client is supplied via
    /// [`http_client`](Self::http_client).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Build the SDK. Fails only if the endpoint URL or HTTP client is invalid.
    pub fn build(self) -> Result<AnalyticsSdk> {
        let base_url = self.base_url.unwrap_or_else(config::default_api_url);
        let client = match self.http {
            Some(http) => AnalyticsClient::with_http_client(&base_url, http)?,
            None => AnalyticsClient::new(&base_url, self.timeout)?,
        };
        Ok(AnalyticsSdk {
            client,
            user_id: self.user_id,
        })
    }
}

// ---------------------------------------------------------------------------
// AnalyticsSdk
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Hands out the raw [`AnalyticsClient`] for one-off requests and
/// [`Dashboard`]s for orchestrated, snapshot-based access.
#[derive(Debug, Clone)]
pub struct AnalyticsSdk {
    client: AnalyticsClient,
    user_id: u64,
}

impl AnalyticsSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> AnalyticsSdkBuilder {
        AnalyticsSdkBuilder::default()
    }

    pub fn client(&self) -> &AnalyticsClient {
        &self.client
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    /// A fresh dashboard with the default filter (all platforms, 30 days).
    pub fn dashboard(&self) -> Dashboard<AnalyticsClient> {
        Dashboard::new(self.client.clone(), self.user_id)
    }

    /// A fresh dashboard starting from `filter`. No request is issued until
    /// [`Dashboard::apply_filter`] or [`Dashboard::refresh`] is called.
    pub fn dashboard_with(&self, filter: Filter) -> Dashboard<AnalyticsClient> {
        Dashboard::with_filter(self.client.clone(), self.user_id, filter)
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for AnalyticsSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AnalyticsSdk(base_url={}, user_id={})",
            self.client.base_url(),
            self.user_id
        )
    }
}
