//! HTTP client for the remote analytics service.
//!
//! Each operation maps to one `action` of the service's single GET endpoint.
//! Responses are decoded into strict per-action envelopes whose payload key
//! defaults to empty, so "no data" is an empty `Vec` rather than an error.
//! Only transport, status, and parse failures surface as [`AnalyticsError`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config;
use crate::error::{AnalyticsError, Result};
use crate::models::{
    dedup_by_key, sort_by_date, Competitor, CtrMetrics, Keyword, Notification, PlatformFilter,
    PositionPoint, Product, ProductId, Review, SalesPoint, Stats,
};
use crate::query::{Action, QueryBuilder};

// ---------------------------------------------------------------------------
// AnalyticsSource
// ---------------------------------------------------------------------------

/// The request/response contract of the analytics service.
///
/// [`AnalyticsClient`] is the HTTP implementation; the orchestrator only
/// depends on this trait.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn fetch_products(&self, user_id: u64, platform: PlatformFilter) -> Result<Vec<Product>>;

    async fn fetch_stats(&self, user_id: u64, window_days: u32) -> Result<Stats>;

    /// Daily sales, date-ascending. Scoped to one product when `product_id` is set.
    async fn fetch_sales_history(
        &self,
        user_id: u64,
        window_days: u32,
        product_id: Option<ProductId>,
    ) -> Result<Vec<SalesPoint>>;

    /// Daily search rank for one product, date-ascending.
    async fn fetch_position_history(
        &self,
        product_id: ProductId,
        window_days: u32,
    ) -> Result<Vec<PositionPoint>>;

    async fn fetch_competitors(&self, product_id: ProductId) -> Result<Vec<Competitor>>;

    async fn fetch_keywords(&self, user_id: u64, product_id: Option<ProductId>)
        -> Result<Vec<Keyword>>;

    async fn fetch_reviews(&self, product_id: ProductId) -> Result<Vec<Review>>;

    async fn fetch_ctr_metrics(&self, user_id: u64, product_id: Option<ProductId>)
        -> Result<CtrMetrics>;

    async fn fetch_notifications(&self, user_id: u64) -> Result<Vec<Notification>>;
}

#[async_trait]
impl<T: AnalyticsSource + ?Sized> AnalyticsSource for Arc<T> {
    async fn fetch_products(&self, user_id: u64, platform: PlatformFilter) -> Result<Vec<Product>> {
        (**self).fetch_products(user_id, platform).await
    }

    async fn fetch_stats(&self, user_id: u64, window_days: u32) -> Result<Stats> {
        (**self).fetch_stats(user_id, window_days).await
    }

    async fn fetch_sales_history(
        &self,
        user_id: u64,
        window_days: u32,
        product_id: Option<ProductId>,
    ) -> Result<Vec<SalesPoint>> {
        (**self)
            .fetch_sales_history(user_id, window_days, product_id)
            .await
    }

    async fn fetch_position_history(
        &self,
        product_id: ProductId,
        window_days: u32,
    ) -> Result<Vec<PositionPoint>> {
        (**self).fetch_position_history(product_id, window_days).await
    }

    async fn fetch_competitors(&self, product_id: ProductId) -> Result<Vec<Competitor>> {
        (**self).fetch_competitors(product_id).await
    }

    async fn fetch_keywords(
        &self,
        user_id: u64,
        product_id: Option<ProductId>,
    ) -> Result<Vec<Keyword>> {
        (**self).fetch_keywords(user_id, product_id).await
    }

    async fn fetch_reviews(&self, product_id: ProductId) -> Result<Vec<Review>> {
        (**self).fetch_reviews(product_id).await
    }

    async fn fetch_ctr_metrics(
        &self,
        user_id: u64,
        product_id: Option<ProductId>,
    ) -> Result<CtrMetrics> {
        (**self).fetch_ctr_metrics(user_id, product_id).await
    }

    async fn fetch_notifications(&self, user_id: u64) -> Result<Vec<Notification>> {
        (**self).fetch_notifications(user_id).await
    }
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Deserialize)]
struct HistoryEnvelope<T> {
    #[serde(default = "Vec::new")]
    history: Vec<T>,
}

#[derive(Deserialize)]
struct CompetitorsEnvelope {
    #[serde(default)]
    competitors: Vec<Competitor>,
}

#[derive(Deserialize)]
struct KeywordsEnvelope {
    #[serde(default)]
    keywords: Vec<Keyword>,
}

#[derive(Deserialize)]
struct ReviewsEnvelope {
    #[serde(default)]
    reviews: Vec<Review>,
}

#[derive(Deserialize)]
struct NotificationsEnvelope {
    #[serde(default)]
    notifications: Vec<Notification>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<serde_json::Value>,
}

/// Decode a response body, treating an `error` key as a service failure.
///
/// An empty body or `null` is read as `{}` so aggregate actions fall back to
/// their zeroed defaults.
pub(crate) fn decode<T: DeserializeOwned>(action: Action, body: &[u8]) -> Result<T> {
    let value: serde_json::Value = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Object(Default::default())
    } else {
        serde_json::from_slice(body)?
    };
    let value = match value {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other,
    };

    if value.is_object() {
        let envelope: ErrorEnvelope = serde_json::from_value(value.clone())?;
        if let Some(err) = envelope.error.filter(|e| !e.is_null()) {
            let message = match err {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            return Err(AnalyticsError::Service(format!("{action}: {message}")));
        }
    }

    Ok(serde_json::from_value(value)?)
}

// ---------------------------------------------------------------------------
// AnalyticsClient
// ---------------------------------------------------------------------------

/// HTTP implementation of [`AnalyticsSource`].
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    http: Client,
    base_url: Url,
}

impl AnalyticsClient {
    /// Create a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Self::with_http_client(base_url, http)
    }

    /// Create a client that reuses an existing [`reqwest::Client`].
    pub fn with_http_client(base_url: &str, http: Client) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AnalyticsError::InvalidUrl(format!("{base_url}: {e}")))?;
        Ok(Self { http, base_url })
    }

    /// Client for [`config::default_api_url`] with the default timeout.
    pub fn from_env() -> Result<Self> {
        Self::new(&config::default_api_url(), config::DEFAULT_TIMEOUT)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue one request and decode its body.
    async fn get<T: DeserializeOwned>(&self, query: &QueryBuilder) -> Result<T> {
        let action = query.action();
        let params = query.build();
        let start = Instant::now();

        debug!("Requesting analytics - action={}, params={:?}", action, params);

        let resp = self
            .http
            .get(self.base_url.clone())
            .query(&params)
            .send()
            .await?
            .error_for_status()?;
        let body = resp.bytes().await?;
        let decoded = decode(action, &body)?;

        info!(
            "Analytics fetch completed - action={}, duration={:.2}s, bytes={}",
            action,
            start.elapsed().as_secs_f32(),
            body.len()
        );
        Ok(decoded)
    }
}

#[async_trait]
impl AnalyticsSource for AnalyticsClient {
    async fn fetch_products(&self, user_id: u64, platform: PlatformFilter) -> Result<Vec<Product>> {
        let mut q = QueryBuilder::new(Action::Products);
        q.param("user_id", user_id)
            .opt_param("platform", platform.platform());
        let envelope: ProductsEnvelope = self.get(&q).await?;
        Ok(dedup_by_key(envelope.products, "products"))
    }

    async fn fetch_stats(&self, user_id: u64, window_days: u32) -> Result<Stats> {
        let mut q = QueryBuilder::new(Action::Stats);
        q.param("user_id", user_id).window(window_days)?;
        self.get(&q).await
    }

    async fn fetch_sales_history(
        &self,
        user_id: u64,
        window_days: u32,
        product_id: Option<ProductId>,
    ) -> Result<Vec<SalesPoint>> {
        let mut q = QueryBuilder::new(Action::SalesHistory);
        q.param("user_id", user_id)
            .window(window_days)?
            .opt_param("product_id", product_id);
        let envelope: HistoryEnvelope<SalesPoint> = self.get(&q).await?;
        Ok(sort_by_date(envelope.history))
    }

    async fn fetch_position_history(
        &self,
        product_id: ProductId,
        window_days: u32,
    ) -> Result<Vec<PositionPoint>> {
        let mut q = QueryBuilder::new(Action::PositionHistory);
        q.param("product_id", product_id).window(window_days)?;
        let envelope: HistoryEnvelope<PositionPoint> = self.get(&q).await?;
        Ok(sort_by_date(envelope.history))
    }

    async fn fetch_competitors(&self, product_id: ProductId) -> Result<Vec<Competitor>> {
        let mut q = QueryBuilder::new(Action::Competitors);
        q.param("product_id", product_id);
        let envelope: CompetitorsEnvelope = self.get(&q).await?;
        Ok(dedup_by_key(envelope.competitors, "competitors"))
    }

    async fn fetch_keywords(
        &self,
        user_id: u64,
        product_id: Option<ProductId>,
    ) -> Result<Vec<Keyword>> {
        let mut q = QueryBuilder::new(Action::Keywords);
        q.param("user_id", user_id).opt_param("product_id", product_id);
        let envelope: KeywordsEnvelope = self.get(&q).await?;
        Ok(envelope.keywords)
    }

    async fn fetch_reviews(&self, product_id: ProductId) -> Result<Vec<Review>> {
        let mut q = QueryBuilder::new(Action::Reviews);
        q.param("product_id", product_id);
        let envelope: ReviewsEnvelope = self.get(&q).await?;
        Ok(dedup_by_key(envelope.reviews, "reviews"))
    }

    async fn fetch_ctr_metrics(
        &self,
        user_id: u64,
        product_id: Option<ProductId>,
    ) -> Result<CtrMetrics> {
        let mut q = QueryBuilder::new(Action::CtrMetrics);
        q.param("user_id", user_id).opt_param("product_id", product_id);
        self.get(&q).await
    }

    async fn fetch_notifications(&self, user_id: u64) -> Result<Vec<Notification>> {
        let mut q = QueryBuilder::new(Action::Notifications);
        q.param("user_id", user_id);
        let envelope: NotificationsEnvelope = self.get(&q).await?;
        Ok(dedup_by_key(envelope.notifications, "notifications"))
    }
}
