//! Shared test fixtures for the analytics SDK integration tests.
//!
//! Provides `FakeSource`, an in-memory [`AnalyticsSource`] whose responses,
//! latencies and failures are scripted per test, plus small record builders.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use market_analytics_sdk::models::{
    Competitor, CtrMetrics, Keyword, Notification, PositionPoint, Product, Review, SalesPoint,
    Sentiment, Stats,
};
use market_analytics_sdk::query::Action;
use market_analytics_sdk::{AnalyticsError, AnalyticsSource, Platform, PlatformFilter, ProductId, Result};

#[derive(Default)]
struct Script {
    products: HashMap<PlatformFilter, Vec<Product>>,
    product_latency: HashMap<PlatformFilter, Duration>,
    stats: Stats,
    sales: Vec<SalesPoint>,
    keywords: Vec<Keyword>,
    ctr: CtrMetrics,
    positions: HashMap<ProductId, Vec<PositionPoint>>,
    competitors: HashMap<ProductId, Vec<Competitor>>,
    reviews: HashMap<ProductId, Vec<Review>>,
    product_scoped_latency: HashMap<ProductId, Duration>,
    failing: HashSet<Action>,
    calls: Vec<Action>,
}

/// Scripted in-memory analytics service.
#[derive(Default)]
pub struct FakeSource {
    script: Mutex<Script>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_products(&self, filter: impl Into<PlatformFilter>, products: Vec<Product>) {
        self.script.lock().unwrap().products.insert(filter.into(), products);
    }

    pub fn set_all_products(&self, products: Vec<Product>) {
        self.set_products(PlatformFilter::All, products);
    }

    /// Delay the products response (and so the whole primary batch) for a filter.
    pub fn set_product_latency(&self, filter: impl Into<PlatformFilter>, latency: Duration) {
        self.script
            .lock()
            .unwrap()
            .product_latency
            .insert(filter.into(), latency);
    }

    pub fn set_stats(&self, stats: Stats) {
        self.script.lock().unwrap().stats = stats;
    }

    pub fn set_sales(&self, sales: Vec<SalesPoint>) {
        self.script.lock().unwrap().sales = sales;
    }

    pub fn set_ctr(&self, ctr: CtrMetrics) {
        self.script.lock().unwrap().ctr = ctr;
    }

    pub fn set_positions(&self, product_id: ProductId, points: Vec<PositionPoint>) {
        self.script.lock().unwrap().positions.insert(product_id, points);
    }

    pub fn set_competitors(&self, product_id: ProductId, competitors: Vec<Competitor>) {
        self.script
            .lock()
            .unwrap()
            .competitors
            .insert(product_id, competitors);
    }

    pub fn set_reviews(&self, product_id: ProductId, reviews: Vec<Review>) {
        self.script.lock().unwrap().reviews.insert(product_id, reviews);
    }

    /// Delay every per-product response for one product.
    pub fn set_product_scoped_latency(&self, product_id: ProductId, latency: Duration) {
        self.script
            .lock()
            .unwrap()
            .product_scoped_latency
            .insert(product_id, latency);
    }

    pub fn fail(&self, action: Action) {
        self.script.lock().unwrap().failing.insert(action);
    }

    pub fn recover(&self, action: Action) {
        self.script.lock().unwrap().failing.remove(&action);
    }

    pub fn calls(&self, action: Action) -> usize {
        self.script
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|a| **a == action)
            .count()
    }

    /// Record the call and return its scripted latency, or the scripted failure.
    fn enter(&self, action: Action, latency: impl FnOnce(&Script) -> Option<Duration>) -> Result<Duration> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(action);
        if script.failing.contains(&action) {
            return Err(AnalyticsError::Service(format!("{action}: scripted failure")));
        }
        Ok(latency(&script).unwrap_or(Duration::ZERO))
    }

    async fn settle<T>(
        &self,
        action: Action,
        latency: impl FnOnce(&Script) -> Option<Duration>,
        read: impl FnOnce(&Script) -> T,
    ) -> Result<T> {
        let delay = self.enter(action, latency)?;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let script = self.script.lock().unwrap();
        Ok(read(&script))
    }
}

#[async_trait]
impl AnalyticsSource for FakeSource {
    async fn fetch_products(&self, _user_id: u64, platform: PlatformFilter) -> Result<Vec<Product>> {
        self.settle(
            Action::Products,
            |s| s.product_latency.get(&platform).copied(),
            |s| s.products.get(&platform).cloned().unwrap_or_default(),
        )
        .await
    }

    async fn fetch_stats(&self, _user_id: u64, _window_days: u32) -> Result<Stats> {
        self.settle(Action::Stats, |_| None, |s| s.stats.clone()).await
    }

    async fn fetch_sales_history(
        &self,
        _user_id: u64,
        _window_days: u32,
        _product_id: Option<ProductId>,
    ) -> Result<Vec<SalesPoint>> {
        self.settle(Action::SalesHistory, |_| None, |s| s.sales.clone()).await
    }

    async fn fetch_position_history(
        &self,
        product_id: ProductId,
        _window_days: u32,
    ) -> Result<Vec<PositionPoint>> {
        self.settle(
            Action::PositionHistory,
            |s| s.product_scoped_latency.get(&product_id).copied(),
            |s| s.positions.get(&product_id).cloned().unwrap_or_default(),
        )
        .await
    }

    async fn fetch_competitors(&self, product_id: ProductId) -> Result<Vec<Competitor>> {
        self.settle(
            Action::Competitors,
            |s| s.product_scoped_latency.get(&product_id).copied(),
            |s| s.competitors.get(&product_id).cloned().unwrap_or_default(),
        )
        .await
    }

    async fn fetch_keywords(&self, _user_id: u64, _product_id: Option<ProductId>) -> Result<Vec<Keyword>> {
        self.settle(Action::Keywords, |_| None, |s| s.keywords.clone()).await
    }

    async fn fetch_reviews(&self, product_id: ProductId) -> Result<Vec<Review>> {
        self.settle(
            Action::Reviews,
            |s| s.product_scoped_latency.get(&product_id).copied(),
            |s| s.reviews.get(&product_id).cloned().unwrap_or_default(),
        )
        .await
    }

    async fn fetch_ctr_metrics(&self, _user_id: u64, _product_id: Option<ProductId>) -> Result<CtrMetrics> {
        self.settle(Action::CtrMetrics, |_| None, |s| s.ctr.clone()).await
    }

    async fn fetch_notifications(&self, _user_id: u64) -> Result<Vec<Notification>> {
        self.settle(Action::Notifications, |_| None, |_| Vec::new()).await
    }
}

// ---------------------------------------------------------------------------
// Record builders
// ---------------------------------------------------------------------------

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

pub fn product(id: ProductId, platform: Platform, position: Option<u32>) -> Product {
    Product {
        id,
        name: format!("Product {id}"),
        platform,
        price: 1000.0 + id as f64,
        current_position: position,
        ctr: 0.05,
    }
}

pub fn review(id: u64, rating: u8, sentiment: Sentiment) -> Review {
    Review {
        id,
        rating,
        text: format!("review {id}"),
        author: "buyer".to_string(),
        date: day(1),
        sentiment,
    }
}

pub fn competitor(id: u64, price: f64) -> Competitor {
    Competitor {
        id,
        name: format!("Competitor {id}"),
        price,
        position: Some(id as u32),
        rating: 4.5,
        reviews_count: 100,
        sales_estimate: 50,
    }
}

pub fn position(d: u32, position: u32) -> PositionPoint {
    PositionPoint {
        date: day(d),
        position,
        keyword: None,
    }
}

pub fn sales(d: u32, sales_count: u64, revenue: f64) -> SalesPoint {
    SalesPoint {
        date: day(d),
        sales_count,
        revenue,
        orders_count: sales_count,
    }
}
