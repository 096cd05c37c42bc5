//! Fetch orchestration: which requests a filter needs, issued concurrently,
//! with per-domain generation tokens for last-request-wins reconciliation.
//!
//! The orchestrator never touches view state. It hands out [`CycleToken`]s and
//! settled results; the [`Dashboard`](crate::dashboard::Dashboard) decides what
//! commits by asking [`Orchestrator::is_current`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::debug;

use crate::client::AnalyticsSource;
use crate::config;
use crate::error::Result;
use crate::models::{
    Competitor, CtrMetrics, Keyword, PlatformFilter, PositionPoint, Product, ProductId, Review,
    SalesPoint, Stats,
};

// ---------------------------------------------------------------------------
// Domains and cycles
// ---------------------------------------------------------------------------

/// A group of fetches that are issued and reconciled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Products, stats, sales, keywords and CTR for the current filter.
    Primary,
    PositionHistory,
    Competitors,
    Reviews,
}

impl Domain {
    pub const PER_PRODUCT: [Domain; 3] =
        [Domain::PositionHistory, Domain::Competitors, Domain::Reviews];

    fn index(self) -> usize {
        match self {
            Domain::Primary => 0,
            Domain::PositionHistory => 1,
            Domain::Competitors => 2,
            Domain::Reviews => 3,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Domain::Primary => "primary",
            Domain::PositionHistory => "position_history",
            Domain::Competitors => "competitors",
            Domain::Reviews => "reviews",
        };
        f.write_str(name)
    }
}

/// Identifies one fetch-and-reconcile attempt for a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CycleToken {
    pub domain: Domain,
    pub generation: u64,
}

impl CycleToken {
    /// Placeholder that no cycle ever matches; generations start at 1.
    pub(crate) fn unstarted(domain: Domain) -> Self {
        Self {
            domain,
            generation: 0,
        }
    }
}

/// Result of running a cycle through to reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The results were applied to the snapshot.
    Committed,
    /// A request failed; the snapshot was left untouched.
    Failed(String),
    /// A newer cycle for the same domain was started; results were discarded.
    Superseded,
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// The user-controlled inputs that drive the primary domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Filter {
    #[serde(serialize_with = "serialize_platform_filter")]
    pub platform: PlatformFilter,
    pub window_days: u32,
    /// Scopes sales, keywords and CTR to one product when set.
    pub product_id: Option<ProductId>,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            platform: PlatformFilter::All,
            window_days: config::DEFAULT_WINDOW_DAYS,
            product_id: None,
        }
    }
}

impl Filter {
    pub fn with_platform(mut self, platform: impl Into<PlatformFilter>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }

    pub fn with_product(mut self, product_id: Option<ProductId>) -> Self {
        self.product_id = product_id;
        self
    }
}

fn serialize_platform_filter<S: serde::Serializer>(
    filter: &PlatformFilter,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(filter)
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

/// Everything one primary cycle fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryBatch {
    pub products: Vec<Product>,
    pub stats: Stats,
    pub sales: Vec<SalesPoint>,
    pub keywords: Vec<Keyword>,
    pub ctr: CtrMetrics,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct Orchestrator<S> {
    source: S,
    user_id: u64,
    generations: [AtomicU64; 4],
}

impl<S: AnalyticsSource> Orchestrator<S> {
    pub fn new(source: S, user_id: u64) -> Self {
        Self {
            source,
            user_id,
            generations: Default::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    /// Start a new cycle for `domain`, superseding any cycle still in flight.
    pub fn begin(&self, domain: Domain) -> CycleToken {
        let generation = self.generations[domain.index()].fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Cycle started - domain={}, generation={}", domain, generation);
        CycleToken { domain, generation }
    }

    /// Whether `token` is still the latest cycle for its domain.
    pub fn is_current(&self, token: CycleToken) -> bool {
        self.generations[token.domain.index()].load(Ordering::SeqCst) == token.generation
    }

    /// Issue every primary-domain request concurrently and wait for all of
    /// them to settle. Any single failure fails the batch.
    pub async fn fetch_primary(&self, filter: &Filter) -> Result<PrimaryBatch> {
        let user = self.user_id;
        let (products, stats, sales, keywords, ctr) = futures::join!(
            self.source.fetch_products(user, filter.platform),
            self.source.fetch_stats(user, filter.window_days),
            self.source
                .fetch_sales_history(user, filter.window_days, filter.product_id),
            self.source.fetch_keywords(user, filter.product_id),
            self.source.fetch_ctr_metrics(user, filter.product_id),
        );
        Ok(PrimaryBatch {
            products: products?,
            stats: stats?,
            sales: sales?,
            keywords: keywords?,
            ctr: ctr?,
        })
    }

    pub async fn fetch_position_history(
        &self,
        product_id: ProductId,
        window_days: u32,
    ) -> Result<Vec<PositionPoint>> {
        self.source.fetch_position_history(product_id, window_days).await
    }

    pub async fn fetch_competitors(&self, product_id: ProductId) -> Result<Vec<Competitor>> {
        self.source.fetch_competitors(product_id).await
    }

    pub async fn fetch_reviews(&self, product_id: ProductId) -> Result<Vec<Review>> {
        self.source.fetch_reviews(product_id).await
    }
}
