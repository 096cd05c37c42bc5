//! View-state reducer: one owned, immutable snapshot replaced wholesale.
//!
//! [`Dashboard`] is the only way state changes. It runs cycles through the
//! [`Orchestrator`], and commits their results with a single synchronous
//! replace of the published [`ViewState`], re-checking the cycle token inside
//! the replace so a superseded cycle can never land.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::client::AnalyticsSource;
use crate::error::Result;
use crate::metrics::{self, CtrFunnel, PositionDelta, SalesTotals, SentimentCounts};
use crate::models::{
    Competitor, CtrMetrics, Keyword, PositionPoint, Product, ProductId, Review, SalesPoint, Stats,
};
use crate::orchestrator::{CycleOutcome, CycleToken, Domain, Filter, Orchestrator, PrimaryBatch};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Per-product data tagged with the product it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductScoped<T> {
    pub product_id: ProductId,
    pub items: Vec<T>,
}

/// The complete set of currently valid collections.
///
/// Every category sits behind its own `Arc`, so replacing one category shares
/// the others with the previous snapshot instead of copying them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub products: Arc<Vec<Product>>,
    pub stats: Arc<Stats>,
    pub sales: Arc<Vec<SalesPoint>>,
    pub keywords: Arc<Vec<Keyword>>,
    pub ctr: Arc<CtrMetrics>,
    /// Each product's rank as of the primary batch before this one.
    pub previous_positions: Arc<HashMap<ProductId, u32>>,
    pub position_history: Option<Arc<ProductScoped<PositionPoint>>>,
    pub competitors: Option<Arc<ProductScoped<Competitor>>>,
    pub reviews: Option<Arc<ProductScoped<Review>>>,
    /// Whether any primary batch has ever committed.
    pub primary_loaded: bool,
}

impl Snapshot {
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Rank change for a product between the last two primary batches.
    ///
    /// `None` unless both the previous and current rank are known.
    pub fn position_delta(&self, id: ProductId) -> Option<PositionDelta> {
        let current = self.product(id)?.current_position?;
        let previous = *self.previous_positions.get(&id)?;
        Some(PositionDelta::between(previous, current))
    }

    pub fn reviews_for(&self, id: ProductId) -> &[Review] {
        scoped_items(&self.reviews, id)
    }

    pub fn competitors_for(&self, id: ProductId) -> &[Competitor] {
        scoped_items(&self.competitors, id)
    }

    pub fn position_history_for(&self, id: ProductId) -> &[PositionPoint] {
        scoped_items(&self.position_history, id)
    }

    pub fn average_rating(&self) -> f64 {
        self.reviews
            .as_ref()
            .map_or(0.0, |r| metrics::average_rating(&r.items))
    }

    pub fn sentiment(&self) -> SentimentCounts {
        self.reviews
            .as_ref()
            .map(|r| metrics::sentiment_distribution(&r.items))
            .unwrap_or_default()
    }

    pub fn funnel(&self) -> Option<CtrFunnel> {
        CtrFunnel::from_metrics(&self.ctr)
    }

    pub fn sales_totals(&self) -> SalesTotals {
        metrics::sales_totals(&self.sales)
    }

    /// Snapshot with the primary categories replaced by `batch`.
    fn with_primary(&self, batch: PrimaryBatch) -> Self {
        let previous_positions = self
            .products
            .iter()
            .filter_map(|p| p.current_position.map(|pos| (p.id, pos)))
            .collect();
        Self {
            products: Arc::new(batch.products),
            stats: Arc::new(batch.stats),
            sales: Arc::new(batch.sales),
            keywords: Arc::new(batch.keywords),
            ctr: Arc::new(batch.ctr),
            previous_positions: Arc::new(previous_positions),
            primary_loaded: true,
            ..self.clone()
        }
    }
}

fn scoped_items<T>(slot: &Option<Arc<ProductScoped<T>>>, id: ProductId) -> &[T] {
    match slot {
        Some(scoped) if scoped.product_id == id => &scoped.items,
        _ => &[],
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Cycle bookkeeping for one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DomainState {
    pub status: DomainStatus,
    pub error: Option<String>,
    /// Product the domain is currently scoped to (per-product domains only).
    pub product_id: Option<ProductId>,
    pub generation: u64,
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewState {
    pub filter: Filter,
    pub selected_product: Option<ProductId>,
    pub snapshot: Arc<Snapshot>,
    pub primary: DomainState,
    pub position_history: DomainState,
    pub competitors: DomainState,
    pub reviews: DomainState,
}

impl ViewState {
    pub fn domain(&self, domain: Domain) -> &DomainState {
        match domain {
            Domain::Primary => &self.primary,
            Domain::PositionHistory => &self.position_history,
            Domain::Competitors => &self.competitors,
            Domain::Reviews => &self.reviews,
        }
    }

    fn domain_mut(&mut self, domain: Domain) -> &mut DomainState {
        match domain {
            Domain::Primary => &mut self.primary,
            Domain::PositionHistory => &mut self.position_history,
            Domain::Competitors => &mut self.competitors,
            Domain::Reviews => &mut self.reviews,
        }
    }

    pub fn is_loading(&self) -> bool {
        [
            &self.primary,
            &self.position_history,
            &self.competitors,
            &self.reviews,
        ]
        .iter()
        .any(|d| d.status == DomainStatus::Loading)
    }

    /// The very first primary load failed and there is nothing to show.
    pub fn is_fatal(&self) -> bool {
        self.primary.status == DomainStatus::Failed && !self.snapshot.primary_loaded
    }

    /// Errors of every failed domain, for display.
    pub fn errors(&self) -> Vec<(Domain, &str)> {
        [Domain::Primary]
            .into_iter()
            .chain(Domain::PER_PRODUCT)
            .filter_map(|d| self.domain(d).error.as_deref().map(|e| (d, e)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Owns the filter, the snapshot and the per-domain status.
pub struct Dashboard<S> {
    orchestrator: Orchestrator<S>,
    state: watch::Sender<Arc<ViewState>>,
}

impl<S: AnalyticsSource> Dashboard<S> {
    pub fn new(source: S, user_id: u64) -> Self {
        Self::with_filter(source, user_id, Filter::default())
    }

    pub fn with_filter(source: S, user_id: u64, filter: Filter) -> Self {
        let initial = ViewState {
            filter,
            ..ViewState::default()
        };
        let (state, _) = watch::channel(Arc::new(initial));
        Self {
            orchestrator: Orchestrator::new(source, user_id),
            state,
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator<S> {
        &self.orchestrator
    }

    /// Current view state.
    pub fn state(&self) -> Arc<ViewState> {
        self.state.borrow().clone()
    }

    /// Current immutable snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.state.borrow().snapshot.clone()
    }

    pub fn filter(&self) -> Filter {
        self.state.borrow().filter
    }

    /// Receive every published view state.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewState>> {
        self.state.subscribe()
    }

    /// Switch to `filter` and run a primary cycle for it.
    ///
    /// Results of any earlier cycle still in flight will be discarded.
    pub async fn apply_filter(&self, filter: Filter) -> CycleOutcome {
        let mut token = CycleToken::unstarted(Domain::Primary);
        self.state.send_modify(|current| {
            // Begin under the write lock so generation order matches publish order.
            token = self.orchestrator.begin(Domain::Primary);
            let mut next = (**current).clone();
            next.filter = filter;
            mark_loading(next.domain_mut(Domain::Primary), token, None);
            *current = Arc::new(next);
        });

        let result = self.orchestrator.fetch_primary(&filter).await;
        self.commit(token, None, result, |snapshot, batch| snapshot.with_primary(batch))
    }

    /// Re-run the primary cycle with the current filter.
    pub async fn refresh(&self) -> CycleOutcome {
        self.apply_filter(self.filter()).await
    }

    /// Select a product and load its per-product domains.
    ///
    /// Position history, competitors and reviews are fetched concurrently and
    /// each commits as soon as its own request settles.
    pub async fn select_product(&self, product_id: ProductId) -> [(Domain, CycleOutcome); 3] {
        let mut tokens = Domain::PER_PRODUCT.map(CycleToken::unstarted);
        let mut window_days = 0;
        self.state.send_modify(|current| {
            tokens = Domain::PER_PRODUCT.map(|d| self.orchestrator.begin(d));
            let mut next = (**current).clone();
            next.selected_product = Some(product_id);
            for token in tokens {
                mark_loading(next.domain_mut(token.domain), token, Some(product_id));
            }
            window_days = next.filter.window_days;
            *current = Arc::new(next);
        });
        let [positions_token, competitors_token, reviews_token] = tokens;

        let positions = async {
            let result = self
                .orchestrator
                .fetch_position_history(product_id, window_days)
                .await;
            self.commit(positions_token, Some(product_id), result, |snapshot, items| Snapshot {
                position_history: Some(Arc::new(ProductScoped { product_id, items })),
                ..snapshot.clone()
            })
        };
        let competitors = async {
            let result = self.orchestrator.fetch_competitors(product_id).await;
            self.commit(competitors_token, Some(product_id), result, |snapshot, items| Snapshot {
                competitors: Some(Arc::new(ProductScoped { product_id, items })),
                ..snapshot.clone()
            })
        };
        let reviews = async {
            let result = self.orchestrator.fetch_reviews(product_id).await;
            self.commit(reviews_token, Some(product_id), result, |snapshot, items| Snapshot {
                reviews: Some(Arc::new(ProductScoped { product_id, items })),
                ..snapshot.clone()
            })
        };

        let (positions, competitors, reviews) = futures::join!(positions, competitors, reviews);
        [
            (Domain::PositionHistory, positions),
            (Domain::Competitors, competitors),
            (Domain::Reviews, reviews),
        ]
    }

    /// Apply a settled cycle if its token is still current.
    fn commit<T>(
        &self,
        token: CycleToken,
        product_id: Option<ProductId>,
        result: Result<T>,
        apply: impl FnOnce(&Snapshot, T) -> Snapshot,
    ) -> CycleOutcome {
        let mut outcome = CycleOutcome::Superseded;
        self.state.send_if_modified(|current| {
            if !self.orchestrator.is_current(token) {
                return false;
            }
            let mut next = (**current).clone();
            let domain = next.domain_mut(token.domain);
            match result {
                Ok(data) => {
                    domain.status = DomainStatus::Ready;
                    domain.error = None;
                    domain.product_id = product_id;
                    next.snapshot = Arc::new(apply(&*current.snapshot, data));
                    outcome = CycleOutcome::Committed;
                }
                Err(e) => {
                    let message = e.to_string();
                    warn!(
                        "Cycle failed - domain={}, generation={}, error={}",
                        token.domain, token.generation, message
                    );
                    domain.status = DomainStatus::Failed;
                    domain.error = Some(message.clone());
                    outcome = CycleOutcome::Failed(message);
                }
            }
            *current = Arc::new(next);
            true
        });

        if outcome == CycleOutcome::Superseded {
            debug!(
                "Discarded stale cycle - domain={}, generation={}",
                token.domain, token.generation
            );
        }
        outcome
    }
}

fn mark_loading(domain: &mut DomainState, token: CycleToken, product_id: Option<ProductId>) {
    domain.status = DomainStatus::Loading;
    domain.generation = token.generation;
    if product_id.is_some() {
        domain.product_id = product_id;
    }
}
