//! Query-string builder for the analytics service's single endpoint.
//!
//! Every request is a GET against one URL with an `action` discriminator and a
//! handful of action-specific parameters. Parameters keep insertion order and
//! optional ones are simply skipped. Builder methods return `&mut Self` for
//! chaining.
//!
//! # Example
//!
//! ```rust
//! use market_analytics_sdk::query::{Action, QueryBuilder};
//! let params = QueryBuilder::new(Action::SalesHistory)
//!     .param("user_id", 1)
//!     .param("days", 30)
//!     .opt_param("product_id", None::<u64>)
//!     .build();
//! assert_eq!(params[0], ("action".to_string(), "sales-history".to_string()));
//! ```

use std::fmt;

use crate::error::{AnalyticsError, Result};

/// The `action` values the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Products,
    Stats,
    SalesHistory,
    PositionHistory,
    Competitors,
    Keywords,
    Reviews,
    CtrMetrics,
    Notifications,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Products => "products",
            Action::Stats => "stats",
            Action::SalesHistory => "sales-history",
            Action::PositionHistory => "position-history",
            Action::Competitors => "competitors",
            Action::Keywords => "keywords",
            Action::Reviews => "reviews",
            Action::CtrMetrics => "ctr-metrics",
            Action::Notifications => "notifications",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the ordered `(name, value)` pairs for one request.
pub struct QueryBuilder {
    action: Action,
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Create a builder for the given action.
    pub fn new(action: Action) -> Self {
        Self {
            action,
            params: Vec::new(),
        }
    }

    /// Append a parameter. A repeated name replaces the earlier value in place.
    pub fn param<V: ToString>(&mut self, name: &str, value: V) -> &mut Self {
        let value = value.to_string();
        match self.params.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value,
            None => self.params.push((name.to_string(), value)),
        }
        self
    }

    /// Append a parameter only when a value is present.
    pub fn opt_param<V: ToString>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            self.param(name, v);
        }
        self
    }

    /// Append the `days` window, rejecting an empty window.
    pub fn window(&mut self, days: u32) -> Result<&mut Self> {
        if days == 0 {
            return Err(AnalyticsError::InvalidArgument(
                "window must cover at least one day".into(),
            ));
        }
        Ok(self.param("days", days))
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Build the final parameter list, `action` first.
    pub fn build(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.params.len() + 1);
        out.push(("action".to_string(), self.action.as_str().to_string()));
        out.extend(self.params.iter().cloned());
        out
    }
}
