pub mod aggregate;
pub mod competitor;
pub mod history;
pub mod keyword;
pub mod notification;
pub mod product;
pub mod review;
pub mod wire;

pub use aggregate::*;
pub use competitor::*;
pub use history::*;
pub use keyword::*;
pub use notification::*;
pub use product::*;
pub use review::*;

use chrono::NaiveDate;
use std::collections::HashSet;

/// Records identified by a numeric id.
pub trait Keyed {
    fn key(&self) -> u64;
}

/// Time-series records bucketed by calendar day.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// Drop records whose id was already seen, keeping the first occurrence and
/// the service's order.
pub fn dedup_by_key<T: Keyed>(items: Vec<T>, category: &str) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    let before = items.len();
    let kept: Vec<T> = items.into_iter().filter(|item| seen.insert(item.key())).collect();
    if kept.len() != before {
        tracing::warn!(
            "Dropped duplicate ids - category={}, removed={}, retained={}",
            category,
            before - kept.len(),
            kept.len()
        );
    }
    kept
}

/// Stable sort into date-ascending order.
pub fn sort_by_date<T: Dated>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by_key(Dated::date);
    items
}
