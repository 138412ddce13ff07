//! Filtering, sorting and pagination of already-fetched collections.
//!
//! [`apply`] is a pure function of its inputs: the same collection and the
//! same [`ListQuery`] always produce the same [`ListView`], and the source
//! slice is never reordered. [`ListState`] holds the criteria a list screen
//! edits and resets the page whenever anything but the page changes.

mod params;
mod query;
mod state;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::amount::parse_amount;

pub use params::ViewParams;
pub use query::{FacetFilter, ListQuery, SortKey, ALL, DEFAULT_PAGE_SIZE};
pub use state::ListState;

/// A record that can be shown in a filtered list.
pub trait Listable {
    /// Categorical fields that can be filtered on.
    type Facet: Copy + Eq + Send + Sync + 'static;

    /// Query parameter name for each facet.
    const FACETS: &'static [(&'static str, Self::Facet)];

    /// Text fields matched by the search box.
    fn search_fields(&self) -> Vec<&str>;

    /// Lower-cased value of `facet` for this record.
    fn facet_value(&self, facet: Self::Facet) -> String;

    fn price(&self) -> Option<f64> {
        None
    }

    fn rating(&self) -> Option<f64> {
        None
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// The slice of a collection a user should see.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView<T> {
    pub items: Vec<T>,
    pub total_filtered: usize,
    pub total_pages: usize,
    pub page: usize,
}

impl<T> ListView<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListView<U> {
        ListView {
            items: self.items.into_iter().map(f).collect(),
            total_filtered: self.total_filtered,
            total_pages: self.total_pages,
            page: self.page,
        }
    }
}

/// Filters, sorts and paginates `items` according to `query`.
pub fn apply<T>(items: &[T], query: &ListQuery<T::Facet>) -> ListView<T>
where
    T: Listable + Clone,
{
    let needle = query.search.trim().to_lowercase();
    let min_budget = query.min_budget.as_deref().and_then(parse_amount);
    let max_budget = query.max_budget.as_deref().and_then(parse_amount);

    let mut filtered: Vec<&T> = items
        .iter()
        .filter(|item| matches_search(*item, &needle))
        .filter(|item| matches_facets(*item, &query.filters))
        .filter(|item| within_budget(*item, min_budget, max_budget))
        .collect();

    sort(&mut filtered, query.sort);

    let page_size = query.page_size.max(1);
    let total_filtered = filtered.len();
    let total_pages = total_filtered.div_ceil(page_size);
    let page = clamp_page(query.page, total_pages);

    let items = filtered
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    ListView {
        items,
        total_filtered,
        total_pages,
        page,
    }
}

/// Clamps a requested page to `[1, max(1, total_pages)]`.
pub fn clamp_page(requested: usize, total_pages: usize) -> usize {
    requested.clamp(1, total_pages.max(1))
}

fn matches_search<T: Listable>(item: &T, needle: &str) -> bool {
    needle.is_empty()
        || item
            .search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

fn matches_facets<T: Listable>(item: &T, filters: &[FacetFilter<T::Facet>]) -> bool {
    filters
        .iter()
        .filter(|filter| !filter.is_wildcard())
        .all(|filter| item.facet_value(filter.facet) == filter.value.to_lowercase())
}

// Records without a price are only excluded when a bound is active.
fn within_budget<T: Listable>(item: &T, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(price) = item.price() else {
        return false;
    };
    min.is_none_or(|min| price >= min) && max.is_none_or(|max| price <= max)
}

fn sort<T: Listable>(items: &mut [&T], key: SortKey) {
    match key {
        SortKey::Default => {}
        SortKey::LowToHigh => items.sort_by(|a, b| cmp_missing_last(a.price(), b.price(), false)),
        SortKey::HighToLow => items.sort_by(|a, b| cmp_missing_last(a.price(), b.price(), true)),
        SortKey::TopRated => items.sort_by(|a, b| cmp_missing_last(a.rating(), b.rating(), true)),
        SortKey::Newest => items.sort_by(|a, b| match (a.created_at(), b.created_at()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
    }
}

/// Numeric comparison where records lacking a value always sort last.
fn cmp_missing_last(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.total_cmp(&a),
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
