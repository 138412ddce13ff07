use super::query::budget_bound;
use super::{apply, ListQuery, ListView, Listable, SortKey};

/// Criteria held by a list screen between renders.
///
/// Any change to search, filters, sort or budget sends the user back to the
/// first page; moving between pages leaves everything else alone.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<F> {
    query: ListQuery<F>,
}

impl<F: Copy + Eq> Default for ListState<F> {
    fn default() -> Self {
        Self {
            query: ListQuery::new(),
        }
    }
}

impl<F: Copy + Eq> ListState<F> {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: ListQuery::new().page_size(page_size),
        }
    }

    pub fn query(&self) -> &ListQuery<F> {
        &self.query
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.query.search {
            self.query.search = term;
            self.query.page = 1;
        }
    }

    pub fn set_filter(&mut self, facet: F, value: impl Into<String>) {
        let value = value.into();
        if self.query.filter_value(facet) != Some(value.as_str()) {
            self.query.set_filter(facet, value);
            self.query.page = 1;
        }
    }

    pub fn set_sort(&mut self, key: SortKey) {
        if key != self.query.sort {
            self.query.sort = key;
            self.query.page = 1;
        }
    }

    /// Replaces both bounds. Blank text clears a bound.
    pub fn set_budget(&mut self, min: Option<String>, max: Option<String>) {
        let min = budget_bound(min.as_deref());
        let max = budget_bound(max.as_deref());
        if min != self.query.min_budget || max != self.query.max_budget {
            self.query.min_budget = min;
            self.query.max_budget = max;
            self.query.page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page;
    }

    /// Derives the visible slice and remembers the clamped page.
    pub fn render<T>(&mut self, items: &[T]) -> ListView<T>
    where
        T: Listable<Facet = F> + Clone,
    {
        let view = apply(items, &self.query);
        self.query.page = view.page;
        view
    }
}
