use std::collections::HashMap;

use super::{ListQuery, ListState, Listable, SortKey};
use crate::error::{AppError, AppResult};

/// List criteria as they arrive in a query string.
///
/// Facet parameters are matched against [`Listable::FACETS`]; unknown keys
/// are ignored. A budget key sent empty (`max_budget=`) is kept as
/// `Some("")` so it can clear a remembered bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewParams {
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    pub min_budget: Option<String>,
    pub max_budget: Option<String>,
    pub page: Option<usize>,
    pub facets: Vec<(String, String)>,
}

impl ViewParams {
    pub fn from_query(mut raw: HashMap<String, String>) -> AppResult<Self> {
        let sort = raw
            .remove("sort")
            .map(|s| s.parse::<SortKey>())
            .transpose()
            .map_err(AppError::BadRequest)?;
        let page = raw
            .remove("page")
            .map(|p| p.trim().parse::<usize>())
            .transpose()
            .map_err(|_| AppError::BadRequest("page must be a positive number".to_string()))?;

        let mut facets: Vec<(String, String)> = raw
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "search" | "min_budget" | "max_budget"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        facets.sort();

        Ok(Self {
            search: raw.remove("search"),
            sort,
            min_budget: raw.remove("min_budget"),
            max_budget: raw.remove("max_budget"),
            page,
            facets,
        })
    }

    fn facets_for<T: Listable>(&self) -> impl Iterator<Item = (T::Facet, &str)> {
        self.facets.iter().filter_map(|(key, value)| {
            T::FACETS
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, facet)| (*facet, value.as_str()))
        })
    }

    /// One-shot query for screens that keep no state between requests.
    pub fn to_query<T: Listable>(&self, page_size: usize) -> ListQuery<T::Facet> {
        let mut query = ListQuery::new()
            .search(self.search.clone().unwrap_or_default())
            .sort(self.sort.unwrap_or_default())
            .budget(self.min_budget.as_deref(), self.max_budget.as_deref())
            .page(self.page.unwrap_or(1))
            .page_size(page_size);
        for (facet, value) in self.facets_for::<T>() {
            query.set_filter(facet, value);
        }
        query
    }

    /// Feeds the parameters into a stateful list.
    ///
    /// A requested page is honoured only when no other criterion changed, so
    /// editing the search box always lands on page one.
    pub fn apply_to<T: Listable>(&self, state: &mut ListState<T::Facet>) {
        let before = state.query().clone();

        if let Some(search) = &self.search {
            state.set_search(search.clone());
        }
        if let Some(sort) = self.sort {
            state.set_sort(sort);
        }
        // An absent key keeps its bound; an empty one clears it.
        if self.min_budget.is_some() || self.max_budget.is_some() {
            let current = state.query();
            let min = self.min_budget.clone().or_else(|| current.min_budget.clone());
            let max = self.max_budget.clone().or_else(|| current.max_budget.clone());
            state.set_budget(min, max);
        }
        for (facet, value) in self.facets_for::<T>() {
            state.set_filter(facet, value);
        }

        let criteria_changed = {
            let after = state.query();
            after.search != before.search
                || after.sort != before.sort
                || after.filters != before.filters
                || after.min_budget != before.min_budget
                || after.max_budget != before.max_budget
        };
        if let Some(page) = self.page {
            if !criteria_changed {
                state.set_page(page);
            }
        }
    }
}
