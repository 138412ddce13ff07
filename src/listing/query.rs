use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Filter value that disables a facet.
pub const ALL: &str = "all";

pub const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Default,
    LowToHigh,
    HighToLow,
    TopRated,
    Newest,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "default" => Ok(SortKey::Default),
            "low-to-high" => Ok(SortKey::LowToHigh),
            "high-to-low" => Ok(SortKey::HighToLow),
            "top-rated" => Ok(SortKey::TopRated),
            "newest" => Ok(SortKey::Newest),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetFilter<F> {
    pub facet: F,
    pub value: String,
}

impl<F> FacetFilter<F> {
    pub fn is_wildcard(&self) -> bool {
        let value = self.value.trim();
        value.is_empty() || value.eq_ignore_ascii_case(ALL)
    }
}

/// Everything that decides which slice of a collection is visible.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F> {
    pub search: String,
    pub filters: Vec<FacetFilter<F>>,
    pub sort: SortKey,
    pub min_budget: Option<String>,
    pub max_budget: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

impl<F> Default for ListQuery<F> {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: Vec::new(),
            sort: SortKey::Default,
            min_budget: None,
            max_budget: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl<F: Copy + Eq> ListQuery<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Sets the value for `facet`, replacing an earlier one.
    pub fn filter(mut self, facet: F, value: impl Into<String>) -> Self {
        self.set_filter(facet, value);
        self
    }

    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort = key;
        self
    }

    pub fn budget(mut self, min: Option<&str>, max: Option<&str>) -> Self {
        self.min_budget = budget_bound(min);
        self.max_budget = budget_bound(max);
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub(crate) fn set_filter(&mut self, facet: F, value: impl Into<String>) {
        let value = value.into();
        match self.filters.iter_mut().find(|f| f.facet == facet) {
            Some(existing) => existing.value = value,
            None => self.filters.push(FacetFilter { facet, value }),
        }
    }

    pub fn filter_value(&self, facet: F) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.facet == facet)
            .map(|f| f.value.as_str())
    }
}

/// A blank bound means no bound.
pub(crate) fn budget_bound(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("low-to-high".parse(), Ok(SortKey::LowToHigh));
        assert_eq!("".parse(), Ok(SortKey::Default));
        assert!("cheapest".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_filter_replaces_previous_value() {
        let query = ListQuery::new().filter(1u8, "hotel").filter(1u8, "activity");
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filter_value(1), Some("activity"));
    }

    #[test]
    fn test_wildcard_detection() {
        let filter = FacetFilter { facet: 0u8, value: "All".to_string() };
        assert!(filter.is_wildcard());
        let filter = FacetFilter { facet: 0u8, value: "pending".to_string() };
        assert!(!filter.is_wildcard());
    }
}
