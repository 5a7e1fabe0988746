//! Discovery query types
//!
//! A [`QueryState`] captures one page view's worth of search, filter and
//! sort choices. It is transient: rebuilt from URL query parameters and
//! form controls on every view, never persisted.

use serde::{Deserialize, Serialize};

/// Status predicates selectable in the catalog sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    /// Sold at least 100 units
    BestSeller,
    /// Sold at most 50 units
    New,
    /// Carries a discount
    Discount,
}

impl StatusFilter {
    /// Parse a URL parameter value ("best-seller", "new", "discount")
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "best-seller" => Some(Self::BestSeller),
            "new" => Some(Self::New),
            "discount" => Some(Self::Discount),
            _ => None,
        }
    }
}

/// Supported result orderings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Keep search order (no-op)
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    SoldDesc,
    NameAsc,
}

impl SortKey {
    /// Parse a URL parameter value; unknown values fall back to relevance
    pub fn from_param(value: &str) -> Self {
        match value {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "rating-desc" => Self::RatingDesc,
            "sold-desc" => Self::SoldDesc,
            "name-asc" => Self::NameAsc,
            _ => Self::Relevance,
        }
    }
}

/// One page view's search, filter and sort state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    /// Free-text search term; empty means "no restriction"
    #[serde(default)]
    pub search_term: String,
    /// Category names to keep; empty set means "no restriction"
    #[serde(default)]
    pub categories: Vec<String>,
    /// Inclusive lower price bound
    pub price_min: Option<i64>,
    /// Inclusive upper price bound
    pub price_max: Option<i64>,
    /// Minimum rating (inclusive)
    pub min_rating: Option<f64>,
    /// Selected status predicates; all must hold
    #[serde(default)]
    pub statuses: Vec<StatusFilter>,
    #[serde(default)]
    pub sort: SortKey,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a query state from URL query pairs
    ///
    /// Recognized parameters: `search`, `category` (repeatable),
    /// `min_price`, `max_price`, `rating`, `status` (repeatable), `sort`.
    /// Unparseable values are ignored.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut state = Self::new();
        for (key, value) in pairs {
            match key {
                "search" => state.search_term = value.to_string(),
                "category" => {
                    if !value.is_empty() {
                        state.categories.push(value.to_string());
                    }
                }
                "min_price" => state.price_min = value.parse().ok(),
                "max_price" => state.price_max = value.parse().ok(),
                "rating" => state.min_rating = value.parse().ok(),
                "status" => {
                    if let Some(status) = StatusFilter::from_param(value) {
                        state.statuses.push(status);
                    }
                }
                "sort" => state.sort = SortKey::from_param(value),
                _ => {}
            }
        }
        state
    }

    // ========== Builder-style helpers (tests and direct callers) ==========

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn with_price_range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }

    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.statuses.push(status);
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_pairs() {
        let state = QueryState::from_query_pairs([
            ("search", "kopi"),
            ("category", "Minuman"),
            ("category", "Makanan"),
            ("min_price", "10000"),
            ("max_price", "50000"),
            ("rating", "4"),
            ("status", "best-seller"),
            ("status", "bogus"),
            ("sort", "price-asc"),
            ("utm_source", "ignored"),
        ]);

        assert_eq!(state.search_term, "kopi");
        assert_eq!(state.categories, vec!["Minuman", "Makanan"]);
        assert_eq!(state.price_min, Some(10000));
        assert_eq!(state.price_max, Some(50000));
        assert_eq!(state.min_rating, Some(4.0));
        assert_eq!(state.statuses, vec![StatusFilter::BestSeller]);
        assert_eq!(state.sort, SortKey::PriceAsc);
    }

    #[test]
    fn test_unparseable_values_are_ignored() {
        let state = QueryState::from_query_pairs([("min_price", "abc"), ("rating", "")]);
        assert_eq!(state.price_min, None);
        assert_eq!(state.min_rating, None);
    }

    #[test]
    fn test_sort_key_from_param() {
        assert_eq!(SortKey::from_param("price-desc"), SortKey::PriceDesc);
        assert_eq!(SortKey::from_param("name-asc"), SortKey::NameAsc);
        assert_eq!(SortKey::from_param("whatever"), SortKey::Relevance);
    }

    #[test]
    fn test_status_filter_serde() {
        let json = serde_json::to_string(&StatusFilter::BestSeller).unwrap();
        assert_eq!(json, "\"best-seller\"");
    }
}
