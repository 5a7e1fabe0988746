//! Discovery Filter Pipeline
//!
//! Transforms the static catalog plus a [`QueryState`] into an ordered
//! display list. Composition order is fixed: search -> filter -> sort.
//! Every run starts from the full catalog, so filter changes are never
//! cumulative.

use shared::models::Product;
use shared::query::{QueryState, SortKey, StatusFilter};

/// Sold-count threshold for the best-seller badge
pub const BEST_SELLER_MIN_SOLD: i64 = 100;
/// Sold-count ceiling for the "new" badge
pub const NEW_MAX_SOLD: i64 = 50;

/// Case-insensitive substring search over name, category, description and tags
///
/// An empty or blank term returns the full catalog unchanged.
pub fn search(catalog: &[Product], term: &str) -> Vec<Product> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return catalog.to_vec();
    }
    catalog
        .iter()
        .filter(|p| matches_term(p, &term))
        .cloned()
        .collect()
}

fn matches_term(product: &Product, term_lower: &str) -> bool {
    let haystack = format!(
        "{} {} {} {}",
        product.name,
        product.category,
        product.description,
        product.tags.as_deref().unwrap_or("")
    )
    .to_lowercase();
    haystack.contains(term_lower)
}

/// Check a product against one status predicate
pub fn matches_status(product: &Product, status: StatusFilter) -> bool {
    match status {
        StatusFilter::BestSeller => product.sold >= BEST_SELLER_MIN_SOLD,
        StatusFilter::New => product.sold <= NEW_MAX_SOLD,
        StatusFilter::Discount => product.discount > 0,
    }
}

fn matches_filters(product: &Product, query: &QueryState) -> bool {
    // empty category set = no restriction
    if !query.categories.is_empty() && !query.categories.contains(&product.category) {
        return false;
    }
    if let Some(min) = query.price_min
        && product.price < min
    {
        return false;
    }
    if let Some(max) = query.price_max
        && product.price > max
    {
        return false;
    }
    if let Some(min_rating) = query.min_rating
        && product.rating < min_rating
    {
        return false;
    }
    // every selected status must hold
    query
        .statuses
        .iter()
        .all(|status| matches_status(product, *status))
}

/// AND-composition of the query's filter predicates
pub fn apply_filters(list: Vec<Product>, query: &QueryState) -> Vec<Product> {
    list.into_iter()
        .filter(|p| matches_filters(p, query))
        .collect()
}

/// Order a working list by the given key
///
/// All orderings are stable, so equal elements keep their relative order.
/// `Relevance` preserves the incoming (search) order.
pub fn sort(list: &mut [Product], key: SortKey) {
    match key {
        SortKey::Relevance => {}
        SortKey::PriceAsc => list.sort_by_key(|p| p.price),
        SortKey::PriceDesc => list.sort_by_key(|p| std::cmp::Reverse(p.price)),
        SortKey::RatingDesc => {
            list.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal))
        }
        SortKey::SoldDesc => list.sort_by_key(|p| std::cmp::Reverse(p.sold)),
        SortKey::NameAsc => list.sort_by_key(|p| p.name.to_lowercase()),
    }
}

/// Run the full pipeline: search -> filter -> sort
pub fn run(catalog: &[Product], query: &QueryState) -> Vec<Product> {
    let found = search(catalog, &query.search_term);
    let mut filtered = apply_filters(found, query);
    sort(&mut filtered, query.sort);
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(id: i64, name: &str, price: i64, rating: f64, sold: i64, discount: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            category: "Minuman".to_string(),
            description: String::new(),
            price,
            rating,
            sold,
            discount,
            image: String::new(),
            tags: None,
        }
    }

    fn sample_catalog() -> Vec<Product> {
        vec![
            make_product(1, "Kopi", 20000, 4.5, 120, 0),
            make_product(2, "Teh", 15000, 3.0, 10, 5000),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = sample_catalog();
        let hits = search(&catalog, "kopi");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn test_search_empty_term_returns_everything() {
        let catalog = sample_catalog();
        assert_eq!(search(&catalog, "").len(), 2);
        assert_eq!(search(&catalog, "   ").len(), 2);
    }

    #[test]
    fn test_search_matches_category_description_and_tags() {
        let mut catalog = sample_catalog();
        catalog[1].description = "teh melati hangat".to_string();
        catalog[1].tags = Some("herbal tradisional".to_string());

        assert_eq!(search(&catalog, "minuman").len(), 2);
        assert_eq!(search(&catalog, "melati").len(), 1);
        assert_eq!(search(&catalog, "herbal")[0].id, 2);
    }

    #[test]
    fn test_status_best_seller() {
        let catalog = sample_catalog();
        let query = QueryState::new().with_status(StatusFilter::BestSeller);
        let hits = apply_filters(catalog, &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn test_status_discount() {
        let catalog = sample_catalog();
        let query = QueryState::new().with_status(StatusFilter::Discount);
        let hits = apply_filters(catalog, &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }

    #[test]
    fn test_multiple_statuses_and_together() {
        let catalog = sample_catalog();
        let query = QueryState::new()
            .with_status(StatusFilter::BestSeller)
            .with_status(StatusFilter::Discount);
        // no product is both a best seller and discounted
        assert!(apply_filters(catalog, &query).is_empty());
    }

    #[test]
    fn test_price_range_bounds_are_inclusive() {
        let catalog = sample_catalog();

        let query = QueryState::new().with_price_range(Some(15000), Some(20000));
        assert_eq!(apply_filters(catalog.clone(), &query).len(), 2);

        let query = QueryState::new().with_price_range(Some(15001), None);
        let hits = apply_filters(catalog.clone(), &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        let query = QueryState::new().with_price_range(None, Some(15000));
        let hits = apply_filters(catalog, &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }

    #[test]
    fn test_min_rating() {
        let catalog = sample_catalog();
        let query = QueryState::new().with_min_rating(4.0);
        let hits = apply_filters(catalog, &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn test_category_filter_empty_set_is_unrestricted() {
        let mut catalog = sample_catalog();
        catalog[0].category = "Makanan".to_string();

        assert_eq!(apply_filters(catalog.clone(), &QueryState::new()).len(), 2);

        let query = QueryState::new().with_category("Makanan");
        let hits = apply_filters(catalog, &query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn test_sort_price_asc_is_stable() {
        let mut list = vec![
            make_product(1, "A", 10000, 4.0, 0, 0),
            make_product(2, "B", 5000, 4.0, 0, 0),
            make_product(3, "C", 10000, 4.0, 0, 0),
        ];
        sort(&mut list, SortKey::PriceAsc);
        let ids: Vec<i64> = list.iter().map(|p| p.id).collect();
        // ids 1 and 3 share a price and keep their relative order
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_name_asc_ignores_case() {
        let mut list = vec![
            make_product(1, "teh", 0, 0.0, 0, 0),
            make_product(2, "Kopi", 0, 0.0, 0, 0),
        ];
        sort(&mut list, SortKey::NameAsc);
        assert_eq!(list[0].id, 2);
    }

    #[test]
    fn test_sort_relevance_is_noop() {
        let mut list = sample_catalog();
        sort(&mut list, SortKey::Relevance);
        assert_eq!(list[0].id, 1);
        assert_eq!(list[1].id, 2);
    }

    #[test]
    fn test_pipeline_always_starts_from_full_catalog() {
        let catalog = sample_catalog();

        let narrow = QueryState::new().with_search("kopi");
        assert_eq!(run(&catalog, &narrow).len(), 1);

        // a later broader query sees the whole catalog again
        let broad = QueryState::new();
        assert_eq!(run(&catalog, &broad).len(), 2);
        // and the caller's catalog was never reordered
        assert_eq!(catalog[0].id, 1);
    }

    #[test]
    fn test_pipeline_search_then_filter_then_sort() {
        let catalog = vec![
            make_product(1, "Kopi Susu", 25000, 4.8, 200, 0),
            make_product(2, "Kopi Hitam", 18000, 4.2, 150, 0),
            make_product(3, "Teh Manis", 12000, 4.0, 300, 0),
        ];
        let query = QueryState::new()
            .with_search("kopi")
            .with_status(StatusFilter::BestSeller)
            .with_sort(SortKey::PriceAsc);

        let result = run(&catalog, &query);
        let ids: Vec<i64> = result.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
