//! Relevance ranking of catalog search results.
//!
//! The catalog returns products in no useful order, so results are re-sorted
//! client-side by a small textual heuristic before display.

use crate::catalog::Product;

/// Score awarded when the name equals the query exactly (case-insensitive).
const EXACT_NAME_MATCH: u32 = 5;
/// Score awarded when the query appears inside the name.
const PARTIAL_NAME_MATCH: u32 = 3;
/// Additional score when the query appears in the ingredients text.
const INGREDIENTS_MATCH: u32 = 1;

/// Compute the relevance score of one candidate for a query.
///
/// Missing name or ingredients fields count as empty strings. The comparison
/// is case-insensitive throughout.
pub fn score(query: &str, name: &str, ingredients: &str) -> u32 {
    let query = query.to_lowercase();
    let name = name.to_lowercase();
    let ingredients = ingredients.to_lowercase();

    let mut score = 0;
    if name == query {
        score += EXACT_NAME_MATCH;
    } else if name.contains(&query) {
        score += PARTIAL_NAME_MATCH;
    }
    if ingredients.contains(&query) {
        score += INGREDIENTS_MATCH;
    }
    score
}

/// Order candidates from most to least relevant, in place.
///
/// Descending by score; ties broken by ascending display-name length so
/// shorter names rank first. The sort is stable, so identical inputs always
/// produce the identical ordering.
pub fn rank(query: &str, products: &mut [Product]) {
    products.sort_by_cached_key(|product| {
        let name = product.product_name.as_deref().unwrap_or("");
        let ingredients = product.ingredients_text.as_deref().unwrap_or("");
        (
            std::cmp::Reverse(score(query, name, ingredients)),
            name.len(),
        )
    });
}
