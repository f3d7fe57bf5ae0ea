use crate::filter::{Filter, FilterResult};
use crate::query::BatchQuery;
use crate::types::ProductBatch;

/// Keeps batches whose product name contains the search text, ignoring case.
pub struct SearchTextFilter;

impl Filter<BatchQuery, ProductBatch> for SearchTextFilter {
    fn enable(&self, query: &BatchQuery) -> bool {
        query.search_needle().is_some()
    }

    fn filter<'a>(
        &self,
        query: &BatchQuery,
        candidates: Vec<&'a ProductBatch>,
    ) -> FilterResult<&'a ProductBatch> {
        let Some(needle) = query.search_needle() else {
            return FilterResult {
                kept: candidates,
                removed: Vec::new(),
            };
        };

        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|b| b.product_name.to_lowercase().contains(&needle));

        FilterResult { kept, removed }
    }
}
