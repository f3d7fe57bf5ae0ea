use crate::filter::{Filter, FilterResult};
use crate::query::BatchQuery;
use crate::types::ProductBatch;

/// Keeps batches in exactly the selected category.
pub struct CategoryFilter;

impl Filter<BatchQuery, ProductBatch> for CategoryFilter {
    fn enable(&self, query: &BatchQuery) -> bool {
        !query.category.is_all()
    }

    fn filter<'a>(
        &self,
        query: &BatchQuery,
        candidates: Vec<&'a ProductBatch>,
    ) -> FilterResult<&'a ProductBatch> {
        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|b| query.category.admits(&b.category));

        FilterResult { kept, removed }
    }
}
