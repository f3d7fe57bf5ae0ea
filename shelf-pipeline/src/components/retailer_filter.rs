use crate::filter::{Filter, FilterResult};
use crate::query::BatchQuery;
use crate::types::ProductBatch;

/// Keeps batches held by exactly the selected retailer.
pub struct RetailerFilter;

impl Filter<BatchQuery, ProductBatch> for RetailerFilter {
    fn enable(&self, query: &BatchQuery) -> bool {
        !query.retailer.is_all()
    }

    fn filter<'a>(
        &self,
        query: &BatchQuery,
        candidates: Vec<&'a ProductBatch>,
    ) -> FilterResult<&'a ProductBatch> {
        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|b| query.retailer.admits(&b.retailer_name));

        FilterResult { kept, removed }
    }
}
