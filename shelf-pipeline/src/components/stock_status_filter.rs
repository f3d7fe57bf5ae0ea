use crate::filter::{Filter, FilterResult};
use crate::query::BatchQuery;
use crate::types::ProductBatch;

/// Keeps batches whose status label matches the selection exactly.
///
/// Matching is on the label text, so statuses outside the three well-known
/// ones can still be selected.
pub struct StockStatusFilter;

impl Filter<BatchQuery, ProductBatch> for StockStatusFilter {
    fn enable(&self, query: &BatchQuery) -> bool {
        !query.stock_status.is_all()
    }

    fn filter<'a>(
        &self,
        query: &BatchQuery,
        candidates: Vec<&'a ProductBatch>,
    ) -> FilterResult<&'a ProductBatch> {
        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|b| query.stock_status.admits(b.batch_status.label()));

        FilterResult { kept, removed }
    }
}
