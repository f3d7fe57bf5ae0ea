use crate::components::category_filter::CategoryFilter;
use crate::components::retailer_filter::RetailerFilter;
use crate::components::search_text_filter::SearchTextFilter;
use crate::components::stock_status_filter::StockStatusFilter;
use crate::filter::Filter;
use crate::query::BatchQuery;
use crate::types::ProductBatch;
use crate::view_pipeline::ViewPipeline;

/// The dashboard's filter chain.
///
/// Pipeline flow:
/// 1. SearchTextFilter keeps product names containing the search text
/// 2. CategoryFilter keeps the selected category
/// 3. RetailerFilter keeps the selected retailer
/// 4. StockStatusFilter keeps the selected batch status
///
/// Every filter is a plain predicate, so the order only affects how many
/// rows later filters have to look at, never the result.
pub struct BatchViewPipeline {
    filters: Vec<Box<dyn Filter<BatchQuery, ProductBatch>>>,
}

impl BatchViewPipeline {
    pub fn new() -> Self {
        Self::with_filters(vec![
            Box::new(SearchTextFilter),
            Box::new(CategoryFilter),
            Box::new(RetailerFilter),
            Box::new(StockStatusFilter),
        ])
    }

    /// Build a pipeline from a custom filter chain.
    pub fn with_filters(filters: Vec<Box<dyn Filter<BatchQuery, ProductBatch>>>) -> Self {
        Self { filters }
    }
}

impl Default for BatchViewPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewPipeline<BatchQuery, ProductBatch> for BatchViewPipeline {
    fn filters(&self) -> &[Box<dyn Filter<BatchQuery, ProductBatch>>] {
        &self.filters
    }
}
