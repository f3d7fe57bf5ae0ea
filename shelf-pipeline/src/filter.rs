use crate::util;

/// Result of a filter operation, partitioning candidates into kept and removed.
pub struct FilterResult<C> {
    pub kept: Vec<C>,
    pub removed: Vec<C>,
}

/// Filters run sequentially and partition candidates into kept and removed sets.
///
/// Candidates are borrowed from the dataset; filters never clone or mutate
/// the records they inspect.
pub trait Filter<Q, C>: Send + Sync {
    /// Decide if this filter should run for the given query.
    ///
    /// A filter whose predicate is unset for the query returns `false` and
    /// imposes no constraint.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Filter candidates by evaluating each against some criteria.
    /// Kept candidates continue to the next filter in their original order.
    fn filter<'a>(&self, query: &Q, candidates: Vec<&'a C>) -> FilterResult<&'a C>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
