use crate::filter::Filter;

/// Result of running a view pipeline over a dataset.
pub struct ViewResult<'a, C> {
    /// Candidates that passed every enabled filter, in input order.
    pub kept: Vec<&'a C>,
    /// Number of candidates each enabled filter removed, in execution order.
    pub removed_by: Vec<(String, usize)>,
}

impl<C> ViewResult<'_, C> {
    pub fn removed_total(&self) -> usize {
        self.removed_by.iter().map(|(_, n)| n).sum()
    }
}

/// A read-only pipeline that narrows a slice of candidates through a chain
/// of filters. Implementors only wire up the components.
pub trait ViewPipeline<Q, C>: Send + Sync {
    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];

    /// Run every enabled filter in order. Disabled filters are skipped and
    /// do not appear in `removed_by`.
    fn execute<'a>(&self, query: &Q, candidates: &'a [C]) -> ViewResult<'a, C> {
        let mut kept: Vec<&'a C> = candidates.iter().collect();
        let mut removed_by = Vec::new();

        for filter in self.filters().iter().filter(|f| f.enable(query)) {
            let result = filter.filter(query, kept);
            log::debug!(
                "{} kept {} removed {}",
                filter.name(),
                result.kept.len(),
                result.removed.len()
            );
            removed_by.push((filter.name().to_string(), result.removed.len()));
            kept = result.kept;
        }

        ViewResult { kept, removed_by }
    }
}
