use std::fmt;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::analytics::{self, FilterOptions, InventorySummary};
use crate::batch_loader;
use crate::config::DashboardConfig;
use crate::deriver::derive_batches;
use crate::error::LoadError;
use crate::lookup::{BatchIndex, LookupOutcome};
use crate::pipelines::batch_view::BatchViewPipeline;
use crate::query::BatchQuery;
use crate::types::{ProductBatch, RawBatch};
use crate::verification::VerificationRule;
use crate::view_pipeline::{ViewPipeline, ViewResult};

/// A filtered, order-preserving view borrowed from a `Dataset`.
pub type FilteredView<'a> = ViewResult<'a, ProductBatch>;

/// The prepared, immutable batch snapshot every dashboard interaction reads.
///
/// Built once by an explicit call and then shared by reference. Nothing on
/// it takes `&mut self`; picking up new catalog data means preparing a new
/// `Dataset`.
pub struct Dataset {
    batches: Vec<ProductBatch>,
    index: BatchIndex,
    as_of: NaiveDate,
    view: BatchViewPipeline,
}

impl Dataset {
    /// Derive fields for `raw` as of `today` and index the result.
    pub fn prepare(
        raw: Vec<RawBatch>,
        today: NaiveDate,
        config: &DashboardConfig,
        rule: &dyn VerificationRule,
    ) -> Self {
        let batches = derive_batches(raw, today, config, rule);
        Self::from_batches(batches, today)
    }

    /// Wrap batches whose derived fields are already populated.
    pub fn from_batches(batches: Vec<ProductBatch>, as_of: NaiveDate) -> Self {
        let index = BatchIndex::build(&batches);
        Self {
            batches,
            index,
            as_of,
            view: BatchViewPipeline::new(),
        }
    }

    /// Load a catalog from a CSV reader and prepare it.
    pub fn load<R: Read>(
        reader: R,
        today: NaiveDate,
        config: &DashboardConfig,
        rule: &dyn VerificationRule,
    ) -> Result<Self, LoadError> {
        let raw = batch_loader::load_catalog(reader)?;
        Ok(Self::prepare(raw, today, config, rule))
    }

    /// Load a catalog file and prepare it.
    pub fn load_file(
        path: impl AsRef<Path>,
        today: NaiveDate,
        config: &DashboardConfig,
        rule: &dyn VerificationRule,
    ) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let raw = batch_loader::load_catalog_file(path)?;
        log::info!(
            "loaded {} batches from '{}' as of {}",
            raw.len(),
            path.display(),
            today
        );
        Ok(Self::prepare(raw, today, config, rule))
    }

    pub fn records(&self) -> &[ProductBatch] {
        &self.batches
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Reference date the derived fields were computed against.
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Rows satisfying every active predicate of `query`, in dataset order.
    pub fn filter(&self, query: &BatchQuery) -> FilteredView<'_> {
        self.view.execute(query, &self.batches)
    }

    /// Exact batch-number match against the full dataset.
    pub fn get(&self, batch_number: &str) -> Option<&ProductBatch> {
        self.index
            .position(batch_number)
            .and_then(|i| self.batches.get(i))
    }

    pub fn lookup(&self, batch_number: &str) -> LookupOutcome {
        let outcome = LookupOutcome::resolve(batch_number, self.get(batch_number));
        log::debug!("lookup '{}' -> {}", batch_number, outcome_name(&outcome));
        outcome
    }

    /// Headline metrics over the full, unfiltered dataset.
    pub fn summary(&self) -> InventorySummary {
        analytics::inventory_summary(&self.batches)
    }

    pub fn options(&self) -> FilterOptions {
        analytics::filter_options(&self.batches)
    }
}

impl fmt::Debug for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("batches", &self.batches.len())
            .field("as_of", &self.as_of)
            .finish_non_exhaustive()
    }
}

fn outcome_name(outcome: &LookupOutcome) -> &'static str {
    match outcome {
        LookupOutcome::NotFound { .. } => "not_found",
        LookupOutcome::Verified(_) => "verified",
        LookupOutcome::VerificationFailed(_) => "verification_failed",
    }
}
