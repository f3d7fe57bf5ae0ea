//! Batch verification lookup.
//!
//! A lookup resolves one batch number against the full, unfiltered dataset
//! and reports one of three outcomes. A failed verification deliberately
//! carries only the fields needed to explain the failure.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::types::ProductBatch;

/// Shown to the user when a batch exists but is not verified.
pub const VERIFICATION_FAILURE_REASON: &str = "Blockchain record not found or tampered with";

/// Everything shown for a successfully verified batch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VerifiedDetail {
    pub batch_number: String,
    pub product_name: String,
    pub category: String,
    pub quantity: i64,
    pub mrp: f64,
    pub shelf_life_months: f64,
    pub manufacturer: String,
    pub manufacturing_address: String,
    pub manufacture_date: NaiveDate,
    pub manufacture_time: Option<NaiveTime>,
    pub expiry_date: NaiveDate,
    pub retailer_name: String,
    pub organic_certifications: String,
}

impl VerifiedDetail {
    /// Manufacture timestamp for display; midnight when the catalog gave
    /// only a date.
    pub fn manufactured_at(&self) -> NaiveDateTime {
        self.manufacture_date
            .and_time(self.manufacture_time.unwrap_or_default())
    }
}

impl From<&ProductBatch> for VerifiedDetail {
    fn from(batch: &ProductBatch) -> Self {
        Self {
            batch_number: batch.batch_number.clone(),
            product_name: batch.product_name.clone(),
            category: batch.category.clone(),
            quantity: batch.quantity,
            mrp: batch.mrp,
            shelf_life_months: batch.shelf_life_months,
            manufacturer: batch.manufacturer.clone(),
            manufacturing_address: batch.manufacturing_address.clone(),
            manufacture_date: batch.manufacture_date,
            manufacture_time: batch.manufacture_time,
            expiry_date: batch.expiry_date,
            retailer_name: batch.retailer_name.clone(),
            organic_certifications: batch.organic_certifications.clone(),
        }
    }
}

/// The identifying fields shown when verification fails.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FailedVerification {
    pub product_name: String,
    pub manufacture_date: NaiveDate,
    pub manufacturing_address: String,
    pub reason: &'static str,
}

impl From<&ProductBatch> for FailedVerification {
    fn from(batch: &ProductBatch) -> Self {
        Self {
            product_name: batch.product_name.clone(),
            manufacture_date: batch.manufacture_date,
            manufacturing_address: batch.manufacturing_address.clone(),
            reason: VERIFICATION_FAILURE_REASON,
        }
    }
}

/// Outcome of looking up a batch number.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LookupOutcome {
    NotFound { batch_number: String },
    Verified(VerifiedDetail),
    VerificationFailed(FailedVerification),
}

impl LookupOutcome {
    /// Classify a lookup hit (or miss) for `batch_number`.
    pub fn resolve(batch_number: &str, hit: Option<&ProductBatch>) -> Self {
        match hit {
            None => LookupOutcome::NotFound {
                batch_number: batch_number.to_string(),
            },
            Some(batch) if batch.blockchain_verified => LookupOutcome::Verified(batch.into()),
            Some(batch) => LookupOutcome::VerificationFailed(batch.into()),
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, LookupOutcome::Verified(_))
    }
}

/// Exact-match index from batch number to position in the dataset.
#[derive(Clone, Debug, Default)]
pub struct BatchIndex {
    positions: HashMap<String, usize>,
}

impl BatchIndex {
    /// Index `batches` by batch number. When a batch number repeats, the
    /// first row wins and later rows are only reachable by filtering.
    pub fn build(batches: &[ProductBatch]) -> Self {
        let mut positions = HashMap::with_capacity(batches.len());
        for (i, batch) in batches.iter().enumerate() {
            if positions.contains_key(&batch.batch_number) {
                log::warn!(
                    "duplicate batch number '{}' at row {}, keeping the first occurrence",
                    batch.batch_number,
                    i + 1
                );
                continue;
            }
            positions.insert(batch.batch_number.clone(), i);
        }
        Self { positions }
    }

    pub fn position(&self, batch_number: &str) -> Option<usize> {
        self.positions.get(batch_number).copied()
    }
}
