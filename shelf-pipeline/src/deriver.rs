//! Derived per-batch fields.
//!
//! Everything here is a pure function of the raw row, the reference date and
//! the configuration. The reference date is always passed in, never read
//! from the clock.

use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::types::{ExpiryStatus, ProductBatch, RawBatch};
use crate::verification::VerificationRule;

/// Whole days from `today` until `expiry`. Negative once the batch expired.
pub fn days_until_expiry(expiry: NaiveDate, today: NaiveDate) -> i64 {
    (expiry - today).num_days()
}

/// Compute the derived fields of a single row.
pub fn derive_batch(
    raw: RawBatch,
    today: NaiveDate,
    config: &DashboardConfig,
    rule: &dyn VerificationRule,
) -> ProductBatch {
    let days = days_until_expiry(raw.expiry_date, today);
    let blockchain_verified = rule.is_verified(&raw);

    ProductBatch {
        manufacturing_address: raw
            .manufacturing_address
            .unwrap_or_else(|| config.default_manufacturing_address.clone()),
        batch_number: raw.batch_number,
        product_name: raw.product_name,
        category: raw.category,
        manufacturer: raw.manufacturer,
        retailer_name: raw.retailer_name,
        organic_certifications: raw.organic_certifications,
        quantity: raw.quantity,
        mrp: raw.mrp,
        current_stock: raw.current_stock,
        shelf_life_months: raw.shelf_life_months,
        manufacture_date: raw.manufacture_date,
        manufacture_time: raw.manufacture_time,
        expiry_date: raw.expiry_date,
        arrival_date_at_retailer: raw.arrival_date_at_retailer,
        batch_status: raw.batch_status,
        days_until_expiry: days,
        expiry_status: ExpiryStatus::from_days(days, config.near_expiry_days),
        blockchain_verified,
    }
}

/// Compute derived fields for every row, preserving order.
pub fn derive_batches(
    raw: Vec<RawBatch>,
    today: NaiveDate,
    config: &DashboardConfig,
    rule: &dyn VerificationRule,
) -> Vec<ProductBatch> {
    log::debug!(
        "deriving {} batches as of {} using {}",
        raw.len(),
        today,
        rule.name()
    );
    raw.into_iter()
        .map(|batch| derive_batch(batch, today, config, rule))
        .collect()
}
