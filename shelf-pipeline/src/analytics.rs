//! Dashboard aggregates.
//!
//! Headline metrics are computed over the whole dataset; chart series and
//! table rows over whatever view the caller passes in. None of these
//! functions render anything, they only shape data for a chart or table
//! widget.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::query::ALL;
use crate::types::{ExpiryStatus, ProductBatch, StockStatus};
use crate::util::distinct_in_order;

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InventorySummary {
    /// Distinct product names.
    pub total_products: usize,
    pub categories: usize,
    pub retailers: usize,
    /// Mean shelf life in months; 0 for an empty dataset.
    pub avg_shelf_life_months: f64,
    pub total_batches: usize,
}

pub fn inventory_summary<'a, I>(batches: I) -> InventorySummary
where
    I: IntoIterator<Item = &'a ProductBatch>,
{
    let mut products = HashSet::new();
    let mut categories = HashSet::new();
    let mut retailers = HashSet::new();
    let mut shelf_life_total = 0.0;
    let mut total_batches = 0;

    for batch in batches {
        products.insert(batch.product_name.as_str());
        categories.insert(batch.category.as_str());
        retailers.insert(batch.retailer_name.as_str());
        shelf_life_total += batch.shelf_life_months;
        total_batches += 1;
    }

    InventorySummary {
        total_products: products.len(),
        categories: categories.len(),
        retailers: retailers.len(),
        avg_shelf_life_months: if total_batches == 0 {
            0.0
        } else {
            shelf_life_total / total_batches as f64
        },
        total_batches,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExpiryBreakdown {
    pub expired: usize,
    pub near_expiry: usize,
    pub good: usize,
}

pub fn expiry_breakdown<'a, I>(batches: I) -> ExpiryBreakdown
where
    I: IntoIterator<Item = &'a ProductBatch>,
{
    let mut breakdown = ExpiryBreakdown::default();
    for batch in batches {
        match batch.expiry_status {
            ExpiryStatus::Expired => breakdown.expired += 1,
            ExpiryStatus::NearExpiry => breakdown.near_expiry += 1,
            ExpiryStatus::Good => breakdown.good += 1,
        }
    }
    breakdown
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

/// One slice of the category pie chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: usize,
}

/// Batch count per category, categories in first-seen order.
pub fn category_distribution(batches: &[&ProductBatch]) -> Vec<CategoryShare> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for batch in batches {
        *counts.entry(batch.category.as_str()).or_insert(0) += 1;
    }
    distinct_in_order(batches.iter().map(|b| b.category.as_str()))
        .into_iter()
        .map(|category| CategoryShare {
            category: category.to_string(),
            count: counts.get(category).copied().unwrap_or(0),
        })
        .collect()
}

/// One bar segment of the stock-status-by-retailer chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RetailerStatusCount {
    pub retailer: String,
    pub batch_status: StockStatus,
    pub count: usize,
}

/// Batch count per (retailer, status), sorted by retailer then status.
pub fn stock_status_by_retailer(batches: &[&ProductBatch]) -> Vec<RetailerStatusCount> {
    let mut counts: BTreeMap<(&str, &StockStatus), usize> = BTreeMap::new();
    for batch in batches {
        *counts
            .entry((batch.retailer_name.as_str(), &batch.batch_status))
            .or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|((retailer, status), count)| RetailerStatusCount {
            retailer: retailer.to_string(),
            batch_status: status.clone(),
            count,
        })
        .collect()
}

/// Box-plot statistics of MRP within one category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PriceBox {
    pub category: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// MRP box statistics per category, categories in first-seen order.
pub fn price_distribution(batches: &[&ProductBatch]) -> Vec<PriceBox> {
    let mut prices: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for batch in batches {
        prices
            .entry(batch.category.as_str())
            .or_default()
            .push(batch.mrp);
    }

    distinct_in_order(batches.iter().map(|b| b.category.as_str()))
        .into_iter()
        .filter_map(|category| {
            let mut values = prices.remove(category)?;
            values.sort_by(f64::total_cmp);
            Some(PriceBox {
                category: category.to_string(),
                count: values.len(),
                min: values[0],
                q1: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q3: quantile(&values, 0.75),
                max: values[values.len() - 1],
            })
        })
        .collect()
}

/// Linear-interpolation quantile of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Table and selector options
// ---------------------------------------------------------------------------

/// One row of the product details table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableRow {
    pub product_name: String,
    pub category: String,
    pub quantity: i64,
    pub mrp: f64,
    pub retailer_name: String,
    pub current_stock: i64,
    pub batch_status: StockStatus,
    pub blockchain_verified: bool,
}

impl From<&ProductBatch> for TableRow {
    fn from(batch: &ProductBatch) -> Self {
        Self {
            product_name: batch.product_name.clone(),
            category: batch.category.clone(),
            quantity: batch.quantity,
            mrp: batch.mrp,
            retailer_name: batch.retailer_name.clone(),
            current_stock: batch.current_stock,
            batch_status: batch.batch_status.clone(),
            blockchain_verified: batch.blockchain_verified,
        }
    }
}

pub fn table_rows(batches: &[&ProductBatch]) -> Vec<TableRow> {
    batches.iter().map(|b| TableRow::from(*b)).collect()
}

/// Values offered by the filter selectors, each led by the "All" sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub retailers: Vec<String>,
    pub stock_statuses: Vec<String>,
}

pub fn filter_options(batches: &[ProductBatch]) -> FilterOptions {
    let with_all = |values: Vec<&str>| {
        std::iter::once(ALL)
            .chain(values)
            .map(str::to_string)
            .collect::<Vec<_>>()
    };

    FilterOptions {
        categories: with_all(distinct_in_order(batches.iter().map(|b| b.category.as_str()))),
        retailers: with_all(distinct_in_order(
            batches.iter().map(|b| b.retailer_name.as_str()),
        )),
        stock_statuses: with_all(StockStatus::KNOWN.iter().map(|s| s.label()).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantiles_interpolate_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert!((quantile(&values, 0.0) - 1.0).abs() < 1e-9);
        assert!((quantile(&values, 0.25) - 1.75).abs() < 1e-9);
        assert!((quantile(&values, 0.5) - 2.5).abs() < 1e-9);
        assert!((quantile(&values, 1.0) - 4.0).abs() < 1e-9);
        assert!((quantile(&[7.0], 0.75) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn empty_summary_has_zero_average() {
        let summary = inventory_summary(std::iter::empty());
        assert_eq!(summary.total_batches, 0);
        assert_eq!(summary.avg_shelf_life_months, 0.0);
    }
}
