//! Dashboard operations: the complete vocabulary a front end can request.
//!
//! Requests parse into exactly one of these variants or are rejected.
//! Every operation is read-only; none of them can change the dataset.

use serde::{Deserialize, Serialize};
use shelf_pipeline::BatchQuery;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "params")]
pub enum DashboardOperation {
    /// Headline metrics over the full dataset plus its expiry breakdown.
    Summary,

    /// Values for the category, retailer and stock status selectors.
    Options,

    /// Full records matching the query.
    Filter {
        #[serde(default)]
        query: BatchQuery,
    },

    /// Pie, bar and box-plot series for the rows matching the query.
    Charts {
        #[serde(default)]
        query: BatchQuery,
    },

    /// Product details table for the rows matching the query.
    Table {
        #[serde(default)]
        query: BatchQuery,
        /// Maximum rows to return. `None` means the bridge default.
        #[serde(default)]
        limit: Option<usize>,
    },

    /// Verify a single batch by its exact batch number.
    Verify { batch_number: String },
}

impl DashboardOperation {
    /// Variant name, as used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            DashboardOperation::Summary => "Summary",
            DashboardOperation::Options => "Options",
            DashboardOperation::Filter { .. } => "Filter",
            DashboardOperation::Charts { .. } => "Charts",
            DashboardOperation::Table { .. } => "Table",
            DashboardOperation::Verify { .. } => "Verify",
        }
    }

    /// Human-readable description of what this operation does.
    pub fn describe(&self) -> String {
        match self {
            DashboardOperation::Summary => "Inventory summary".into(),
            DashboardOperation::Options => "Filter selector options".into(),
            DashboardOperation::Filter { query } => {
                format!("Filter batches {}", describe_query(query))
            }
            DashboardOperation::Charts { query } => {
                format!("Chart series {}", describe_query(query))
            }
            DashboardOperation::Table { query, limit } => match limit {
                Some(n) => format!("Table (max {n} rows) {}", describe_query(query)),
                None => format!("Table {}", describe_query(query)),
            },
            DashboardOperation::Verify { batch_number } => {
                format!("Verify batch '{batch_number}'")
            }
        }
    }
}

fn describe_query(query: &BatchQuery) -> String {
    if query.is_unfiltered() {
        return "(no filters)".into();
    }
    let mut parts = Vec::new();
    if let Some(needle) = query.search_needle() {
        parts.push(format!("search~'{needle}'"));
    }
    if let Some(category) = query.category.value() {
        parts.push(format!("category='{category}'"));
    }
    if let Some(retailer) = query.retailer.value() {
        parts.push(format!("retailer='{retailer}'"));
    }
    if let Some(status) = query.stock_status.value() {
        parts.push(format!("status='{status}'"));
    }
    format!("({})", parts.join(" AND "))
}
