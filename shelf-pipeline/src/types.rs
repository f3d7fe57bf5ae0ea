use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Status labels
// ---------------------------------------------------------------------------

/// Stock status label carried by every batch row.
///
/// The catalog uses three well-known labels. Anything else is kept verbatim
/// so that exact-match filtering still works on unexpected values.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
    Other(String),
}

impl StockStatus {
    /// The labels offered by the stock status selector, in display order.
    pub const KNOWN: [StockStatus; 3] = [
        StockStatus::InStock,
        StockStatus::LowStock,
        StockStatus::OutOfStock,
    ];

    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "In Stock" => StockStatus::InStock,
            "Low Stock" => StockStatus::LowStock,
            "Out of Stock" => StockStatus::OutOfStock,
            other => StockStatus::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::Other(label) => label,
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl Serialize for StockStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Expiry bucket derived from the number of days left before expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpiryStatus {
    Expired,
    NearExpiry,
    Good,
}

impl ExpiryStatus {
    /// Bucket `days` left: negative is expired, `0..near_expiry_days` is near
    /// expiry, anything later is good.
    pub fn from_days(days: i64, near_expiry_days: i64) -> Self {
        if days < 0 {
            ExpiryStatus::Expired
        } else if days < near_expiry_days {
            ExpiryStatus::NearExpiry
        } else {
            ExpiryStatus::Good
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired => "Expired",
            ExpiryStatus::NearExpiry => "Near Expiry",
            ExpiryStatus::Good => "Good",
        }
    }
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl Serialize for ExpiryStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Batch records
// ---------------------------------------------------------------------------

/// One catalog row after parsing, before any derived fields are computed.
#[derive(Clone, Debug, PartialEq)]
pub struct RawBatch {
    pub batch_number: String,
    pub product_name: String,
    pub category: String,
    pub manufacturer: String,
    pub retailer_name: String,
    pub organic_certifications: String,
    pub manufacturing_address: Option<String>,
    pub quantity: i64,
    pub mrp: f64,
    pub current_stock: i64,
    pub shelf_life_months: f64,
    pub manufacture_date: NaiveDate,
    /// Time of day recorded alongside the manufacture date, when present.
    pub manufacture_time: Option<NaiveTime>,
    pub expiry_date: NaiveDate,
    pub arrival_date_at_retailer: NaiveDate,
    pub batch_status: StockStatus,
}

/// A product batch with its derived fields populated.
///
/// Built once when the dataset is prepared; never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProductBatch {
    pub batch_number: String,
    pub product_name: String,
    pub category: String,
    pub manufacturer: String,
    pub retailer_name: String,
    pub organic_certifications: String,
    /// Falls back to the configured facility when the catalog has none.
    pub manufacturing_address: String,
    pub quantity: i64,
    pub mrp: f64,
    pub current_stock: i64,
    pub shelf_life_months: f64,
    pub manufacture_date: NaiveDate,
    pub manufacture_time: Option<NaiveTime>,
    pub expiry_date: NaiveDate,
    pub arrival_date_at_retailer: NaiveDate,
    pub batch_status: StockStatus,

    // Derived fields (populated by the deriver)
    /// Whole days from the reference date to expiry; negative once expired.
    pub days_until_expiry: i64,
    pub expiry_status: ExpiryStatus,
    /// Display flag only. See `verification::VerificationRule`.
    pub blockchain_verified: bool,
}
