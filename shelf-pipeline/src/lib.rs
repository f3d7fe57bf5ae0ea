//! Product batch catalog pipeline.
//!
//! Loads a batch catalog, derives expiry and verification fields as of an
//! explicit reference date, and answers the dashboard's read-only questions:
//! filtered views, batch lookups, headline metrics and chart series.

pub mod analytics;
pub mod batch_loader;
pub mod components;
pub mod config;
pub mod dataset;
pub mod dates;
pub mod deriver;
pub mod error;
pub mod filter;
pub mod lookup;
pub mod pipelines;
pub mod query;
pub mod types;
pub mod util;
pub mod verification;
pub mod view_pipeline;

pub use config::DashboardConfig;
pub use dataset::{Dataset, FilteredView};
pub use error::LoadError;
pub use lookup::{FailedVerification, LookupOutcome, VerifiedDetail};
pub use query::{BatchQuery, Selection};
pub use types::{ExpiryStatus, ProductBatch, RawBatch, StockStatus};
pub use verification::{StockOnHandRule, VerificationRule};
