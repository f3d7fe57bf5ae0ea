//! Bridge protocol: request parsing, validation, execution and response
//! formatting.
//!
//! 1. Raw JSON -> parse into a `DashboardOperation` (reject if invalid)
//! 2. Validate parameters (reject if out of bounds)
//! 3. Execute read-only against the prepared dataset
//! 4. Wrap the typed result with the echoed request id

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shelf_pipeline::analytics::{
    self, CategoryShare, ExpiryBreakdown, FilterOptions, InventorySummary, PriceBox,
    RetailerStatusCount, TableRow,
};
use shelf_pipeline::{Dataset, LookupOutcome, ProductBatch};

use crate::error::{BridgeError, BridgeResult};
use crate::ops::DashboardOperation;

/// Rows returned by a `Table` request that does not set a limit.
pub const DEFAULT_TABLE_ROWS: usize = 100;
/// Upper bound accepted for a `Table` request's limit.
pub const MAX_TABLE_ROWS: usize = 10_000;

/// A request from a dashboard front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeRequest {
    /// The operation to perform.
    pub operation: DashboardOperation,

    /// Request ID for tracking.
    pub request_id: String,

    /// Optional free-form note from the caller, only logged.
    #[serde(default)]
    pub context: Option<String>,
}

/// Typed payload of a successful operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationResult {
    Summary {
        summary: InventorySummary,
        expiry: ExpiryBreakdown,
    },
    Options {
        options: FilterOptions,
    },
    Filtered {
        matched: usize,
        total: usize,
        batches: Vec<ProductBatch>,
    },
    Charts {
        matched: usize,
        category_distribution: Vec<CategoryShare>,
        stock_status_by_retailer: Vec<RetailerStatusCount>,
        price_distribution: Vec<PriceBox>,
    },
    Table {
        matched: usize,
        truncated: bool,
        rows: Vec<TableRow>,
    },
    Verification {
        outcome: LookupOutcome,
    },
}

/// A response to a front end. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeResponse {
    /// Request ID (echoed back, empty if the request could not be parsed).
    pub request_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<OperationResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Reference date of the dataset the answer was computed from.
    pub as_of: NaiveDate,
}

/// The Bridge: validates requests and answers them from a dataset.
///
/// Holds only limits; the dataset is passed into every call and is never
/// modified.
pub struct Bridge {
    /// Rows returned by a `Table` request without a limit.
    pub default_table_rows: usize,

    /// Maximum accepted `Table` limit.
    pub max_table_rows: usize,
}

impl Bridge {
    pub fn new() -> Self {
        Bridge {
            default_table_rows: DEFAULT_TABLE_ROWS,
            max_table_rows: MAX_TABLE_ROWS,
        }
    }

    /// Parse raw JSON into a validated `BridgeRequest`.
    pub fn parse_request(&self, raw_json: &str) -> BridgeResult<BridgeRequest> {
        let request: BridgeRequest = serde_json::from_str(raw_json).map_err(|e| {
            BridgeError::UnknownOperation(format!("Failed to parse request: {}", e))
        })?;

        self.validate_operation(&request.operation)?;

        Ok(request)
    }

    /// Validate operation parameters.
    fn validate_operation(&self, op: &DashboardOperation) -> BridgeResult<()> {
        match op {
            DashboardOperation::Verify { batch_number } => {
                if batch_number.is_empty() {
                    return Err(BridgeError::InvalidParameter {
                        op: "Verify".into(),
                        reason: "Please enter a Batch ID".into(),
                    });
                }
            }
            DashboardOperation::Table {
                limit: Some(limit), ..
            } => {
                if *limit == 0 || *limit > self.max_table_rows {
                    return Err(BridgeError::InvalidParameter {
                        op: "Table".into(),
                        reason: format!(
                            "limit={} out of range [1, {}]",
                            limit, self.max_table_rows
                        ),
                    });
                }
            }
            _ => {} // Other operations have no parameter constraints
        }
        Ok(())
    }

    /// Execute a request against `dataset`.
    pub fn execute(
        &self,
        dataset: &Dataset,
        request: &BridgeRequest,
    ) -> BridgeResult<BridgeResponse> {
        self.validate_operation(&request.operation)?;

        log::debug!(
            "request_id={} {}{}",
            request.request_id,
            request.operation.describe(),
            request
                .context
                .as_deref()
                .map(|c| format!(" context={c}"))
                .unwrap_or_default()
        );

        let result = self.dispatch(dataset, &request.operation);

        Ok(BridgeResponse {
            request_id: request.request_id.clone(),
            result: Some(result),
            error: None,
            as_of: dataset.as_of(),
        })
    }

    fn dispatch(&self, dataset: &Dataset, op: &DashboardOperation) -> OperationResult {
        match op {
            DashboardOperation::Summary => OperationResult::Summary {
                summary: dataset.summary(),
                expiry: analytics::expiry_breakdown(dataset.records()),
            },
            DashboardOperation::Options => OperationResult::Options {
                options: dataset.options(),
            },
            DashboardOperation::Filter { query } => {
                let view = dataset.filter(query);
                OperationResult::Filtered {
                    matched: view.kept.len(),
                    total: dataset.len(),
                    batches: view.kept.into_iter().cloned().collect(),
                }
            }
            DashboardOperation::Charts { query } => {
                let view = dataset.filter(query);
                OperationResult::Charts {
                    matched: view.kept.len(),
                    category_distribution: analytics::category_distribution(&view.kept),
                    stock_status_by_retailer: analytics::stock_status_by_retailer(&view.kept),
                    price_distribution: analytics::price_distribution(&view.kept),
                }
            }
            DashboardOperation::Table { query, limit } => {
                let view = dataset.filter(query);
                let limit = limit.unwrap_or(self.default_table_rows);
                let shown = view.kept.len().min(limit);
                OperationResult::Table {
                    matched: view.kept.len(),
                    truncated: shown < view.kept.len(),
                    rows: analytics::table_rows(&view.kept[..shown]),
                }
            }
            DashboardOperation::Verify { batch_number } => {
                let outcome = dataset.lookup(batch_number);
                if let LookupOutcome::NotFound { .. } = outcome {
                    log::warn!("batch '{}' not found", batch_number);
                }
                OperationResult::Verification { outcome }
            }
        }
    }

    /// Handle one raw JSON request line and return one JSON response line.
    ///
    /// Parse and validation failures become error responses, so a serving
    /// loop can keep going after a bad request.
    pub fn handle_line(&self, dataset: &Dataset, line: &str) -> BridgeResult<String> {
        let response = match self
            .parse_request(line)
            .and_then(|request| self.execute(dataset, &request))
        {
            Ok(response) => response,
            Err(err) => {
                log::warn!("rejected request: {}", err);
                BridgeResponse {
                    request_id: salvage_request_id(line),
                    result: None,
                    error: Some(err.to_string()),
                    as_of: dataset.as_of(),
                }
            }
        };
        Ok(serde_json::to_string(&response)?)
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort request id from a request that failed to parse or validate.
fn salvage_request_id(line: &str) -> String {
    serde_json::from_str::<serde_json::Value>(line)
        .ok()
        .and_then(|v| v.get("request_id")?.as_str().map(str::to_string))
        .unwrap_or_default()
}
