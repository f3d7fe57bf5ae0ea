//! Catalog load errors.
//!
//! Every load failure is fatal: the dataset is either complete or absent.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read workbook '{}': {source}", .path.display())]
    Workbook {
        path: PathBuf,
        source: calamine::Error,
    },

    #[error("Workbook '{}' has no worksheets", .path.display())]
    EmptyWorkbook { path: PathBuf },

    #[error(
        "Unsupported catalog format '{}': expected .csv, .xlsx, .xlsm, .xls or .ods",
        .path.display()
    )]
    UnsupportedFormat { path: PathBuf },

    /// A row that could not be deserialized. `line` is the 1-based line in
    /// a CSV file or the 1-based row in a worksheet.
    #[error("Parse error at line {line}: {source}")]
    Csv { line: usize, source: csv::Error },

    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Unparseable date in '{column}' at line {line}: '{value}'")]
    InvalidDate {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("Missing batch number at line {line}")]
    MissingBatchNumber { line: usize },
}
