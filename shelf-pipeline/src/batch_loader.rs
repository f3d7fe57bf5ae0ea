//! Catalog loader.
//!
//! Parses a CSV export or a spreadsheet workbook into `RawBatch` rows.
//! Expected columns:
//!   Product Name, Category, Quantity, MRP, Retailer Name, Current Stock,
//!   Batch Status, Batch Number, Manufacture Date, Expiry Date,
//!   Arrival Date at Retailer, Shelf Life (Months), Manufacturer,
//!   Organic Certifications, and optionally Manufacturing Address.
//!
//! Workbooks are read from their first worksheet, whose first row holds the
//! column names. Loading is all-or-nothing: the first bad row aborts the
//! whole load.

use std::io::Read;
use std::path::Path;

use calamine::{Data, DataType, Reader};
use csv::StringRecord;
use serde::Deserialize;

use crate::dates::{parse_day_first, time_of_day};
use crate::error::LoadError;
use crate::types::{RawBatch, StockStatus};

/// Header names that must be present in every catalog.
pub const REQUIRED_COLUMNS: [&str; 14] = [
    "Product Name",
    "Category",
    "Quantity",
    "MRP",
    "Retailer Name",
    "Current Stock",
    "Batch Status",
    "Batch Number",
    "Manufacture Date",
    "Expiry Date",
    "Arrival Date at Retailer",
    "Shelf Life (Months)",
    "Manufacturer",
    "Organic Certifications",
];

/// A catalog row as it appears in the CSV, dates still unparsed.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity", deserialize_with = "deserialize_count")]
    pub quantity: i64,
    #[serde(rename = "MRP", deserialize_with = "deserialize_currency")]
    pub mrp: f64,
    #[serde(rename = "Retailer Name")]
    pub retailer_name: String,
    #[serde(rename = "Current Stock", deserialize_with = "deserialize_count")]
    pub current_stock: i64,
    #[serde(rename = "Batch Status")]
    pub batch_status: String,
    #[serde(rename = "Batch Number")]
    pub batch_number: String,
    #[serde(rename = "Manufacture Date")]
    pub manufacture_date: String,
    #[serde(rename = "Expiry Date")]
    pub expiry_date: String,
    #[serde(rename = "Arrival Date at Retailer")]
    pub arrival_date_at_retailer: String,
    #[serde(rename = "Shelf Life (Months)")]
    pub shelf_life_months: f64,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Organic Certifications")]
    pub organic_certifications: String,
    #[serde(rename = "Manufacturing Address", default)]
    pub manufacturing_address: Option<String>,
}

impl CatalogRecord {
    /// Parse dates and normalize optional fields. `line` is the 1-based CSV
    /// line used in error messages.
    pub fn into_raw_batch(self, line: usize) -> Result<RawBatch, LoadError> {
        if self.batch_number.trim().is_empty() {
            return Err(LoadError::MissingBatchNumber { line });
        }

        let date = |column: &'static str, value: &str| {
            parse_day_first(value).ok_or_else(|| LoadError::InvalidDate {
                line,
                column,
                value: value.to_string(),
            })
        };
        let manufacture_date = date("Manufacture Date", &self.manufacture_date)?;
        let manufacture_time = time_of_day(&self.manufacture_date);
        let expiry_date = date("Expiry Date", &self.expiry_date)?;
        let arrival_date_at_retailer =
            date("Arrival Date at Retailer", &self.arrival_date_at_retailer)?;

        Ok(RawBatch {
            batch_number: self.batch_number,
            product_name: self.product_name,
            category: self.category,
            manufacturer: self.manufacturer,
            retailer_name: self.retailer_name,
            organic_certifications: self.organic_certifications,
            manufacturing_address: self
                .manufacturing_address
                .filter(|address| !address.trim().is_empty()),
            quantity: self.quantity,
            mrp: self.mrp,
            current_stock: self.current_stock,
            shelf_life_months: self.shelf_life_months,
            manufacture_date,
            manufacture_time,
            expiry_date,
            arrival_date_at_retailer,
            batch_status: StockStatus::from_label(&self.batch_status),
        })
    }
}

/// Catalog file formats recognised by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogFormat {
    Csv,
    Workbook,
}

impl CatalogFormat {
    /// Pick a format from the file extension. Files without an extension
    /// are read as CSV.
    pub fn from_path(path: &Path) -> Option<Self> {
        let Some(ext) = path.extension() else {
            return Some(CatalogFormat::Csv);
        };
        match ext.to_string_lossy().to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(CatalogFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(CatalogFormat::Workbook),
            _ => None,
        }
    }
}

fn check_columns(headers: &StringRecord) -> Result<(), LoadError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::MissingColumns(missing))
    }
}

/// Load catalog rows from a CSV reader.
pub fn load_catalog<R: Read>(reader: R) -> Result<Vec<RawBatch>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source| LoadError::Csv { line: 1, source })?;
    check_columns(headers)?;

    let mut batches = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let line = line_num + 2;
        let record: CatalogRecord = result.map_err(|source| LoadError::Csv { line, source })?;
        batches.push(record.into_raw_batch(line)?);
    }

    log::debug!("loaded {} catalog rows", batches.len());
    Ok(batches)
}

/// Load catalog rows from the first worksheet of a workbook.
pub fn load_workbook(path: impl AsRef<Path>) -> Result<Vec<RawBatch>, LoadError> {
    let path = path.as_ref();
    let workbook_error = |source: calamine::Error| LoadError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = calamine::open_workbook_auto(path).map_err(workbook_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?
        .map_err(workbook_error)?;

    let mut rows = range.rows();
    let headers: StringRecord = match rows.next() {
        Some(row) => row.iter().map(|cell| cell_text(cell).trim().to_string()).collect(),
        None => StringRecord::new(),
    };
    check_columns(&headers)?;

    let mut batches = Vec::new();
    for (row_num, row) in rows.enumerate() {
        let line = row_num + 2;
        let record: StringRecord = row
            .iter()
            .map(|cell| cell_text(cell).trim().to_string())
            .collect();
        // Formatted but empty rows trail many exported sheets.
        if record.iter().all(str::is_empty) {
            continue;
        }
        let record: CatalogRecord = record
            .deserialize(Some(&headers))
            .map_err(|source| LoadError::Csv { line, source })?;
        batches.push(record.into_raw_batch(line)?);
    }

    log::debug!(
        "loaded {} catalog rows from worksheet 1 of '{}'",
        batches.len(),
        path.display()
    );
    Ok(batches)
}

/// Render a worksheet cell the way it would appear in a CSV export. Date
/// cells become ISO timestamps so the day-first parser reads them unambiguously.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::Error(e) => e.to_string(),
    }
}

/// Load catalog rows from a file, choosing the reader by extension.
pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<Vec<RawBatch>, LoadError> {
    let path = path.as_ref();
    match CatalogFormat::from_path(path) {
        Some(CatalogFormat::Csv) => {
            let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
                path: path.to_path_buf(),
                source,
            })?;
            load_catalog(file)
        }
        Some(CatalogFormat::Workbook) => load_workbook(path),
        None => Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Whole-number deserializer: accepts "12" and the spreadsheet-style "12.0".
fn deserialize_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Ok(n);
    }
    match s.parse::<f64>() {
        Ok(n) if n.is_finite() && n.fract() == 0.0 => Ok(n as i64),
        _ => Err(serde::de::Error::custom(format!(
            "expected whole number, got '{}'",
            s
        ))),
    }
}

/// Currency deserializer: strips a leading currency symbol and thousands
/// separators, so "₹1,250.00", "Rs. 1,250", "$99" and "45.5" all parse.
fn deserialize_currency<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let cleaned: String = s
        .trim()
        .trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '-'))
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(serde::de::Error::custom(format!(
            "expected currency amount, got '{}'",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: &str = "Product Name,Category,Quantity,MRP,Retailer Name,Current Stock,Batch Status,Batch Number,Manufacture Date,Expiry Date,Arrival Date at Retailer,Shelf Life (Months),Manufacturer,Organic Certifications,Manufacturing Address";

    fn catalog(rows: &[&str]) -> String {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        csv.push('\n');
        csv
    }

    #[test]
    fn load_sample_catalog() {
        let csv = catalog(&[
            "Tulsi Green Tea,Tea,25,180.00,FreshMart,12,In Stock,OI-TEA-001,05-01-2024,05-01-2026,20-01-2024,24,Organic India,USDA Organic,",
            "Ashwagandha,Supplements,40,\"₹1,250.00\",Wellness Hub,0,Out of Stock,OI-SUP-002,15/03/2024,15/03/2025,01/04/2024,12,Organic India,India Organic,\"Plot 7, Haridwar\"",
        ]);
        let batches = load_catalog(csv.as_bytes()).unwrap();
        assert_eq!(batches.len(), 2);

        assert_eq!(batches[0].batch_number, "OI-TEA-001");
        assert_eq!(batches[0].quantity, 25);
        assert!((batches[0].mrp - 180.0).abs() < 0.01);
        assert_eq!(
            batches[0].manufacture_date,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert_eq!(batches[0].manufacturing_address, None);
        assert_eq!(batches[0].batch_status, StockStatus::InStock);

        assert!((batches[1].mrp - 1250.0).abs() < 0.01);
        assert_eq!(batches[1].current_stock, 0);
        assert_eq!(
            batches[1].manufacturing_address.as_deref(),
            Some("Plot 7, Haridwar")
        );
        assert_eq!(batches[1].batch_status, StockStatus::OutOfStock);
    }

    #[test]
    fn manufacturing_address_column_is_optional() {
        let header = HEADER.trim_end_matches(",Manufacturing Address");
        let csv = format!(
            "{}\nTriphala,Supplements,10,99,FreshMart,3,Low Stock,OI-SUP-010,01-02-2024,01-02-2026,10-02-2024,24,Organic India,USDA Organic\n",
            header
        );
        let batches = load_catalog(csv.as_bytes()).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].manufacturing_address, None);
    }

    #[test]
    fn missing_required_columns_are_all_reported() {
        let csv = "Product Name,Category\nTulsi,Tea\n";
        match load_catalog(csv.as_bytes()) {
            Err(LoadError::MissingColumns(missing)) => {
                assert_eq!(missing.len(), REQUIRED_COLUMNS.len() - 2);
                assert!(missing.contains(&"Batch Number".to_string()));
                assert!(!missing.contains(&"Category".to_string()));
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn one_bad_date_fails_the_whole_load() {
        let csv = catalog(&[
            "Tulsi Green Tea,Tea,25,180,FreshMart,12,In Stock,OI-TEA-001,05-01-2024,05-01-2026,20-01-2024,24,Organic India,USDA Organic,",
            "Moringa,Tea,25,180,FreshMart,12,In Stock,OI-TEA-002,05-01-2024,someday,20-01-2024,24,Organic India,USDA Organic,",
        ]);
        match load_catalog(csv.as_bytes()) {
            Err(LoadError::InvalidDate { line, column, value }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "Expiry Date");
                assert_eq!(value, "someday");
            }
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn blank_batch_number_is_rejected() {
        let csv = catalog(&[
            "Tulsi Green Tea,Tea,25,180,FreshMart,12,In Stock,,05-01-2024,05-01-2026,20-01-2024,24,Organic India,USDA Organic,",
        ]);
        assert!(matches!(
            load_catalog(csv.as_bytes()),
            Err(LoadError::MissingBatchNumber { line: 2 })
        ));
    }

    #[test]
    fn malformed_numbers_report_the_line() {
        let csv = catalog(&[
            "Tulsi Green Tea,Tea,lots,180,FreshMart,12,In Stock,OI-TEA-001,05-01-2024,05-01-2026,20-01-2024,24,Organic India,USDA Organic,",
        ]);
        assert!(matches!(
            load_catalog(csv.as_bytes()),
            Err(LoadError::Csv { line: 2, .. })
        ));
    }

    #[test]
    fn count_parsing_accepts_float_formatted_integers() {
        let csv = catalog(&[
            "Tulsi Green Tea,Tea,25.0,180,FreshMart,12.0,In Stock,OI-TEA-001,05-01-2024,05-01-2026,20-01-2024,24,Organic India,USDA Organic,",
        ]);
        let batches = load_catalog(csv.as_bytes()).unwrap();
        assert_eq!(batches[0].quantity, 25);
        assert_eq!(batches[0].current_stock, 12);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = load_catalog_file("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn rupee_prefixes_are_stripped_from_mrp() {
        let csv = catalog(&[
            "Tulsi Green Tea,Tea,25,\"Rs. 1,250\",FreshMart,12,In Stock,OI-TEA-001,05-01-2024,05-01-2026,20-01-2024,24,Organic India,USDA Organic,",
            "Tulsi Ginger,Tea,25,Rs.99.50,FreshMart,12,In Stock,OI-TEA-002,05-01-2024,05-01-2026,20-01-2024,24,Organic India,USDA Organic,",
        ]);
        let batches = load_catalog(csv.as_bytes()).unwrap();
        assert!((batches[0].mrp - 1250.0).abs() < 0.01);
        assert!((batches[1].mrp - 99.5).abs() < 0.01);
    }

    #[test]
    fn manufacture_time_is_kept_when_present() {
        let csv = catalog(&[
            "Tulsi Green Tea,Tea,25,180,FreshMart,12,In Stock,OI-TEA-001,05-01-2024 14:30,05-01-2026,20-01-2024,24,Organic India,USDA Organic,",
            "Tulsi Ginger,Tea,25,180,FreshMart,12,In Stock,OI-TEA-002,05-01-2024,05-01-2026,20-01-2024,24,Organic India,USDA Organic,",
        ]);
        let batches = load_catalog(csv.as_bytes()).unwrap();
        assert_eq!(
            batches[0].manufacture_date,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert_eq!(
            batches[0].manufacture_time,
            chrono::NaiveTime::from_hms_opt(14, 30, 0)
        );
        assert_eq!(batches[1].manufacture_time, None);
    }

    #[test]
    fn format_follows_the_extension() {
        let format = |p: &str| CatalogFormat::from_path(Path::new(p));
        assert_eq!(format("catalog.csv"), Some(CatalogFormat::Csv));
        assert_eq!(format("catalog"), Some(CatalogFormat::Csv));
        assert_eq!(format("catalog.XLSX"), Some(CatalogFormat::Workbook));
        assert_eq!(format("catalog.xls"), Some(CatalogFormat::Workbook));
        assert_eq!(format("catalog.json"), None);
    }

    #[test]
    fn unsupported_extension_names_the_format() {
        let err = load_catalog_file("/tmp/catalog.json").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { .. }));
        assert!(err.to_string().contains("catalog.json"));
    }

    #[test]
    fn corrupt_workbook_is_a_workbook_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("organic_india_complete_catalog.xlsx");
        std::fs::write(&path, b"PK\x03\x04not really a zip archive").unwrap();

        let err = load_catalog_file(&path).unwrap_err();
        assert!(
            matches!(err, LoadError::Workbook { .. }),
            "expected Workbook, got {:?}",
            err
        );
    }

    #[test]
    fn load_xlsx_workbook() {
        use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in HEADER.split(',').enumerate() {
            sheet.write_string(0, col as u16, name).unwrap();
        }

        let date_format = Format::new().set_num_format("dd/mm/yyyy hh:mm");
        let manufactured = ExcelDateTime::from_ymd(2024, 1, 5)
            .unwrap()
            .and_hms(14, 30, 0)
            .unwrap();
        let text = [
            (0, "Tulsi Green Tea"),
            (1, "Tea"),
            (4, "FreshMart"),
            (6, "In Stock"),
            (7, "OI-TEA-001"),
            (9, "05-01-2026"),
            (10, "20/01/2024"),
            (12, "Organic India"),
            (13, "USDA Organic"),
        ];
        for (col, value) in text {
            sheet.write_string(1, col, value).unwrap();
        }
        sheet.write_number(1, 2, 25).unwrap();
        sheet.write_number(1, 3, 180.5).unwrap();
        sheet.write_number(1, 5, 12).unwrap();
        sheet
            .write_datetime_with_format(1, 8, &manufactured, &date_format)
            .unwrap();
        sheet.write_number(1, 11, 24).unwrap();
        workbook.save(&path).unwrap();

        let batches = load_catalog_file(&path).unwrap();
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.batch_number, "OI-TEA-001");
        assert_eq!(batch.quantity, 25);
        assert_eq!(batch.current_stock, 12);
        assert!((batch.mrp - 180.5).abs() < 0.01);
        assert!((batch.shelf_life_months - 24.0).abs() < f64::EPSILON);
        assert_eq!(
            batch.manufacture_date,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert_eq!(
            batch.manufacture_time,
            chrono::NaiveTime::from_hms_opt(14, 30, 0)
        );
        assert_eq!(
            batch.expiry_date,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
        );
        assert_eq!(batch.manufacturing_address, None);
        assert_eq!(batch.batch_status, StockStatus::InStock);
    }

    #[test]
    fn workbook_without_required_columns_is_rejected() {
        use rust_xlsxwriter::Workbook;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Product Name").unwrap();
        sheet.write_string(0, 1, "Category").unwrap();
        sheet.write_string(1, 0, "Tulsi").unwrap();
        sheet.write_string(1, 1, "Tea").unwrap();
        workbook.save(&path).unwrap();

        match load_catalog_file(&path) {
            Err(LoadError::MissingColumns(missing)) => {
                assert_eq!(missing.len(), REQUIRED_COLUMNS.len() - 2);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }
}
