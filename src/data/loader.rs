//! Staffing Data Loader Module
//! Reads hiring records from CSV (Polars) or spreadsheet workbooks (calamine).

use super::record::{
    flag_from_number, parse_flag, HiringRecord, StaffingTable, COST_PER_HIRE, DEPARTMENT,
    FIRST_YEAR_ATTRITION, OFFER_ACCEPTED, QUARTER, REQUIRED_COLUMNS, SOURCE_OF_HIRE,
    TIME_TO_HIRE,
};
use calamine::{open_workbook_auto, Data, Reader};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("Unsupported input format: {} (expected .csv, .xlsx, .xlsm, .xlsb, .xls or .ods)", path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("Failed to read table: {0}")]
    Table(#[from] PolarsError),
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Workbook has no worksheets: {}", path.display())]
    NoWorksheet { path: PathBuf },
    #[error("Required column '{column}' is missing")]
    MissingColumn { column: &'static str },
    #[error("Invalid value '{value}' in column '{column}' at data row {row}")]
    InvalidValue {
        column: &'static str,
        row: usize,
        value: String,
    },
}

static EMPTY_CELL: Data = Data::Empty;

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Loads the staffing table from disk.
pub struct DataLoader;

impl DataLoader {
    /// Load a staffing table, choosing the reader from the file extension.
    pub fn load(path: &Path) -> Result<StaffingTable, DataLoadError> {
        if !path.is_file() {
            return Err(DataLoadError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let table = if extension == "csv" {
            Self::load_csv(path)?
        } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            Self::load_workbook(path)?
        } else {
            return Err(DataLoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        };

        info!(
            path = %path.display(),
            rows = table.len(),
            "Loaded staffing records"
        );
        Ok(table)
    }

    /// Load a CSV export using Polars.
    pub fn load_csv(path: &Path) -> Result<StaffingTable, DataLoadError> {
        if !path.is_file() {
            return Err(DataLoadError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        debug!(
            columns = ?df.get_column_names(),
            height = df.height(),
            "Parsed CSV frame"
        );
        StaffingTable::from_frame(&df)
    }

    /// Load the first worksheet of a workbook. The first row is the header.
    pub fn load_workbook(path: &Path) -> Result<StaffingTable, DataLoadError> {
        if !path.is_file() {
            return Err(DataLoadError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| DataLoadError::NoWorksheet {
                path: path.to_path_buf(),
            })??;

        let mut rows = range.rows();
        let header: Vec<String> = rows
            .next()
            .map(|cells| cells.iter().map(|c| cell_text(c).trim().to_string()).collect())
            .unwrap_or_default();

        let mut index = [0usize; 7];
        for (slot, required) in index.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = header
                .iter()
                .position(|h| h == required)
                .ok_or(DataLoadError::MissingColumn { column: required })?;
        }

        let mut records = Vec::new();
        for (i, cells) in rows.enumerate() {
            if cells.iter().all(is_blank) {
                continue;
            }
            let row = i + 1;
            let cell = |col: usize| cells.get(index[col]).unwrap_or(&EMPTY_CELL);

            records.push(HiringRecord {
                time_to_hire_days: cell_number(cell(0), TIME_TO_HIRE, row)?,
                offer_accepted: cell_flag(cell(1), OFFER_ACCEPTED, row)?,
                cost_per_hire: cell_number(cell(2), COST_PER_HIRE, row)?,
                first_year_attrition: cell_flag(cell(3), FIRST_YEAR_ATTRITION, row)?,
                department: cell_label(cell(4), DEPARTMENT, row)?,
                source_of_hire: cell_label(cell(5), SOURCE_OF_HIRE, row)?,
                quarter: cell_label(cell(6), QUARTER, row)?,
            });
        }

        debug!(
            sheet_rows = range.height(),
            records = records.len(),
            "Parsed workbook sheet"
        );
        StaffingTable::from_records(records)
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn invalid(cell: &Data, column: &'static str, row: usize) -> DataLoadError {
    DataLoadError::InvalidValue {
        column,
        row,
        value: cell_text(cell),
    }
}

fn cell_number(cell: &Data, column: &'static str, row: usize) -> Result<f64, DataLoadError> {
    let value = match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    value
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(cell, column, row))
}

fn cell_flag(cell: &Data, column: &'static str, row: usize) -> Result<bool, DataLoadError> {
    let value = match cell {
        Data::Bool(b) => Some(*b),
        Data::Int(i) => flag_from_number(*i as f64),
        Data::Float(f) => flag_from_number(*f),
        Data::String(s) => parse_flag(s),
        _ => None,
    };
    value.ok_or_else(|| invalid(cell, column, row))
}

fn cell_label(cell: &Data, column: &'static str, row: usize) -> Result<String, DataLoadError> {
    let text = match cell {
        // Whole-number cells (e.g. a year used as a quarter label) should not gain a ".0".
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => cell_text(other),
    };
    let text = text.trim();
    if text.is_empty() {
        return Err(invalid(cell, column, row));
    }
    Ok(text.to_string())
}
