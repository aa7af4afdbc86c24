//! Hiring Record Module
//! Typed row schema and the immutable staffing table built on Polars.

use super::loader::DataLoadError;
use polars::prelude::*;
use serde::Serialize;

pub const TIME_TO_HIRE: &str = "Time_to_Hire_Days";
pub const OFFER_ACCEPTED: &str = "Offer_Accepted";
pub const COST_PER_HIRE: &str = "Cost_per_Hire";
pub const FIRST_YEAR_ATTRITION: &str = "First_Year_Attrition";
pub const DEPARTMENT: &str = "Department";
pub const SOURCE_OF_HIRE: &str = "Source_of_Hire";
pub const QUARTER: &str = "Quarter";

/// Required input columns, in validation order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    TIME_TO_HIRE,
    OFFER_ACCEPTED,
    COST_PER_HIRE,
    FIRST_YEAR_ATTRITION,
    DEPARTMENT,
    SOURCE_OF_HIRE,
    QUARTER,
];

/// One hire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HiringRecord {
    pub time_to_hire_days: f64,
    pub offer_accepted: bool,
    pub cost_per_hire: f64,
    pub first_year_attrition: bool,
    pub department: String,
    pub source_of_hire: String,
    pub quarter: String,
}

/// Ordered, read-only table of hiring records.
///
/// The inner DataFrame always holds exactly the seven required columns with
/// fixed dtypes and no nulls, so aggregation never has to re-check the schema.
#[derive(Debug, Clone)]
pub struct StaffingTable {
    records: Vec<HiringRecord>,
    df: DataFrame,
}

impl StaffingTable {
    /// Build the table from typed records, preserving their order.
    pub fn from_records(records: Vec<HiringRecord>) -> Result<Self, DataLoadError> {
        let df = DataFrame::new(vec![
            Column::new(
                TIME_TO_HIRE.into(),
                records.iter().map(|r| r.time_to_hire_days).collect::<Vec<f64>>(),
            ),
            Column::new(
                OFFER_ACCEPTED.into(),
                records.iter().map(|r| r.offer_accepted).collect::<Vec<bool>>(),
            ),
            Column::new(
                COST_PER_HIRE.into(),
                records.iter().map(|r| r.cost_per_hire).collect::<Vec<f64>>(),
            ),
            Column::new(
                FIRST_YEAR_ATTRITION.into(),
                records
                    .iter()
                    .map(|r| r.first_year_attrition)
                    .collect::<Vec<bool>>(),
            ),
            Column::new(
                DEPARTMENT.into(),
                records
                    .iter()
                    .map(|r| r.department.clone())
                    .collect::<Vec<String>>(),
            ),
            Column::new(
                SOURCE_OF_HIRE.into(),
                records
                    .iter()
                    .map(|r| r.source_of_hire.clone())
                    .collect::<Vec<String>>(),
            ),
            Column::new(
                QUARTER.into(),
                records.iter().map(|r| r.quarter.clone()).collect::<Vec<String>>(),
            ),
        ])?;

        Ok(Self { records, df })
    }

    /// Validate a raw DataFrame (e.g. straight from the CSV reader) against the schema.
    ///
    /// Every required column is located before any value is converted, so a
    /// missing column is always reported ahead of a bad cell.
    pub fn from_frame(raw: &DataFrame) -> Result<Self, DataLoadError> {
        let mut columns: Vec<&Column> = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for required in REQUIRED_COLUMNS {
            let column = raw
                .get_columns()
                .iter()
                .find(|c| c.name().trim() == required)
                .ok_or(DataLoadError::MissingColumn { column: required })?;
            columns.push(column);
        }

        let times = Self::numeric_values(columns[0], TIME_TO_HIRE)?;
        let accepted = Self::flag_values(columns[1], OFFER_ACCEPTED)?;
        let costs = Self::numeric_values(columns[2], COST_PER_HIRE)?;
        let attrition = Self::flag_values(columns[3], FIRST_YEAR_ATTRITION)?;
        let departments = Self::text_values(columns[4], DEPARTMENT)?;
        let sources = Self::text_values(columns[5], SOURCE_OF_HIRE)?;
        let quarters = Self::text_values(columns[6], QUARTER)?;

        let records = (0..raw.height())
            .map(|i| HiringRecord {
                time_to_hire_days: times[i],
                offer_accepted: accepted[i],
                cost_per_hire: costs[i],
                first_year_attrition: attrition[i],
                department: departments[i].clone(),
                source_of_hire: sources[i].clone(),
                quarter: quarters[i].clone(),
            })
            .collect();

        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[HiringRecord] {
        &self.records
    }

    /// Read-only access to the validated DataFrame.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    fn raw_cell(column: &Column, row: usize) -> String {
        column
            .get(row)
            .map(|v| v.to_string().trim_matches('"').to_string())
            .unwrap_or_default()
    }

    fn numeric_values(column: &Column, name: &'static str) -> Result<Vec<f64>, DataLoadError> {
        let cast = column.cast(&DataType::Float64)?;
        let ca = cast.f64()?;

        ca.into_iter()
            .enumerate()
            .map(|(i, v)| match v {
                Some(v) if v.is_finite() => Ok(v),
                _ => Err(DataLoadError::InvalidValue {
                    column: name,
                    row: i + 1,
                    value: Self::raw_cell(column, i),
                }),
            })
            .collect()
    }

    fn flag_values(column: &Column, name: &'static str) -> Result<Vec<bool>, DataLoadError> {
        let invalid = |i: usize| DataLoadError::InvalidValue {
            column: name,
            row: i + 1,
            value: Self::raw_cell(column, i),
        };

        match column.dtype() {
            DataType::Boolean => column
                .bool()?
                .into_iter()
                .enumerate()
                .map(|(i, v)| v.ok_or_else(|| invalid(i)))
                .collect(),
            DataType::String => column
                .str()?
                .into_iter()
                .enumerate()
                .map(|(i, v)| v.and_then(parse_flag).ok_or_else(|| invalid(i)))
                .collect(),
            _ => {
                let cast = column.cast(&DataType::Float64)?;
                cast.f64()?
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| v.and_then(flag_from_number).ok_or_else(|| invalid(i)))
                    .collect()
            }
        }
    }

    fn text_values(column: &Column, name: &'static str) -> Result<Vec<String>, DataLoadError> {
        let cast = column.cast(&DataType::String)?;
        let ca = cast.str()?;

        ca.into_iter()
            .enumerate()
            .map(|(i, v)| match v.map(str::trim) {
                Some(s) if !s.is_empty() => Ok(s.to_string()),
                _ => Err(DataLoadError::InvalidValue {
                    column: name,
                    row: i + 1,
                    value: Self::raw_cell(column, i),
                }),
            })
            .collect()
    }
}

/// Parse a 0/1 style flag written as text.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" | "y" => Some(true),
        "0" | "0.0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Only exact 0 and 1 are flags; anything else is a data error.
pub fn flag_from_number(value: f64) -> Option<bool> {
    if value == 1.0 {
        Some(true)
    } else if value == 0.0 {
        Some(false)
    } else {
        None
    }
}
