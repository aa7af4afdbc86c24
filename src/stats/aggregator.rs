//! KPI Aggregator Module
//! Scalar summary and grouped statistics over the staffing table.
//!
//! All column math runs as Polars lazy expressions; only the final ordering
//! of the (small) grouped results happens in Rust.

use super::format::{format_currency, format_days, format_percent};
use crate::data::{
    StaffingTable, COST_PER_HIRE, DEPARTMENT, FIRST_YEAR_ATTRITION, OFFER_ACCEPTED, QUARTER,
    SOURCE_OF_HIRE, TIME_TO_HIRE,
};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub const LABEL_TIME_TO_HIRE: &str = "Average Time to Hire";
pub const LABEL_ACCEPTANCE: &str = "Offer Acceptance Rate";
pub const LABEL_COST: &str = "Average Cost per Hire";
pub const LABEL_ATTRITION: &str = "First-Year Attrition Rate";

const HIRES: &str = "hires";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Dataset is empty: at least one hiring record is required")]
pub struct EmptyDatasetError;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error(transparent)]
    EmptyDataset(#[from] EmptyDatasetError),
    #[error("Aggregation failed: {0}")]
    Frame(#[from] PolarsError),
}

/// The four headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub avg_time_to_hire_days: f64,
    /// Percentage, 0-100.
    pub offer_acceptance_rate: f64,
    pub avg_cost_per_hire: f64,
    /// Percentage, 0-100.
    pub attrition_rate: f64,
    pub currency_symbol: String,
}

/// Display text for one KPI tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiTile {
    pub label: &'static str,
    pub value: String,
}

impl KpiSummary {
    /// Tiles in dashboard order.
    pub fn tiles(&self) -> [KpiTile; 4] {
        [
            KpiTile {
                label: LABEL_TIME_TO_HIRE,
                value: format_days(self.avg_time_to_hire_days),
            },
            KpiTile {
                label: LABEL_ACCEPTANCE,
                value: format_percent(self.offer_acceptance_rate),
            },
            KpiTile {
                label: LABEL_COST,
                value: format_currency(self.avg_cost_per_hire, &self.currency_symbol),
            },
            KpiTile {
                label: LABEL_ATTRITION,
                value: format_percent(self.attrition_rate),
            },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentStat {
    pub department: String,
    pub avg_time_to_hire_days: f64,
    /// Percentage, 0-100.
    pub acceptance_rate: f64,
    pub hires: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceShare {
    pub source: String,
    pub hires: usize,
    /// Share of all hires, 0-100.
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuarterAttrition {
    pub quarter: String,
    /// Percentage, 0-100.
    pub attrition_rate: f64,
}

/// Everything the renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardData {
    pub total_records: usize,
    pub summary: KpiSummary,
    pub departments: Vec<DepartmentStat>,
    pub sources: Vec<SourceShare>,
    pub quarters: Vec<QuarterAttrition>,
}

/// Stateless KPI computations.
pub struct Aggregator;

impl Aggregator {
    /// Run every aggregate. Fails on an empty table before touching any column.
    pub fn compute(
        table: &StaffingTable,
        department_order: &[String],
        currency_symbol: &str,
    ) -> Result<DashboardData, AggregateError> {
        Self::ensure_not_empty(table)?;

        let data = DashboardData {
            total_records: table.len(),
            summary: Self::summarize(table, currency_symbol)?,
            departments: Self::by_department(table, department_order)?,
            sources: Self::by_source(table)?,
            quarters: Self::by_quarter(table)?,
        };

        debug!(
            departments = data.departments.len(),
            sources = data.sources.len(),
            quarters = data.quarters.len(),
            "Computed grouped aggregates"
        );
        Ok(data)
    }

    /// Column means; acceptance and attrition are scaled to percentages.
    pub fn summarize(
        table: &StaffingTable,
        currency_symbol: &str,
    ) -> Result<KpiSummary, AggregateError> {
        Self::ensure_not_empty(table)?;

        let out = table
            .frame()
            .clone()
            .lazy()
            .select([
                col(TIME_TO_HIRE).mean().alias(TIME_TO_HIRE),
                Self::rate(OFFER_ACCEPTED),
                col(COST_PER_HIRE).mean().alias(COST_PER_HIRE),
                Self::rate(FIRST_YEAR_ATTRITION),
            ])
            .collect()?;

        let summary = KpiSummary {
            avg_time_to_hire_days: Self::first_f64(&out, TIME_TO_HIRE)?,
            offer_acceptance_rate: Self::first_f64(&out, OFFER_ACCEPTED)?,
            avg_cost_per_hire: Self::first_f64(&out, COST_PER_HIRE)?,
            attrition_rate: Self::first_f64(&out, FIRST_YEAR_ATTRITION)?,
            currency_symbol: currency_symbol.to_string(),
        };
        debug!(?summary, "Computed KPI summary");
        Ok(summary)
    }

    /// Mean time-to-hire and acceptance rate per department.
    ///
    /// Departments appear in first-seen order. A non-empty `order` moves the
    /// listed departments to the front in that order; unlisted ones keep
    /// their first-seen order after them.
    pub fn by_department(
        table: &StaffingTable,
        order: &[String],
    ) -> Result<Vec<DepartmentStat>, AggregateError> {
        Self::ensure_not_empty(table)?;

        let out = table
            .frame()
            .clone()
            .lazy()
            .group_by_stable([col(DEPARTMENT)])
            .agg([
                col(TIME_TO_HIRE).mean().alias(TIME_TO_HIRE),
                Self::rate(OFFER_ACCEPTED),
                Self::count(),
            ])
            .collect()?;

        let names = Self::str_values(&out, DEPARTMENT)?;
        let days = Self::f64_values(&out, TIME_TO_HIRE)?;
        let rates = Self::f64_values(&out, OFFER_ACCEPTED)?;
        let hires = Self::count_values(&out)?;

        let stats: Vec<DepartmentStat> = names
            .into_iter()
            .zip(days)
            .zip(rates)
            .zip(hires)
            .map(|(((department, days), rate), hires)| DepartmentStat {
                department,
                avg_time_to_hire_days: days,
                acceptance_rate: rate,
                hires,
            })
            .collect();

        Ok(apply_category_order(stats, order, |s| s.department.as_str()))
    }

    /// Hire counts per source, largest first; ties keep first-seen order.
    pub fn by_source(table: &StaffingTable) -> Result<Vec<SourceShare>, AggregateError> {
        Self::ensure_not_empty(table)?;

        let out = table
            .frame()
            .clone()
            .lazy()
            .group_by_stable([col(SOURCE_OF_HIRE)])
            .agg([Self::count()])
            .collect()?;

        let total = table.len() as f64;
        let mut shares: Vec<SourceShare> = Self::str_values(&out, SOURCE_OF_HIRE)?
            .into_iter()
            .zip(Self::count_values(&out)?)
            .map(|(source, hires)| SourceShare {
                source,
                hires,
                share_pct: hires as f64 / total * 100.0,
            })
            .collect();

        shares.sort_by(|a, b| b.hires.cmp(&a.hires));
        Ok(shares)
    }

    /// Attrition rate per quarter, sorted by quarter label ascending.
    pub fn by_quarter(table: &StaffingTable) -> Result<Vec<QuarterAttrition>, AggregateError> {
        Self::ensure_not_empty(table)?;

        let out = table
            .frame()
            .clone()
            .lazy()
            .group_by([col(QUARTER)])
            .agg([Self::rate(FIRST_YEAR_ATTRITION)])
            .collect()?;

        let mut quarters: Vec<QuarterAttrition> = Self::str_values(&out, QUARTER)?
            .into_iter()
            .zip(Self::f64_values(&out, FIRST_YEAR_ATTRITION)?)
            .map(|(quarter, attrition_rate)| QuarterAttrition {
                quarter,
                attrition_rate,
            })
            .collect();

        quarters.sort_by(|a, b| a.quarter.cmp(&b.quarter));
        Ok(quarters)
    }

    fn ensure_not_empty(table: &StaffingTable) -> Result<(), EmptyDatasetError> {
        if table.is_empty() {
            Err(EmptyDatasetError)
        } else {
            Ok(())
        }
    }

    /// Mean of a boolean column as a percentage, keeping the column name.
    fn rate(column: &str) -> Expr {
        (col(column).cast(DataType::Float64).mean() * lit(100.0)).alias(column)
    }

    fn count() -> Expr {
        col(TIME_TO_HIRE)
            .count()
            .cast(DataType::UInt64)
            .alias(HIRES)
    }

    fn first_f64(df: &DataFrame, name: &str) -> PolarsResult<f64> {
        Ok(df.column(name)?.f64()?.get(0).unwrap_or(f64::NAN))
    }

    fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<f64>> {
        Ok(df
            .column(name)?
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }

    fn str_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<String>> {
        Ok(df
            .column(name)?
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect())
    }

    fn count_values(df: &DataFrame) -> PolarsResult<Vec<usize>> {
        Ok(df
            .column(HIRES)?
            .u64()?
            .into_iter()
            .map(|v| v.unwrap_or(0) as usize)
            .collect())
    }
}

/// Stable reorder: listed categories first in listed order, the rest after in their current order.
fn apply_category_order<T>(mut items: Vec<T>, order: &[String], key: impl Fn(&T) -> &str) -> Vec<T> {
    if order.is_empty() {
        return items;
    }
    items.sort_by_key(|item| {
        order
            .iter()
            .position(|o| o == key(item))
            .unwrap_or(order.len())
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::HiringRecord;

    fn record(
        dept: &str,
        days: f64,
        accepted: bool,
        cost: f64,
        left: bool,
        source: &str,
        quarter: &str,
    ) -> HiringRecord {
        HiringRecord {
            time_to_hire_days: days,
            offer_accepted: accepted,
            cost_per_hire: cost,
            first_year_attrition: left,
            department: dept.to_string(),
            source_of_hire: source.to_string(),
            quarter: quarter.to_string(),
        }
    }

    fn sample_table() -> StaffingTable {
        StaffingTable::from_records(vec![
            record("B", 40.0, true, 50000.0, false, "Referral", "Q3"),
            record("A", 20.0, false, 30000.0, true, "Job Board", "Q1"),
            record("B", 50.0, true, 70000.0, true, "Referral", "Q2"),
            record("A", 30.0, true, 20000.0, false, "LinkedIn", "Q1"),
            record("B", 33.0, false, 41000.0, false, "Job Board", "Q3"),
        ])
        .unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_summary_is_column_means() {
        let table = sample_table();
        let summary = Aggregator::summarize(&table, "₹").unwrap();

        let rows = table.records();
        let n = rows.len() as f64;
        let days = rows.iter().map(|r| r.time_to_hire_days).sum::<f64>() / n;
        let accepted = rows.iter().filter(|r| r.offer_accepted).count() as f64 / n * 100.0;
        let cost = rows.iter().map(|r| r.cost_per_hire).sum::<f64>() / n;
        let left = rows.iter().filter(|r| r.first_year_attrition).count() as f64 / n * 100.0;

        assert_close(summary.avg_time_to_hire_days, days);
        assert_close(summary.offer_acceptance_rate, accepted);
        assert_close(summary.avg_cost_per_hire, cost);
        assert_close(summary.attrition_rate, left);

        // Same input, same bits.
        assert_eq!(summary, Aggregator::summarize(&table, "₹").unwrap());
    }

    #[test]
    fn test_summary_tiles_text() {
        let summary = Aggregator::summarize(&sample_table(), "₹").unwrap();
        let tiles = summary.tiles();

        assert_eq!(tiles[0].label, LABEL_TIME_TO_HIRE);
        assert_eq!(tiles[0].value, "34.6 days");
        assert_eq!(tiles[1].value, "60.0%");
        assert_eq!(tiles[2].label, LABEL_COST);
        assert_eq!(tiles[2].value, "₹42,200");
        assert_eq!(tiles[3].value, "40.0%");
    }

    #[test]
    fn test_by_department_two_groups_first_seen() {
        let stats = Aggregator::by_department(&sample_table(), &[]).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].department, "B");
        assert_eq!(stats[1].department, "A");

        assert_close(stats[0].avg_time_to_hire_days, (40.0 + 50.0 + 33.0) / 3.0);
        assert_close(stats[0].acceptance_rate, 2.0 / 3.0 * 100.0);
        assert_eq!(stats[0].hires, 3);
        assert_close(stats[1].avg_time_to_hire_days, 25.0);
        assert_close(stats[1].acceptance_rate, 50.0);
        assert_eq!(stats[1].hires, 2);
    }

    #[test]
    fn test_by_department_with_supplied_order() {
        let order = vec!["A".to_string(), "Missing".to_string()];
        let stats = Aggregator::by_department(&sample_table(), &order).unwrap();

        let names: Vec<&str> = stats.iter().map(|s| s.department.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_by_quarter_sorted_ascending() {
        let stats = Aggregator::by_quarter(&sample_table()).unwrap();

        let labels: Vec<&str> = stats.iter().map(|q| q.quarter.as_str()).collect();
        assert_eq!(labels, vec!["Q1", "Q2", "Q3"]);
        assert_close(stats[0].attrition_rate, 50.0);
        assert_close(stats[1].attrition_rate, 100.0);
        assert_close(stats[2].attrition_rate, 0.0);
    }

    #[test]
    fn test_by_source_counts_and_shares() {
        let shares = Aggregator::by_source(&sample_table()).unwrap();

        let names: Vec<&str> = shares.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(names, vec!["Referral", "Job Board", "LinkedIn"]);
        assert_eq!(shares[0].hires, 2);
        assert_eq!(shares[2].hires, 1);

        let total: f64 = shares.iter().map(|s| s.share_pct).sum();
        assert_close(total, 100.0);

        let displayed: f64 = shares.iter().map(|s| s.share_pct.round()).sum();
        assert!((displayed - 100.0).abs() <= 1.0);
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let table = StaffingTable::from_records(Vec::new()).unwrap();

        assert!(matches!(
            Aggregator::summarize(&table, "₹"),
            Err(AggregateError::EmptyDataset(EmptyDatasetError))
        ));
        assert!(matches!(
            Aggregator::compute(&table, &[], "₹"),
            Err(AggregateError::EmptyDataset(_))
        ));
        assert!(Aggregator::by_department(&table, &[]).is_err());
        assert!(Aggregator::by_source(&table).is_err());
        assert!(Aggregator::by_quarter(&table).is_err());
    }

    #[test]
    fn test_compute_bundles_everything() {
        let data = Aggregator::compute(&sample_table(), &[], "$").unwrap();

        assert_eq!(data.total_records, 5);
        assert_eq!(data.summary.currency_symbol, "$");
        assert_eq!(data.departments.len(), 2);
        assert_eq!(data.sources.len(), 3);
        assert_eq!(data.quarters.len(), 3);
    }
}
