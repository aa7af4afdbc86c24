//! Stats module - KPI aggregation and formatting

mod aggregator;
mod format;

pub use aggregator::{
    AggregateError, Aggregator, DashboardData, DepartmentStat, EmptyDatasetError, KpiSummary,
    KpiTile, QuarterAttrition, SourceShare,
};
pub use format::{format_currency, format_days, format_percent, DEFAULT_CURRENCY_SYMBOL};
