//! Staffing Dashboard - hiring KPIs from a spreadsheet, rendered as one PNG.
//!
//! Loads hiring records, computes the four headline KPIs plus per-department,
//! per-source and per-quarter breakdowns, and draws them on a 4x3 grid.

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod stats;

pub use charts::{DashboardRenderer, RenderError, RenderOptions};
pub use config::{CliArgs, ConfigError, DashboardConfig};
pub use data::{DataLoadError, DataLoader, HiringRecord, StaffingTable};
pub use export::ExportError;
pub use pipeline::{DashboardError, DashboardPipeline};
pub use stats::{AggregateError, Aggregator, DashboardData, EmptyDatasetError, KpiSummary};
