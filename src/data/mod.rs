//! Data module - staffing record loading and the typed table

mod loader;
mod record;

pub use loader::{DataLoadError, DataLoader};
pub use record::{
    HiringRecord, StaffingTable, COST_PER_HIRE, DEPARTMENT, FIRST_YEAR_ATTRITION, OFFER_ACCEPTED,
    QUARTER, REQUIRED_COLUMNS, SOURCE_OF_HIRE, TIME_TO_HIRE,
};
