//! JSON export of the computed dashboard figures.

use crate::stats::DashboardData;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize dashboard data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub fn to_json(data: &DashboardData) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(data)?)
}

pub fn write_json(data: &DashboardData, path: &Path) -> Result<(), ExportError> {
    let json = to_json(data)?;
    fs::write(path, json).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Dashboard data written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HiringRecord, StaffingTable};
    use crate::stats::Aggregator;

    fn sample() -> DashboardData {
        let records = vec![
            HiringRecord {
                time_to_hire_days: 30.0,
                offer_accepted: true,
                cost_per_hire: 40000.0,
                first_year_attrition: false,
                department: "Sales".into(),
                source_of_hire: "Referral".into(),
                quarter: "Q1".into(),
            },
            HiringRecord {
                time_to_hire_days: 40.0,
                offer_accepted: false,
                cost_per_hire: 50000.0,
                first_year_attrition: true,
                department: "IT".into(),
                source_of_hire: "Job Board".into(),
                quarter: "Q2".into(),
            },
        ];
        let table = StaffingTable::from_records(records).unwrap();
        Aggregator::compute(&table, &[], "₹").unwrap()
    }

    #[test]
    fn test_json_contains_summary() {
        let json: serde_json::Value = serde_json::from_str(&to_json(&sample()).unwrap()).unwrap();

        assert_eq!(json["total_records"], 2);
        assert_eq!(json["summary"]["avg_time_to_hire_days"], 35.0);
        assert_eq!(json["summary"]["offer_acceptance_rate"], 50.0);
        assert_eq!(json["departments"].as_array().unwrap().len(), 2);
        assert_eq!(json["quarters"][0]["quarter"], "Q1");
    }

    #[test]
    fn test_write_json_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("kpis.json");

        let err = write_json(&sample(), &path).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }
}
