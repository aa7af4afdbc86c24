//! Dashboard Pipeline
//! Load -> aggregate -> render -> (optional) JSON export -> (optional) display.

use crate::charts::{DashboardRenderer, RenderError};
use crate::config::{ConfigError, DashboardConfig};
use crate::data::{DataLoadError, DataLoader};
use crate::export::{self, ExportError};
use crate::stats::{AggregateError, Aggregator, DashboardData};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] DataLoadError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

pub struct DashboardPipeline {
    config: DashboardConfig,
}

impl DashboardPipeline {
    pub fn new(config: DashboardConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Load and aggregate only.
    pub fn compute(&self) -> Result<DashboardData, DashboardError> {
        let table = DataLoader::load(&self.config.input)?;
        debug!(rows = table.len(), "Aggregating staffing records");

        let data = Aggregator::compute(
            &table,
            &self.config.department_order,
            &self.config.currency_symbol,
        )?;
        Ok(data)
    }

    /// Run every stage. Returns the path of the written image.
    pub fn run(&self) -> Result<PathBuf, DashboardError> {
        let data = self.compute()?;

        for tile in data.summary.tiles() {
            info!("{}: {}", tile.label, tile.value);
        }

        let output = &self.config.output;
        DashboardRenderer::render(&data, &self.config.render_options(), output)?;

        if let Some(json_path) = &self.config.json_output {
            export::write_json(&data, json_path)?;
        }

        if self.config.display {
            Self::display(output);
        }

        Ok(output.clone())
    }

    /// Opening the viewer is best effort; the image is already on disk.
    fn display(path: &Path) {
        if let Err(e) = open::that(path) {
            warn!(path = %path.display(), error = %e, "Could not open dashboard image");
        }
    }
}
