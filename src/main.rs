//! Staffing Dashboard - command-line entry point.

use anyhow::{Context, Result};
use clap::Parser;
use staffing_dashboard::logging::init_logger;
use staffing_dashboard::{CliArgs, DashboardConfig, DashboardPipeline};
use tracing::{error, info};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logger(args.verbose).context("Failed to initialize logging")?;

    let config = DashboardConfig::resolve(&args).context("Failed to load configuration")?;
    info!(input = %config.input.display(), "Building staffing dashboard");

    let pipeline = DashboardPipeline::new(config).context("Invalid configuration")?;
    match pipeline.run() {
        Ok(path) => {
            info!("Dashboard saved to {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Dashboard generation failed: {e}");
            Err(e).context("Dashboard generation failed")
        }
    }
}
