//! Configuration - built-in defaults, optional TOML file, command-line overrides.

mod cli;

pub use cli::CliArgs;

use crate::charts::RenderOptions;
use crate::stats::DEFAULT_CURRENCY_SYMBOL;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_INPUT: &str = "Staffing_Dashboard_Data.xlsx";
pub const DEFAULT_OUTPUT: &str = "ABC_Tech_Staffing_Dashboard.png";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub json_output: Option<PathBuf>,
    pub dpi: u32,
    pub width_in: f64,
    pub height_in: f64,
    pub currency_symbol: String,
    pub department_order: Vec<String>,
    pub display: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            json_output: None,
            dpi: 300,
            width_in: 18.0,
            height_in: 10.0,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            department_order: Vec::new(),
            display: true,
        }
    }
}

impl DashboardConfig {
    /// Defaults, then the config file named by `--config`, then flags.
    ///
    /// Values are checked once, when the pipeline is built from the result.
    pub fn resolve(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(args);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(input) = &args.input {
            self.input = input.clone();
        }
        if let Some(output) = &args.output {
            self.output = output.clone();
        }
        if let Some(json) = &args.json {
            self.json_output = Some(json.clone());
        }
        if let Some(dpi) = args.dpi {
            self.dpi = dpi;
        }
        if let Some(width) = args.width_in {
            self.width_in = width;
        }
        if let Some(height) = args.height_in {
            self.height_in = height;
        }
        if let Some(symbol) = &args.currency_symbol {
            self.currency_symbol = symbol.clone();
        }
        if !args.department_order.is_empty() {
            self.department_order = args.department_order.clone();
        }
        if args.no_display {
            self.display = false;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dpi == 0 {
            return Err(ConfigError::Invalid("dpi must be greater than zero".into()));
        }
        for (name, value) in [("width_in", self.width_in), ("height_in", self.height_in)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        let is_png = self
            .output
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if !is_png {
            return Err(ConfigError::Invalid(format!(
                "output must be a .png file, got {}",
                self.output.display()
            )));
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::from_inches(self.width_in, self.height_in, self.dpi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_report() {
        let config = DashboardConfig::default();
        assert_eq!(config.input, PathBuf::from("Staffing_Dashboard_Data.xlsx"));
        assert_eq!(config.output, PathBuf::from("ABC_Tech_Staffing_Dashboard.png"));
        assert_eq!(config.currency_symbol, "₹");
        assert!(config.display);

        let options = config.render_options();
        assert_eq!((options.width_px, options.height_px), (5400, 3000));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
            input = "data/hires.csv"
            dpi = 150
            department_order = ["Sales", "Engineering"]
            "#,
        )
        .unwrap();

        assert_eq!(config.input, PathBuf::from("data/hires.csv"));
        assert_eq!(config.dpi, 150);
        assert_eq!(config.department_order, vec!["Sales", "Engineering"]);
        assert_eq!(config.width_in, 18.0);
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        fs::write(&path, "dpi = 150\ncurrency_symbol = \"$\"\n").unwrap();

        let args = CliArgs {
            config: Some(path),
            dpi: Some(200),
            no_display: true,
            ..Default::default()
        };
        let config = DashboardConfig::resolve(&args).unwrap();

        assert_eq!(config.dpi, 200);
        assert_eq!(config.currency_symbol, "$");
        assert!(!config.display);
    }

    #[test]
    fn test_resolve_leaves_checks_to_validate() {
        let args = CliArgs {
            dpi: Some(0),
            ..Default::default()
        };
        let config = DashboardConfig::resolve(&args).unwrap();

        assert_eq!(config.dpi, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = DashboardConfig::default();
        config.dpi = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = DashboardConfig::default();
        config.height_in = -1.0;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.output = PathBuf::from("dashboard.jpg");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "dpi = \"high\"").unwrap();

        let err = DashboardConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }
}
