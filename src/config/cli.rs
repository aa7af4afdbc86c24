use clap::Parser;
use std::path::PathBuf;

/// Render a staffing KPI dashboard from a spreadsheet of hiring records.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "staffing-dashboard", version, about)]
pub struct CliArgs {
    /// Input spreadsheet (.xlsx, .xls, .ods) or CSV export
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TOML config file; command-line flags take precedence over it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output resolution in dots per inch
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Canvas width in inches
    #[arg(long)]
    pub width_in: Option<f64>,

    /// Canvas height in inches
    #[arg(long)]
    pub height_in: Option<f64>,

    /// Symbol placed before the cost-per-hire amount
    #[arg(long)]
    pub currency_symbol: Option<String>,

    /// Department display order, comma separated
    #[arg(long, value_delimiter = ',')]
    pub department_order: Vec<String>,

    /// Also write the computed KPIs as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Do not open the image in the system viewer
    #[arg(long)]
    pub no_display: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "staffing-dashboard",
            "--input",
            "hires.csv",
            "--dpi",
            "150",
            "--department-order",
            "Sales,IT",
            "--no-display",
        ]);

        assert_eq!(args.input, Some(PathBuf::from("hires.csv")));
        assert_eq!(args.dpi, Some(150));
        assert_eq!(args.department_order, vec!["Sales", "IT"]);
        assert!(args.no_display);
        assert!(!args.verbose);
        assert!(args.output.is_none());
    }
}
