pub mod cli;
pub mod toml_config;

pub use toml_config::{AppConfig, IndicatorConfig, SourceKind};

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "br-indicators")]
#[command(about = "Fetches Brazilian economic indicators and saves them as CSV and table images")]
pub struct CliArgs {
    /// Path to a TOML configuration file; built-in defaults when omitted
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory for the CSV files
    #[arg(long)]
    pub output_path: Option<String>,

    /// Directory for the rendered tables
    #[arg(long)]
    pub tables_path: Option<String>,

    /// Year used by sources whose tables carry only month names
    #[arg(long)]
    pub reference_year: Option<i32>,

    /// Skip table rendering
    #[arg(long)]
    pub no_tables: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliArgs {
    /// Command-line values win over the file.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(path) = &self.output_path {
            config.run.output_path = path.clone();
        }
        if let Some(path) = &self.tables_path {
            config.run.tables_path = path.clone();
        }
        if let Some(year) = self.reference_year {
            config.run.reference_year = Some(year);
        }
        if self.no_tables {
            config.run.render_tables = false;
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let args = CliArgs::parse_from([
            "br-indicators",
            "--output-path",
            "/tmp/out",
            "--reference-year",
            "2023",
            "--no-tables",
        ]);
        let mut config = AppConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.run.output_path, "/tmp/out");
        assert_eq!(config.reference_year(), 2023);
        assert!(!config.run.render_tables);
        assert_eq!(config.run.tables_path, "./tables");
    }
}
