pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "pubfig")]
#[command(about = "Render CSV tables as labelled line charts in TikZ/pgfplots")]
pub struct CliConfig {
    #[arg(long, help = "CSV table; the first column is the index")]
    pub table: Option<String>,

    #[arg(long, short, help = "Output .tex file")]
    pub output: Option<String>,

    #[arg(long, short, help = "TOML figure configuration")]
    pub config: Option<String>,

    #[arg(long, help = "Also write an SVG preview to this path")]
    pub preview: Option<String>,

    #[arg(long, help = "Figure caption (overrides the config file)")]
    pub caption: Option<String>,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Print the markup instead of writing files")]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(table) = &self.table {
            validate_path("table", table)?;
            validate_file_extension("table", table, &["csv"])?;
        }
        if let Some(output) = &self.output {
            validate_path("output", output)?;
            validate_file_extension("output", output, &["tex", "tikz", "pgf"])?;
        }
        if let Some(config) = &self.config {
            validate_path("config", config)?;
            validate_file_extension("config", config, &["toml"])?;
        }
        if let Some(preview) = &self.preview {
            validate_path("preview", preview)?;
            validate_file_extension("preview", preview, &["svg"])?;
        }
        Ok(())
    }
}
