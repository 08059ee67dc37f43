pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{load_table, read_table};
pub use crate::config::cli::{LocalStorage, MemoryStore};
pub use crate::config::toml_config::FigureConfig;
pub use crate::core::{
    figsize::ArticleSize,
    labeled_lines::{plot_table, plot_table_new, LineChartSpec},
    save::{FigureSaver, SaveOptions},
    tikz::PgfplotsExporter,
};
pub use crate::utils::error::{FigError, Result};
