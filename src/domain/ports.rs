use crate::core::axes::Figure;
use crate::domain::model::ExportOptions;
use crate::utils::error::Result;

/// Scoped access to markup files. Every call opens and closes its own handle.
pub trait MarkupStore {
    fn read_file(&self, path: &str) -> Result<String>;

    /// Creates or truncates `path`.
    fn write_file(&self, path: &str, content: &str) -> Result<()>;

    /// Read-modify-write: the whole file is read once, then `header` followed by
    /// the original content is written from offset 0. The file must exist.
    fn prepend(&self, path: &str, header: &str) -> Result<()>;

    /// Append-only write; existing bytes are never touched. The file must exist.
    fn append(&self, path: &str, trailer: &str) -> Result<()>;
}

/// Turns a figure into markup text (the body between the picture directives).
pub trait Exporter {
    fn export(&self, figure: &Figure, options: &ExportOptions) -> Result<String>;
}
