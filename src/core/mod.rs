pub mod annotate;
pub mod axes;
pub mod figsize;
pub mod labeled_lines;
pub mod palette;
pub mod preview;
pub mod save;
pub mod ticks;
pub mod tikz;

pub use crate::domain::model::{ExportOptions, GridPos, Orientation, Series, StyleSet, Table};
pub use crate::domain::ports::{Exporter, MarkupStore};
pub use crate::utils::error::Result;
