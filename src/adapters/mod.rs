// Adapters layer: turns external inputs (CSV files) into domain models.

pub mod csv_table;

pub use csv_table::{load_table, read_table};
