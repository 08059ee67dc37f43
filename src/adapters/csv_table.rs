use crate::domain::model::Table;
use crate::utils::error::{FigError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;

/// Cell values read as missing data.
const MISSING_MARKERS: &[&str] = &["", "nan", "NaN", "NA"];

/// Reads a table with a header row; the first column is the index.
pub fn read_table<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.len() < 2 {
        return Err(FigError::TableError {
            message: format!(
                "expected an index column and at least one series, got {} column(s)",
                headers.len()
            ),
        });
    }

    let mut index = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); headers.len() - 1];

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        // 第 1 列是標題，資料從第 2 列開始
        let line = row + 2;
        index.push(parse_index(&record, line)?);
        for (col, values) in columns.iter_mut().enumerate() {
            let cell = record.get(col + 1).unwrap_or("");
            values.push(parse_cell(cell, &headers[col + 1], line)?);
        }
    }

    let mut table = Table::new(index);
    for (id, values) in headers.iter().skip(1).zip(columns) {
        table.push_column(id, values)?;
    }
    tracing::debug!(
        "Read table with {} rows and {} series",
        table.len(),
        table.columns().len()
    );
    Ok(table)
}

pub fn load_table<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    tracing::info!("📥 Loading table from {}", path.display());
    let file = std::fs::File::open(path)?;
    read_table(file)
}

fn parse_index(record: &StringRecord, line: usize) -> Result<f64> {
    let raw = record.get(0).unwrap_or("");
    raw.parse::<f64>().map_err(|_| FigError::TableError {
        message: format!("line {}: index value '{}' is not a number", line, raw),
    })
}

fn parse_cell(cell: &str, column: &str, line: usize) -> Result<Option<f64>> {
    if MISSING_MARKERS.contains(&cell) {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .map_err(|_| FigError::TableError {
            message: format!("line {}: value '{}' in column '{}' is not a number", line, cell, column),
        })
}
