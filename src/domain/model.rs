use crate::utils::error::{FigError, Result};
use serde::{Deserialize, Serialize};

/// One value column of a [`Table`]; `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub values: Vec<Option<f64>>,
}

/// Rows keyed by a numeric index, one [`Series`] per column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    index: Vec<f64>,
    columns: Vec<Series>,
}

impl Table {
    pub fn new(index: Vec<f64>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    pub fn with_column(mut self, id: impl Into<String>, values: Vec<Option<f64>>) -> Result<Self> {
        self.push_column(id, values)?;
        Ok(self)
    }

    pub fn push_column(&mut self, id: impl Into<String>, values: Vec<Option<f64>>) -> Result<()> {
        let id = id.into();
        if values.len() != self.index.len() {
            return Err(FigError::TableError {
                message: format!(
                    "column '{}' has {} values but the index has {} rows",
                    id,
                    values.len(),
                    self.index.len()
                ),
            });
        }
        if self.columns.iter().any(|c| c.id == id) {
            return Err(FigError::TableError {
                message: format!("duplicate column '{}'", id),
            });
        }
        self.columns.push(Series { id, values });
        Ok(())
    }

    pub fn index(&self) -> &[f64] {
        &self.index
    }

    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    pub fn column_ids(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.id.clone()).collect()
    }

    pub fn column(&self, id: &str) -> Result<&Series> {
        self.columns
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| FigError::MissingColumnError {
                column: id.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn first_index(&self) -> Option<f64> {
        self.index.iter().copied().reduce(f64::min)
    }

    pub fn last_index(&self) -> Option<f64> {
        self.index.iter().copied().reduce(f64::max)
    }

    /// Average spacing between consecutive index values.
    pub fn step_size(&self) -> Result<f64> {
        match (self.first_index(), self.last_index()) {
            (Some(first), Some(last)) if self.len() >= 2 => Ok((last - first) / (self.len() - 1) as f64),
            _ => Err(FigError::TableError {
                message: format!(
                    "at least two rows are needed to compute the index step, got {}",
                    self.len()
                ),
            }),
        }
    }

    pub fn is_uniform(&self) -> bool {
        let Ok(step) = self.step_size() else {
            return true;
        };
        let tolerance = step.abs().max(1.0) * 1e-9;
        self.index
            .windows(2)
            .all(|w| ((w[1] - w[0]) - step).abs() <= tolerance)
    }

    /// Index and value of the last row where `id` has a value.
    pub fn last_valid(&self, id: &str) -> Result<Option<(f64, f64)>> {
        let column = self.column(id)?;
        Ok(self
            .index
            .iter()
            .zip(column.values.iter())
            .rev()
            .find_map(|(x, v)| v.map(|y| (*x, y))))
    }
}

/// Which way a single subplot index runs through the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// subplots stacked in one column; the index addresses rows
    #[default]
    Column,
    /// subplots side by side in one row; the index addresses columns
    Row,
}

/// 0-based subplot location as given by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridPos {
    Scalar(usize),
    Pair(usize, usize),
}

/// 1-based pgfplots group cell (`c{col}r{row}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn from_slice(loc: &[usize]) -> Result<Self> {
        match *loc {
            [n] => Ok(GridPos::Scalar(n)),
            [a, b] => Ok(GridPos::Pair(a, b)),
            _ => Err(FigError::GridPositionError {
                message: format!("expected one or two indices, got {:?}", loc),
            }),
        }
    }

    pub fn resolve(self, orientation: Orientation) -> GridCell {
        match (self, orientation) {
            (GridPos::Scalar(n), Orientation::Column) => GridCell { row: n + 1, col: 1 },
            (GridPos::Scalar(n), Orientation::Row) => GridCell { row: 1, col: n + 1 },
            (GridPos::Pair(a, b), Orientation::Column) => GridCell { row: b + 1, col: a + 1 },
            (GridPos::Pair(a, b), Orientation::Row) => GridCell { row: a + 1, col: b + 1 },
        }
    }
}

impl From<usize> for GridPos {
    fn from(n: usize) -> Self {
        GridPos::Scalar(n)
    }
}

impl From<(usize, usize)> for GridPos {
    fn from((a, b): (usize, usize)) -> Self {
        GridPos::Pair(a, b)
    }
}

/// Insertion-ordered set of TikZ/pgfplots option strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSet(Vec<String>);

impl StyleSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, option: impl Into<String>) -> bool {
        let option = option.into();
        if self.0.contains(&option) {
            return false;
        }
        self.0.push(option);
        true
    }

    pub fn with(mut self, option: impl Into<String>) -> Self {
        self.insert(option);
        self
    }

    /// Adds every option of `other` that is not already present.
    pub fn merge(&mut self, other: &StyleSet) {
        for option in &other.0 {
            self.insert(option.clone());
        }
    }

    pub fn contains(&self, option: &str) -> bool {
        self.0.iter().any(|o| o == option)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self, sep: &str) -> String {
        self.0.join(sep)
    }
}

impl<S: Into<String>> FromIterator<S> for StyleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = StyleSet::new();
        for option in iter {
            set.insert(option);
        }
        set
    }
}

/// Options handed to an [`Exporter`](crate::domain::ports::Exporter).
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub axis_width: String,
    pub axis_height: String,
    /// goes into `group style={...}`
    pub extra_groupstyle_parameters: StyleSet,
    /// goes into every `\nextgroupplot[...]`
    pub extra_axis_parameters: StyleSet,
}
