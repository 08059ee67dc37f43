//! In-memory figure model: the drawing surface the chart renderer writes to and
//! the exporters read from.

use crate::core::palette::Color;
use crate::core::ticks;
use crate::utils::error::{FigError, Result};
use serde::Serialize;

/// Fraction of the data span added on each side when a limit is automatic.
const AUTO_MARGIN: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub label: String,
    pub color: Color,
    pub linewidth: f64,
    /// `None` breaks the line
    pub points: Vec<(f64, Option<f64>)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: Color,
    pub font_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

/// Horizontal grid lines drawn at the major y ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLines {
    pub color: Color,
    pub linewidth: f64,
    pub style: LineStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Spines {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for Spines {
    fn default() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
        }
    }
}

impl Spines {
    pub fn hide_all(&mut self) {
        *self = Spines {
            top: false,
            bottom: false,
            left: false,
            right: false,
        };
    }

    pub fn all_hidden(&self) -> bool {
        !(self.top || self.bottom || self.left || self.right)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axes {
    pub lines: Vec<Line>,
    pub texts: Vec<TextLabel>,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub xticks: Option<Vec<f64>>,
    pub yticks: Option<Vec<f64>>,
    pub xticklabels: Option<Vec<String>>,
    pub yticklabels: Option<Vec<String>>,
    /// `Some(vec![])` means minor ticks were explicitly cleared
    pub minor_xticks: Option<Vec<f64>>,
    pub minor_yticks: Option<Vec<f64>>,
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    pub legend: bool,
    pub spines: Spines,
    pub ygrid: Option<GridLines>,
}

impl Axes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line series. A labelled line turns the legend on, as a dataframe plot would.
    pub fn plot(&mut self, label: impl Into<String>, points: Vec<(f64, Option<f64>)>, color: Color, linewidth: f64) {
        let label = label.into();
        if !label.is_empty() {
            self.legend = true;
        }
        self.lines.push(Line {
            label,
            color,
            linewidth,
            points,
        });
    }

    pub fn text(&mut self, x: f64, y: f64, text: impl Into<String>, color: Color, font_size: f64) {
        self.texts.push(TextLabel {
            x,
            y,
            text: text.into(),
            color,
            font_size,
        });
    }

    pub fn remove_legend(&mut self) {
        self.legend = false;
    }

    pub fn set_xlim(&mut self, lo: f64, hi: f64) {
        self.xlim = Some((lo, hi));
    }

    pub fn set_ylim(&mut self, lo: f64, hi: f64) {
        self.ylim = Some((lo, hi));
    }

    pub fn get_xlim(&self) -> (f64, f64) {
        view_limits(self.xlim, self.data_x_range(), self.xticks.as_deref())
    }

    pub fn get_ylim(&self) -> (f64, f64) {
        view_limits(self.ylim, self.data_y_range(), self.yticks.as_deref())
    }

    /// Explicit ticks, or automatic ones over the current view.
    pub fn get_xticks(&self) -> Vec<f64> {
        match &self.xticks {
            Some(t) => t.clone(),
            None => {
                let (lo, hi) = self.get_xlim();
                ticks::auto_ticks(lo, hi)
            }
        }
    }

    pub fn get_yticks(&self) -> Vec<f64> {
        match &self.yticks {
            Some(t) => t.clone(),
            None => {
                let (lo, hi) = self.get_ylim();
                ticks::auto_ticks(lo, hi)
            }
        }
    }

    /// Replaces the major x ticks; previously set labels no longer apply.
    pub fn set_xticks(&mut self, ticks: Vec<f64>) {
        self.xticks = Some(ticks);
        self.xticklabels = None;
    }

    pub fn set_yticks(&mut self, ticks: Vec<f64>) {
        self.yticks = Some(ticks);
        self.yticklabels = None;
    }

    pub fn set_xticklabels(&mut self, labels: Vec<String>) -> Result<()> {
        let n = self.get_xticks().len();
        if labels.len() != n {
            return Err(label_count_error("x", labels.len(), n));
        }
        self.xticklabels = Some(labels);
        Ok(())
    }

    pub fn set_yticklabels(&mut self, labels: Vec<String>) -> Result<()> {
        let n = self.get_yticks().len();
        if labels.len() != n {
            return Err(label_count_error("y", labels.len(), n));
        }
        self.yticklabels = Some(labels);
        Ok(())
    }

    pub fn clear_minor_ticks(&mut self) {
        self.minor_xticks = Some(Vec::new());
        self.minor_yticks = Some(Vec::new());
    }

    pub fn set_ygrid(&mut self, color: Color, linewidth: f64, style: LineStyle) {
        self.ygrid = Some(GridLines {
            color,
            linewidth,
            style,
        });
    }

    fn data_x_range(&self) -> Option<(f64, f64)> {
        extent(self.valid_points().map(|(x, _)| x))
    }

    fn data_y_range(&self) -> Option<(f64, f64)> {
        extent(self.valid_points().map(|(_, y)| y))
    }

    fn valid_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lines
            .iter()
            .flat_map(|line| line.points.iter())
            .filter_map(|(x, y)| y.map(|y| (*x, y)))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

fn label_count_error(axis: &str, got: usize, expected: usize) -> FigError {
    FigError::RenderError {
        message: format!("{} tick labels given for {} {} ticks", got, expected, axis),
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn view_limits(explicit: Option<(f64, f64)>, data: Option<(f64, f64)>, ticks: Option<&[f64]>) -> (f64, f64) {
    if let Some(lim) = explicit {
        return lim;
    }
    let (mut lo, mut hi) = match data {
        Some((lo, hi)) if hi > lo => {
            let pad = (hi - lo) * AUTO_MARGIN;
            (lo - pad, hi + pad)
        }
        Some((v, _)) => (v - 0.5, v + 0.5),
        None => (0.0, 1.0),
    };
    // 指定刻度時，視窗要能容納所有刻度
    if let Some((tlo, thi)) = ticks.and_then(|t| extent(t.iter().copied())) {
        lo = lo.min(tlo);
        hi = hi.max(thi);
    }
    (lo, hi)
}

/// A grid of axes, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    rows: usize,
    cols: usize,
    axes: Vec<Axes>,
}

impl Figure {
    pub fn new() -> Self {
        Self::subplots(1, 1)
    }

    pub fn subplots(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            axes: vec![Axes::new(); rows * cols],
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// 0-based (row, col).
    pub fn axes(&self, row: usize, col: usize) -> Result<&Axes> {
        let idx = self.flat_index(row, col)?;
        Ok(&self.axes[idx])
    }

    pub fn axes_mut(&mut self, row: usize, col: usize) -> Result<&mut Axes> {
        let idx = self.flat_index(row, col)?;
        Ok(&mut self.axes[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Axes> {
        self.axes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Axes> {
        self.axes.iter_mut()
    }

    fn flat_index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(FigError::GridPositionError {
                message: format!(
                    "axes ({}, {}) is outside a {}x{} grid",
                    row, col, self.rows, self.cols
                ),
            });
        }
        Ok(row * self.cols + col)
    }
}

impl Default for Figure {
    fn default() -> Self {
        Self::new()
    }
}
