//! Line chart with a text label at the end of every line instead of a legend.

use crate::core::axes::{Axes, Figure, LineStyle};
use crate::core::palette::{bright_cycle, BLACK};
use crate::core::ticks::math_labels;
use crate::domain::model::Table;
use crate::utils::error::{FigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const LINE_WIDTH: f64 = 1.5;
pub const LABEL_FONT_SIZE: f64 = 20.0;
const GRID_LINE_WIDTH: f64 = 0.3;

/// Free text placed on the axes, e.g. "N simulations".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddText {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineChartSpec {
    /// columns to draw, in order; all table columns when `None`
    pub cols: Option<Vec<String>>,
    /// display label per column; the column id when absent
    pub col_labels: Option<HashMap<String, String>>,
    pub title: String,
    pub x_title: String,
    pub y_title: Option<String>,
    /// vertical nudge for individual end labels
    pub label_edit: HashMap<String, f64>,
    /// right x limit; derived from the label lengths when `None`
    pub x_lim: Option<f64>,
    pub add_text: Option<AddText>,
    pub xticks: Option<Vec<f64>>,
    pub yticks: Option<Vec<f64>>,
}

impl LineChartSpec {
    fn selected_columns(&self, table: &Table) -> Vec<String> {
        self.cols.clone().unwrap_or_else(|| table.column_ids())
    }

    fn label_for(&self, col: &str) -> String {
        self.col_labels
            .as_ref()
            .and_then(|labels| labels.get(col))
            .cloned()
            .unwrap_or_else(|| col.to_string())
    }
}

/// Plots `table` on a fresh 1x1 figure.
pub fn plot_table_new(table: &Table, spec: &LineChartSpec) -> Result<Figure> {
    let mut figure = Figure::new();
    plot_table(table, spec, figure.axes_mut(0, 0)?)?;
    Ok(figure)
}

/// Draws every selected column of `table` on `ax` and labels the line ends.
pub fn plot_table(table: &Table, spec: &LineChartSpec, ax: &mut Axes) -> Result<()> {
    let step_size = table.step_size()?;
    let (Some(first_idx), Some(last_idx)) = (table.first_index(), table.last_index()) else {
        return Err(FigError::TableError {
            message: "table has no index values".to_string(),
        });
    };
    if !table.is_uniform() {
        tracing::warn!(
            "⚠️ Index spacing is not uniform; end labels use the average step {}",
            step_size
        );
    }

    let cols = spec.selected_columns(table);
    // 先確認所有欄位都存在，避免畫到一半才失敗
    for col in &cols {
        table.column(col)?;
    }
    let labels: Vec<String> = cols.iter().map(|c| spec.label_for(c)).collect();

    for ((col, label), color) in cols.iter().zip(labels.iter()).zip(bright_cycle()) {
        let series = table.column(col)?;
        let points = table
            .index()
            .iter()
            .copied()
            .zip(series.values.iter().copied())
            .collect();
        ax.plot(label.clone(), points, color, LINE_WIDTH);

        match table.last_valid(col)? {
            Some((last_col_idx, value)) => {
                let y_pos = value + spec.label_edit.get(col).copied().unwrap_or(0.0);
                ax.text(last_col_idx + step_size / 2.0, y_pos, label.clone(), color, LABEL_FONT_SIZE);
            }
            None => tracing::warn!("⚠️ Column '{}' has no values; no end label drawn", col),
        }
    }
    ax.remove_legend();

    let max_x = match spec.x_lim {
        Some(x_lim) => x_lim,
        None => {
            // 有 col_labels 時看全部標籤，不只被選到的欄位
            let len_labels = match &spec.col_labels {
                Some(col_labels) => col_labels.values().map(|l| l.chars().count()).max(),
                None => cols.iter().map(|c| c.chars().count()).max(),
            }
            .unwrap_or(0);
            last_idx + f64::max(0.25 * (last_idx - first_idx), (len_labels as f64 * 0.5).floor())
        }
    };
    let (min_x, _) = ax.get_xlim();
    ax.set_xlim(min_x, max_x);
    tracing::debug!("x range set to [{}, {}]", min_x, max_x);

    let xticks = spec.xticks.clone().unwrap_or_else(|| ax.get_xticks());
    let new_xticks: Vec<f64> = xticks
        .into_iter()
        .filter(|t| *t >= min_x && *t <= last_idx)
        .collect();

    let (min_ytick, max_ytick) = match &spec.yticks {
        Some(ticks) => ticks
            .iter()
            .copied()
            .filter(|t| t.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| (lo.min(t), hi.max(t))),
        None => ax.get_ylim(),
    };
    let yticks = spec.yticks.clone().unwrap_or_else(|| ax.get_yticks());
    let new_yticks: Vec<f64> = yticks
        .into_iter()
        .filter(|t| *t >= min_ytick && *t <= max_ytick)
        .collect();

    ax.set_xticks(new_xticks.clone());
    ax.set_yticks(new_yticks.clone());
    ax.set_xticklabels(math_labels(&new_xticks))?;
    ax.set_yticklabels(math_labels(&new_yticks))?;

    ax.xlabel = spec.x_title.clone();
    if let Some(y_title) = &spec.y_title {
        ax.ylabel = y_title.clone();
    }

    // 分組圖裡 minor ticks 會出錯，一律清空
    ax.clear_minor_ticks();

    if let Some(add_text) = &spec.add_text {
        ax.text(add_text.x, add_text.y, add_text.text.clone(), BLACK, LABEL_FONT_SIZE);
    }

    ax.title = spec.title.clone();
    ax.set_ygrid(BLACK, GRID_LINE_WIDTH, LineStyle::Dotted);
    ax.spines.hide_all();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::palette::{Color, TOL_BRIGHT};

    fn two_column_table() -> Table {
        Table::new((0..12).map(f64::from).collect())
            .with_column("A", (0..12).map(|i| Some(100.0 + i as f64)).collect())
            .unwrap()
            .with_column(
                "B",
                (0..12)
                    .map(|i| if i < 8 { Some(200.0 + i as f64) } else { None })
                    .collect(),
            )
            .unwrap()
    }

    #[test]
    fn test_one_label_per_column_at_half_step() {
        let table = two_column_table();
        let figure = plot_table_new(&table, &LineChartSpec::default()).unwrap();
        let ax = figure.axes(0, 0).unwrap();

        assert_eq!(ax.lines.len(), 2);
        assert_eq!(ax.texts.len(), 2);
        assert_eq!(ax.texts[0].text, "A");
        assert_eq!(ax.texts[0].x, 11.5);
        assert_eq!(ax.texts[0].y, 111.0);
        assert_eq!(ax.texts[1].text, "B");
        assert_eq!(ax.texts[1].x, 7.5);
        assert_eq!(ax.texts[1].y, 207.0);
        assert_eq!(ax.texts[0].color, TOL_BRIGHT[0]);
        assert_eq!(ax.texts[1].color, TOL_BRIGHT[1]);
    }

    #[test]
    fn test_label_edit_and_custom_labels() {
        let table = two_column_table();
        let spec = LineChartSpec {
            cols: Some(vec!["B".to_string()]),
            col_labels: Some(HashMap::from([("B".to_string(), "series b".to_string())])),
            label_edit: HashMap::from([("B".to_string(), -5.0)]),
            ..Default::default()
        };
        let figure = plot_table_new(&table, &spec).unwrap();
        let ax = figure.axes(0, 0).unwrap();

        assert_eq!(ax.lines.len(), 1);
        assert_eq!(ax.lines[0].label, "series b");
        assert_eq!(ax.texts.len(), 1);
        assert_eq!(ax.texts[0].y, 202.0);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let table = two_column_table();
        let spec = LineChartSpec {
            cols: Some(vec!["A".to_string(), "Z".to_string()]),
            ..Default::default()
        };
        let mut ax = Axes::new();
        let err = plot_table(&table, &spec, &mut ax).unwrap_err();
        assert!(matches!(err, FigError::MissingColumnError { column } if column == "Z"));
        assert!(ax.lines.is_empty());
    }

    #[test]
    fn test_single_row_table_is_rejected() {
        let table = Table::new(vec![1.0]).with_column("A", vec![Some(1.0)]).unwrap();
        assert!(matches!(
            plot_table_new(&table, &LineChartSpec::default()),
            Err(FigError::TableError { .. })
        ));
    }

    #[test]
    fn test_automatic_right_limit() {
        let table = two_column_table();
        let figure = plot_table_new(&table, &LineChartSpec::default()).unwrap();
        // 0.25 * 11 beats floor(1 * 0.5)
        assert_eq!(figure.axes(0, 0).unwrap().get_xlim().1, 13.75);

        let spec = LineChartSpec {
            col_labels: Some(HashMap::from([(
                "A".to_string(),
                "a rather long label text".to_string(),
            )])),
            ..Default::default()
        };
        let figure = plot_table_new(&table, &spec).unwrap();
        // floor(24 * 0.5) = 12
        assert_eq!(figure.axes(0, 0).unwrap().get_xlim().1, 23.0);
    }

    #[test]
    fn test_right_limit_counts_unselected_labels() {
        let table = two_column_table();
        let spec = LineChartSpec {
            cols: Some(vec!["A".to_string()]),
            col_labels: Some(HashMap::from([
                ("A".to_string(), "a".to_string()),
                ("B".to_string(), "a very long label here".to_string()),
            ])),
            ..Default::default()
        };
        let figure = plot_table_new(&table, &spec).unwrap();
        let ax = figure.axes(0, 0).unwrap();
        assert_eq!(ax.lines.len(), 1);
        // floor(22 * 0.5) = 11
        assert_eq!(ax.get_xlim().1, 22.0);
    }

    #[test]
    fn test_uneven_index_uses_average_step() {
        let table = Table::new(vec![0.0, 1.0, 5.0])
            .with_column("A", vec![Some(1.0), Some(2.0), Some(3.0)])
            .unwrap();
        assert!(!table.is_uniform());

        let figure = plot_table_new(&table, &LineChartSpec::default()).unwrap();
        let ax = figure.axes(0, 0).unwrap();
        assert_eq!(ax.lines[0].points.len(), 3);
        // (5 - 0) / 2 = 2.5
        assert_eq!(ax.texts[0].x, 5.0 + 2.5 / 2.0);
        assert_eq!(ax.texts[0].y, 3.0);
    }

    #[test]
    fn test_ticks_are_filtered_and_labelled() {
        let table = two_column_table();
        let spec = LineChartSpec {
            x_lim: Some(15.0),
            xticks: Some(vec![-5.0, 0.0, 5.0, 10.0, 15.0]),
            yticks: Some(vec![150.0, 700.0]),
            ..Default::default()
        };
        let figure = plot_table_new(&table, &spec).unwrap();
        let ax = figure.axes(0, 0).unwrap();

        assert_eq!(ax.xticks.as_deref(), Some(&[0.0, 5.0, 10.0][..]));
        assert_eq!(
            ax.xticklabels.as_deref(),
            Some(&["$0$".to_string(), "$5$".to_string(), "$10$".to_string()][..])
        );
        assert_eq!(ax.yticks.as_deref(), Some(&[150.0, 700.0][..]));
        assert_eq!(ax.get_ylim().1, 700.0);
        assert_eq!(ax.get_xlim().1, 15.0);
    }

    #[test]
    fn test_auto_ticks_stay_inside_view() {
        let table = two_column_table();
        let figure = plot_table_new(&table, &LineChartSpec::default()).unwrap();
        let ax = figure.axes(0, 0).unwrap();
        let (ylo, yhi) = ax.get_ylim();

        let xticks = ax.xticks.clone().unwrap();
        assert!(!xticks.is_empty());
        assert!(xticks.iter().all(|t| *t <= 11.0));
        let yticks = ax.yticks.clone().unwrap();
        assert!(!yticks.is_empty());
        assert!(yticks.iter().all(|t| *t >= ylo && *t <= yhi));
    }

    #[test]
    fn test_decorations_are_stripped() {
        let table = two_column_table();
        let spec = LineChartSpec {
            title: "Passengers".to_string(),
            y_title: Some("count".to_string()),
            add_text: Some(AddText {
                x: 1.0,
                y: 0.95,
                text: "N simulations".to_string(),
            }),
            ..Default::default()
        };
        let figure = plot_table_new(&table, &spec).unwrap();
        let ax = figure.axes(0, 0).unwrap();

        assert!(!ax.legend);
        assert!(ax.spines.all_hidden());
        assert_eq!(ax.ygrid.map(|g| g.style), Some(LineStyle::Dotted));
        assert_eq!(ax.minor_xticks.as_deref(), Some(&[][..]));
        assert_eq!(ax.minor_yticks.as_deref(), Some(&[][..]));
        assert_eq!(ax.title, "Passengers");
        assert_eq!(ax.xlabel, "");
        assert_eq!(ax.ylabel, "count");
        assert_eq!(ax.texts.last().unwrap().text, "N simulations");
    }

    #[test]
    fn test_colors_cycle_past_palette() {
        let n = TOL_BRIGHT.len() + 1;
        let mut table = Table::new(vec![0.0, 1.0]);
        for i in 0..n {
            table.push_column(format!("c{}", i), vec![Some(i as f64), Some(i as f64)]).unwrap();
        }
        let figure = plot_table_new(&table, &LineChartSpec::default()).unwrap();
        let ax = figure.axes(0, 0).unwrap();
        assert_eq!(ax.lines[7].color, BLACK);
        assert_eq!(ax.lines[n - 1].color, Color::from_hex("#4477AA").unwrap());
        assert_eq!(ax.texts[7].color, BLACK);
    }
}
