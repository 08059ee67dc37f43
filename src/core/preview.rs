//! Quick SVG rendering of a [`Figure`] for checking a chart without LaTeX.
//!
//! Ticks and labels follow the axes; fonts and spacing are plotters' own, so
//! the preview only approximates the typeset figure.

use crate::core::axes::{Axes, Figure};
use crate::core::palette;
use crate::core::ticks::format_general;
use crate::utils::error::{FigError, Result};
use plotters::backend::SVGBackend;
use plotters::chart::ChartBuilder;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::Text;
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, WHITE};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{Color as _, IntoFont, RGBColor};
use std::path::Path;

pub const DEFAULT_PREVIEW_SIZE: (u32, u32) = (960, 600);

const GRID_COLOR: RGBColor = RGBColor(200, 200, 200);

/// pixels between the plotting area and a tick label
const TICK_PAD: i32 = 4;

fn render_error(e: impl std::fmt::Display) -> FigError {
    FigError::RenderError {
        message: format!("SVG preview failed: {}", e),
    }
}

fn rgb(color: palette::Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

/// Renders `figure` to an SVG document held in memory.
pub fn render_svg_string(figure: &Figure, size: (u32, u32)) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let (rows, cols) = figure.shape();
        let areas = root.split_evenly((rows, cols));
        for (area, ax) in areas.iter().zip(figure.iter()) {
            draw_axes(area, ax)?;
        }
        root.present().map_err(render_error)?;
    }
    Ok(svg)
}

/// Renders `figure` to an SVG file.
pub fn render_svg(figure: &Figure, path: &Path, size: (u32, u32)) -> Result<()> {
    let svg = render_svg_string(figure, size)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, svg)?;
    tracing::info!("🖼️ Preview written to {}", path.display());
    Ok(())
}

/// Renders the preview for `path`; in a dry run the SVG is only rendered in memory.
///
/// Returns the size of the SVG document in bytes.
pub fn render_preview(figure: &Figure, path: &Path, size: (u32, u32), dry_run: bool) -> Result<usize> {
    if !dry_run {
        render_svg(figure, path, size)?;
        return Ok(std::fs::metadata(path)?.len() as usize);
    }
    let svg = render_svg_string(figure, size)?;
    tracing::info!(
        "🔍 Dry run: preview rendered ({} bytes), {} not written",
        svg.len(),
        path.display()
    );
    Ok(svg.len())
}

/// Tick label shown at `value`: the axes' own label without math delimiters.
fn tick_text(value: f64, ticks: &[f64], labels: Option<&[String]>) -> String {
    let position = ticks
        .iter()
        .position(|t| (t - value).abs() <= 1e-9 * t.abs().max(1.0));
    match (position, labels) {
        (Some(i), Some(labels)) if i < labels.len() => labels[i].trim_matches('$').to_string(),
        _ => format_general(value),
    }
}

fn draw_axes(area: &DrawingArea<SVGBackend, Shift>, ax: &Axes) -> Result<()> {
    let (xmin, xmax) = ax.get_xlim();
    let (ymin, ymax) = ax.get_ylim();
    let xticks = ax.get_xticks();
    let yticks = ax.get_yticks();

    let mut chart = ChartBuilder::on(area)
        .caption(&ax.title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(xmin..xmax, ymin..ymax)
        .map_err(render_error)?;

    // 刻度自己畫，位置與文字都照 axes
    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_labels(0)
        .y_labels(0)
        .x_desc(ax.xlabel.as_str())
        .y_desc(ax.ylabel.as_str())
        .label_style(("sans-serif", 12));
    if ax.spines.all_hidden() {
        mesh.axis_style(WHITE);
    }
    mesh.draw().map_err(render_error)?;

    let (base_x, base_y) = area.get_base_pixel();
    let x_style = ("sans-serif", 12)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for x in xticks.iter().copied().filter(|x| *x >= xmin && *x <= xmax) {
        let (px, py) = chart.backend_coord(&(x, ymin));
        let text = tick_text(x, &xticks, ax.xticklabels.as_deref());
        area.draw(&Text::new(text, (px - base_x, py - base_y + TICK_PAD), x_style.clone()))
            .map_err(render_error)?;
    }
    let y_style = ("sans-serif", 12)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    for y in yticks.iter().copied().filter(|y| *y >= ymin && *y <= ymax) {
        let (px, py) = chart.backend_coord(&(xmin, y));
        let text = tick_text(y, &yticks, ax.yticklabels.as_deref());
        area.draw(&Text::new(text, (px - base_x - TICK_PAD, py - base_y), y_style.clone()))
            .map_err(render_error)?;
    }

    if ax.ygrid.is_some() {
        for y in yticks.iter().copied().filter(|y| *y >= ymin && *y <= ymax) {
            chart
                .draw_series(LineSeries::new(vec![(xmin, y), (xmax, y)], GRID_COLOR.stroke_width(1)))
                .map_err(render_error)?;
        }
    }

    for line in &ax.lines {
        let style = rgb(line.color).stroke_width(line.linewidth.round().max(1.0) as u32);
        // 遇到缺值就斷線
        for segment in line.points.split(|(_, y)| y.is_none()) {
            let points: Vec<(f64, f64)> = segment.iter().filter_map(|(x, y)| y.map(|y| (*x, y))).collect();
            if points.is_empty() {
                continue;
            }
            chart
                .draw_series(LineSeries::new(points, style))
                .map_err(render_error)?;
        }
    }

    for label in &ax.texts {
        let font = ("sans-serif", label.font_size).into_font().color(&rgb(label.color));
        chart
            .draw_series(std::iter::once(Text::new(label.text.clone(), (label.x, label.y), font)))
            .map_err(render_error)?;
    }

    Ok(())
}
