//! pgfplots `groupplot` export of a [`Figure`].
//!
//! The output is the picture body only; `\begin{tikzpicture}` and
//! `\end{tikzpicture}` are added afterwards by [`crate::core::annotate`].

use crate::core::axes::{Axes, Figure, LineStyle};
use crate::core::palette::{Color, BLACK};
use crate::domain::model::ExportOptions;
use crate::domain::ports::Exporter;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, Default)]
pub struct PgfplotsExporter;

impl PgfplotsExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for PgfplotsExporter {
    fn export(&self, figure: &Figure, options: &ExportOptions) -> Result<String> {
        let colors = ColorNames::collect(figure);
        let mut out = String::new();

        for (color, name) in colors.defined() {
            writeln!(out, "\\definecolor{{{}}}{{RGB}}{{{},{},{}}}", name, color.r, color.g, color.b)
                .map_err(fmt_error)?;
        }
        if !colors.is_empty() {
            out.push('\n');
        }

        let (rows, cols) = figure.shape();
        let mut group_style = format!("group size={} by {}", cols, rows);
        for option in options.extra_groupstyle_parameters.iter() {
            group_style.push_str(", ");
            group_style.push_str(option);
        }
        writeln!(out, "\\begin{{groupplot}}[group style={{{}}}]", group_style).map_err(fmt_error)?;

        for ax in figure.iter() {
            write_axes(&mut out, ax, options, &colors).map_err(fmt_error)?;
        }

        out.push_str("\\end{groupplot}\n");
        tracing::debug!("Exported {}x{} group plot ({} bytes)", rows, cols, out.len());
        Ok(out)
    }
}

fn fmt_error(e: std::fmt::Error) -> crate::utils::error::FigError {
    crate::utils::error::FigError::RenderError {
        message: format!("formatting pgfplots output failed: {}", e),
    }
}

/// `color0`, `color1`, ... for every non-black colour, in first-use order.
struct ColorNames {
    order: Vec<Color>,
    names: HashMap<Color, String>,
}

impl ColorNames {
    fn collect(figure: &Figure) -> Self {
        let mut order = Vec::new();
        let mut names = HashMap::new();
        let used = figure.iter().flat_map(|ax| {
            ax.lines
                .iter()
                .map(|l| l.color)
                .chain(ax.texts.iter().map(|t| t.color))
                .chain(ax.ygrid.iter().map(|g| g.color))
        });
        for color in used {
            if color == BLACK || names.contains_key(&color) {
                continue;
            }
            names.insert(color, format!("color{}", order.len()));
            order.push(color);
        }
        Self { order, names }
    }

    fn defined(&self) -> impl Iterator<Item = (Color, &str)> {
        self.order.iter().map(|c| (*c, self.names[c].as_str()))
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn name(&self, color: Color) -> &str {
        self.names.get(&color).map(String::as_str).unwrap_or("black")
    }
}

fn write_axes(out: &mut String, ax: &Axes, options: &ExportOptions, colors: &ColorNames) -> std::fmt::Result {
    let mut opts: Vec<String> = vec![
        format!("width={}", options.axis_width),
        format!("height={}", options.axis_height),
        "tick align=outside".to_string(),
        "tick pos=left".to_string(),
    ];

    if !ax.title.is_empty() {
        opts.push(format!("title={{{}}}", ax.title));
    }
    if !ax.xlabel.is_empty() {
        opts.push(format!("xlabel={{{}}}", ax.xlabel));
    }
    if !ax.ylabel.is_empty() {
        opts.push(format!("ylabel={{{}}}", ax.ylabel));
    }

    let (xmin, xmax) = ax.get_xlim();
    let (ymin, ymax) = ax.get_ylim();
    opts.push(format!("xmin={}, xmax={}", xmin, xmax));
    opts.push(format!("ymin={}, ymax={}", ymin, ymax));

    if let Some(ticks) = &ax.xticks {
        opts.push(format!("xtick={{{}}}", join_numbers(ticks)));
    }
    if let Some(labels) = &ax.xticklabels {
        opts.push(format!("xticklabels={{{}}}", join_labels(labels)));
    }
    if let Some(ticks) = &ax.yticks {
        opts.push(format!("ytick={{{}}}", join_numbers(ticks)));
    }
    if let Some(labels) = &ax.yticklabels {
        opts.push(format!("yticklabels={{{}}}", join_labels(labels)));
    }
    if let Some(minor) = &ax.minor_xticks {
        opts.push(format!("minor xtick={{{}}}", join_numbers(minor)));
    }
    if let Some(minor) = &ax.minor_yticks {
        opts.push(format!("minor ytick={{{}}}", join_numbers(minor)));
    }

    if ax.spines.all_hidden() {
        opts.push("axis line style={draw=none}".to_string());
    } else if !ax.spines.top && !ax.spines.right {
        opts.push("axis x line*=bottom".to_string());
        opts.push("axis y line*=left".to_string());
    }

    if let Some(grid) = &ax.ygrid {
        opts.push("ymajorgrids".to_string());
        opts.push(format!(
            "y grid style={{{}, {}, line width={}pt}}",
            colors.name(grid.color),
            line_style(grid.style),
            grid.linewidth
        ));
    }

    let has_gaps = ax.lines.iter().any(|l| l.points.iter().any(|(_, y)| y.is_none()));
    if has_gaps {
        opts.push("unbounded coords=jump".to_string());
    }

    opts.extend(options.extra_axis_parameters.iter().map(str::to_string));

    writeln!(out, "\\nextgroupplot[")?;
    writeln!(out, "{}", opts.join(",\n"))?;
    writeln!(out, "]")?;

    for line in &ax.lines {
        writeln!(
            out,
            "\\addplot [line width={}pt, {}]",
            line.linewidth,
            colors.name(line.color)
        )?;
        writeln!(out, "table {{%")?;
        for (x, y) in &line.points {
            match y {
                Some(y) => writeln!(out, "{} {}", x, y)?,
                None => writeln!(out, "{} nan", x)?,
            }
        }
        writeln!(out, "}};")?;
        if ax.legend && !line.label.is_empty() {
            writeln!(out, "\\addlegendentry{{{}}}", line.label)?;
        }
    }

    for text in &ax.texts {
        writeln!(
            out,
            "\\draw (axis cs:{},{}) node[anchor=base west, text={}]{{{}}};",
            text.x,
            text.y,
            colors.name(text.color),
            text.text
        )?;
    }
    Ok(())
}

fn line_style(style: LineStyle) -> &'static str {
    match style {
        LineStyle::Solid => "solid",
        LineStyle::Dashed => "dashed",
        LineStyle::Dotted => "dotted",
    }
}

fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn join_labels(labels: &[String]) -> String {
    labels
        .iter()
        .map(|l| format!("{{{}}}", l))
        .collect::<Vec<_>>()
        .join(",")
}
