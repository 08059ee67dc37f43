use crate::core::annotate::{add_begin_content, add_end_content, DEFAULT_GROUP_NAME};
use crate::core::axes::Figure;
use crate::core::figsize::ArticleSize;
use crate::domain::model::{ExportOptions, StyleSet};
use crate::domain::ports::{Exporter, MarkupStore};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

const XLABEL_RIGHT_STYLE: &str =
    "xlabel style={at={(ticklabel* cs:1.00)}, anchor=north east, font=\\normalsize}";

/// Where the x axis label goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XLabelLoc {
    /// right end of the axis, at normal font size
    Right,
}

/// Style options used when the caller does not supply their own.
#[derive(Debug, Clone, PartialEq)]
pub struct TikzDefaults {
    pub groupstyle: StyleSet,
    pub tikzpicture: StyleSet,
}

impl Default for TikzDefaults {
    fn default() -> Self {
        Self {
            groupstyle: ["horizontal sep=1.2cm", "vertical sep=2cm"].into_iter().collect(),
            tikzpicture: ["every node/.style={font=\\small}"].into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveOptions {
    /// `\node` code placed before `\end{tikzpicture}`
    pub node_code: Option<String>,
    pub caption: Option<String>,
    /// per-subplot axis width; the article default when `None`
    pub width: Option<String>,
    pub height: Option<String>,
    pub xlabel_loc: Option<XLabelLoc>,
    pub extra_tikzpicture_parameters: Option<StyleSet>,
    pub extra_groupstyle_parameters: Option<StyleSet>,
    /// must match the group name used for subplot title anchors
    pub group_name: String,
    pub clean_figure: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            node_code: None,
            caption: None,
            width: None,
            height: None,
            xlabel_loc: None,
            extra_tikzpicture_parameters: None,
            extra_groupstyle_parameters: None,
            group_name: DEFAULT_GROUP_NAME.to_string(),
            clean_figure: false,
        }
    }
}

impl SaveOptions {
    /// Caller's group style (or the defaults), always carrying the group name.
    pub fn groupstyle_parameters(&self, defaults: &TikzDefaults) -> StyleSet {
        let mut params = self
            .extra_groupstyle_parameters
            .clone()
            .unwrap_or_else(|| defaults.groupstyle.clone());
        params.insert(format!("group name={}", self.group_name));
        params
    }

    pub fn tikzpicture_parameters(&self, defaults: &TikzDefaults) -> StyleSet {
        self.extra_tikzpicture_parameters
            .clone()
            .unwrap_or_else(|| defaults.tikzpicture.clone())
    }

    pub fn axis_parameters(&self) -> StyleSet {
        let mut params = StyleSet::new();
        if let Some(XLabelLoc::Right) = self.xlabel_loc {
            params.insert(XLABEL_RIGHT_STYLE);
        }
        params
    }
}

/// Exports a figure and patches the result into a complete `tikzpicture`.
pub struct FigureSaver<S: MarkupStore, E: Exporter> {
    store: S,
    exporter: E,
    size: ArticleSize,
    defaults: TikzDefaults,
}

impl<S: MarkupStore, E: Exporter> FigureSaver<S, E> {
    pub fn new(store: S, exporter: E) -> Self {
        Self {
            store,
            exporter,
            size: ArticleSize::default(),
            defaults: TikzDefaults::default(),
        }
    }

    pub fn with_size(mut self, size: ArticleSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_defaults(mut self, defaults: TikzDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save(&self, figure: &Figure, path: &str, options: &SaveOptions) -> Result<String> {
        tracing::info!("🖼️ Saving figure to {}", path);

        let cleaned;
        let figure = if options.clean_figure {
            cleaned = clean_figure(figure);
            &cleaned
        } else {
            figure
        };

        // Export
        let export_options = ExportOptions {
            axis_width: options
                .width
                .clone()
                .unwrap_or_else(|| self.size.w(None).to_string()),
            axis_height: options
                .height
                .clone()
                .unwrap_or_else(|| self.size.h(None).to_string()),
            extra_groupstyle_parameters: options.groupstyle_parameters(&self.defaults),
            extra_axis_parameters: options.axis_parameters(),
        };
        tracing::debug!("Export options: {:?}", export_options);
        let body = self.exporter.export(figure, &export_options)?;
        self.store.write_file(path, &body)?;
        tracing::debug!("Wrote {} bytes of figure body", body.len());

        // \begin{tikzpicture}
        let tikzpicture_parameters = options.tikzpicture_parameters(&self.defaults);
        add_begin_content(&self.store, path, Some(&tikzpicture_parameters))?;

        // nodes, \end{tikzpicture}, \caption
        add_end_content(
            &self.store,
            path,
            options.node_code.as_deref(),
            options.caption.as_deref(),
        )?;

        tracing::info!("✅ Figure saved: {}", path);
        Ok(path.to_string())
    }
}

/// Copy of `figure` without the points that fall outside each axes' x view.
pub fn clean_figure(figure: &Figure) -> Figure {
    let mut cleaned = figure.clone();
    for ax in cleaned.iter_mut() {
        let (xmin, xmax) = ax.get_xlim();
        let mut dropped = 0usize;
        for line in ax.lines.iter_mut() {
            let before = line.points.len();
            line.points.retain(|(x, _)| *x >= xmin && *x <= xmax);
            dropped += before - line.points.len();
        }
        if dropped > 0 {
            tracing::debug!("clean_figure dropped {} points outside [{}, {}]", dropped, xmin, xmax);
        }
    }
    cleaned
}
