//! Patches an exported pgfplots body into a complete `tikzpicture`.
//!
//! The exporter writes the body without the picture environment so that extra
//! nodes can go in before `\end{tikzpicture}`. The three steps are:
//!
//! 1. [`add_begin_content`] puts `\begin{tikzpicture}[...]` at the top,
//! 2. [`subplot_title`] builds `\node` code titling one cell of the group plot,
//! 3. [`add_end_content`] appends that node code, `\end{tikzpicture}` and a caption.
//!
//! Titles written as nodes with `\subcaption` can be referenced from the
//! document with `\ref{<ref_name>_<subtitle_id>}`.

use crate::core::figsize::ArticleSize;
use crate::domain::model::{GridPos, Orientation, StyleSet};
use crate::domain::ports::MarkupStore;
use crate::utils::error::Result;

pub const BEGIN_TIKZPICTURE: &str = "\\begin{tikzpicture}";
pub const END_TIKZPICTURE: &str = "\\end{tikzpicture}";
pub const DEFAULT_GROUP_NAME: &str = "my plots";

const LINE_BREAKS: &[char] = &['\r', '\n'];

/// `\begin{tikzpicture}` with optional `[...]` options, one option per line.
pub fn begin_directive(extra_tikzpicture_parameters: Option<&StyleSet>) -> String {
    let mut line = BEGIN_TIKZPICTURE.to_string();
    if let Some(params) = extra_tikzpicture_parameters {
        line.push('[');
        line.push_str(&params.join(",\n"));
        line.push(']');
    }
    line.trim_end_matches(LINE_BREAKS).to_string()
}

/// Writes the picture-opening directive at offset 0 of an existing file.
pub fn add_begin_content<S: MarkupStore + ?Sized>(
    store: &S,
    path: &str,
    extra_tikzpicture_parameters: Option<&StyleSet>,
) -> Result<()> {
    let header = format!("{}\n", begin_directive(extra_tikzpicture_parameters));
    tracing::debug!("Prepending {} bytes to {}", header.len(), path);
    store.prepend(path, &header)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubplotTitleOptions {
    pub group_name: String,
    /// narrower than the plot by default to avoid overfull boxes
    pub text_width: String,
    pub orientation: Orientation,
}

impl Default for SubplotTitleOptions {
    fn default() -> Self {
        Self {
            group_name: DEFAULT_GROUP_NAME.to_string(),
            text_width: ArticleSize::new().w(Some(0.9)).to_string(),
            orientation: Orientation::Column,
        }
    }
}

/// Node code titling one group plot cell, e.g. `(a) baseline` labelled `sim_a`.
///
/// pgfplots names group cells `c<column>r<row>` starting at 1; `loc` is 0-based.
pub fn subplot_title(
    loc: GridPos,
    ref_name: &str,
    subtitle_id: &str,
    plt_title: &str,
    options: &SubplotTitleOptions,
) -> String {
    let cell = loc.resolve(options.orientation);
    format!(
        "\n\\node [text width={w}, align=center, anchor=south] at ({group} c{col}r{row}.north) \
         {{\\subcaption{{\\label{{{name}_{id}}} {title}}}}};",
        w = options.text_width,
        group = options.group_name,
        col = cell.col,
        row = cell.row,
        name = ref_name,
        id = subtitle_id,
        title = plt_title,
    )
}

/// Collects subplot titles into one node code string.
#[derive(Debug, Clone, Default)]
pub struct SubplotTitles {
    options: SubplotTitleOptions,
    code: String,
}

impl SubplotTitles {
    pub fn new(options: SubplotTitleOptions) -> Self {
        Self {
            options,
            code: String::new(),
        }
    }

    pub fn add(&mut self, loc: GridPos, ref_name: &str, subtitle_id: &str, plt_title: &str) -> &mut Self {
        self.code
            .push_str(&subplot_title(loc, ref_name, subtitle_id, plt_title, &self.options));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn node_code(&self) -> Option<&str> {
        if self.code.is_empty() {
            None
        } else {
            Some(&self.code)
        }
    }
}

/// Text appended by [`add_end_content`].
pub fn end_content(node_code: Option<&str>, caption: Option<&str>) -> String {
    let mut trailer = String::new();
    if let Some(code) = node_code {
        trailer.push_str("\n\n");
        trailer.push_str(code.trim_matches(LINE_BREAKS));
    }
    trailer.push_str("\n\n");
    trailer.push_str(END_TIKZPICTURE);
    if let Some(caption) = caption {
        trailer.push_str(&format!("\n\n\\caption{{{}}}\n", caption));
    }
    trailer
}

/// Appends node code, the picture-closing directive and an optional caption.
pub fn add_end_content<S: MarkupStore + ?Sized>(
    store: &S,
    path: &str,
    node_code: Option<&str>,
    caption: Option<&str>,
) -> Result<()> {
    let trailer = end_content(node_code, caption);
    tracing::debug!("Appending {} bytes to {}", trailer.len(), path);
    store.append(path, &trailer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::MemoryStore;

    fn store_with(content: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store.insert("fig.tex", content);
        store
    }

    #[test]
    fn test_begin_without_parameters() {
        let store = store_with("BODY");
        add_begin_content(&store, "fig.tex", None).unwrap();
        assert_eq!(store.get("fig.tex").unwrap(), "\\begin{tikzpicture}\nBODY");
    }

    #[test]
    fn test_begin_with_parameters_joins_per_line() {
        let store = store_with("BODY");
        let params: StyleSet = ["every node/.style={font=\\small}", "baseline"].into_iter().collect();
        add_begin_content(&store, "fig.tex", Some(&params)).unwrap();
        assert_eq!(
            store.get("fig.tex").unwrap(),
            "\\begin{tikzpicture}[every node/.style={font=\\small},\nbaseline]\nBODY"
        );
    }

    #[test]
    fn test_begin_preserves_original_content() {
        let original = "\\begin{groupplot}\n% body\n\\end{groupplot}\n";
        let store = store_with(original);
        add_begin_content(&store, "fig.tex", None).unwrap();
        let patched = store.get("fig.tex").unwrap();
        let (_, tail) = patched.split_once('\n').unwrap();
        assert_eq!(tail, original);
    }

    #[test]
    fn test_begin_requires_existing_file() {
        let store = MemoryStore::new();
        assert!(add_begin_content(&store, "missing.tex", None).is_err());
    }

    #[test]
    fn test_end_without_nodes_or_caption() {
        let store = store_with("BODY");
        add_end_content(&store, "fig.tex", None, None).unwrap();
        assert_eq!(store.get("fig.tex").unwrap(), "BODY\n\n\\end{tikzpicture}");
    }

    #[test]
    fn test_end_trims_node_code_newlines() {
        let store = store_with("BODY");
        add_end_content(&store, "fig.tex", Some("\n\\node at (0,0) {x};\n\n"), Some("Flights")).unwrap();
        assert_eq!(
            store.get("fig.tex").unwrap(),
            "BODY\n\n\\node at (0,0) {x};\n\n\\end{tikzpicture}\n\n\\caption{Flights}\n"
        );
    }

    #[test]
    fn test_begin_then_end_scenario() {
        let store = store_with("BODY");
        add_begin_content(&store, "fig.tex", None).unwrap();
        add_end_content(&store, "fig.tex", None, Some("Test")).unwrap();
        assert_eq!(
            store.get("fig.tex").unwrap(),
            "\\begin{tikzpicture}\nBODY\n\n\\end{tikzpicture}\n\n\\caption{Test}\n"
        );
    }

    #[test]
    fn test_subplot_title_pair_in_column_orientation() {
        let code = subplot_title(
            GridPos::Pair(1, 2),
            "sim",
            "a",
            "baseline",
            &SubplotTitleOptions {
                text_width: "7.4cm".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(
            code,
            "\n\\node [text width=7.4cm, align=center, anchor=south] at (my plots c2r3.north) \
             {\\subcaption{\\label{sim_a} baseline}};"
        );
    }

    #[test]
    fn test_subplot_title_scalar_orientations() {
        let column = SubplotTitleOptions::default();
        assert!(subplot_title(GridPos::Scalar(1), "sim", "b", "t", &column).contains("(my plots c1r2.north)"));

        let row = SubplotTitleOptions {
            group_name: "flights".to_string(),
            orientation: Orientation::Row,
            ..Default::default()
        };
        assert!(subplot_title(GridPos::Scalar(1), "sim", "b", "t", &row).contains("(flights c2r1.north)"));
    }

    #[test]
    fn test_default_text_width_is_ninety_percent() {
        let expected = ArticleSize::new().w(Some(0.9)).to_string();
        assert_eq!(SubplotTitleOptions::default().text_width, expected);
        assert!(expected.ends_with("cm"));
    }

    #[test]
    fn test_subplot_titles_accumulate() {
        let mut titles = SubplotTitles::default();
        assert!(titles.node_code().is_none());
        titles
            .add(GridPos::Scalar(0), "sim", "a", "baseline")
            .add(GridPos::Scalar(1), "sim", "b", "shock");
        let code = titles.node_code().unwrap();
        assert_eq!(code.matches("\\node").count(), 2);
        assert!(code.contains("\\label{sim_b} shock"));
    }
}
