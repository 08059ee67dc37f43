use pubfig::core::annotate::{
    add_begin_content, add_end_content, subplot_title, SubplotTitleOptions, SubplotTitles,
};
use pubfig::core::MarkupStore;
use pubfig::domain::model::{GridPos, Orientation, StyleSet};
use pubfig::LocalStorage;
use std::fs;
use tempfile::TempDir;

fn storage_with(content: &str) -> (TempDir, LocalStorage) {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("fig.tex"), content).unwrap();
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    (temp_dir, storage)
}

#[test]
fn test_wrap_exported_body_on_disk() {
    let (temp_dir, storage) = storage_with("BODY");

    add_begin_content(&storage, "fig.tex", None).unwrap();
    add_end_content(&storage, "fig.tex", None, Some("Test")).unwrap();

    let content = fs::read_to_string(temp_dir.path().join("fig.tex")).unwrap();
    assert_eq!(
        content,
        "\\begin{tikzpicture}\nBODY\n\n\\end{tikzpicture}\n\n\\caption{Test}\n"
    );
}

#[test]
fn test_prepend_keeps_original_bytes() {
    let original = "\\definecolor{color0}{RGB}{68,119,170}\n\n\\begin{groupplot}[]\n\\end{groupplot}\n";
    let (_temp_dir, storage) = storage_with(original);

    let params: StyleSet = ["every node/.style={font=\\small}"].into_iter().collect();
    add_begin_content(&storage, "fig.tex", Some(&params)).unwrap();

    let content = storage.read_file("fig.tex").unwrap();
    let (first_line, tail) = content.split_once('\n').unwrap();
    assert_eq!(first_line, "\\begin{tikzpicture}[every node/.style={font=\\small}]");
    assert_eq!(tail, original);
}

#[test]
fn test_append_without_nodes_adds_only_closing_directive() {
    let (_temp_dir, storage) = storage_with("BODY");
    add_end_content(&storage, "fig.tex", None, None).unwrap();
    assert_eq!(storage.read_file("fig.tex").unwrap(), "BODY\n\n\\end{tikzpicture}");
}

#[test]
fn test_missing_file_is_an_error_and_not_created() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

    assert!(add_begin_content(&storage, "missing.tex", None).is_err());
    assert!(add_end_content(&storage, "missing.tex", None, Some("x")).is_err());
    assert!(!temp_dir.path().join("missing.tex").exists());
}

#[test]
fn test_titles_for_two_by_two_grid() {
    let (_temp_dir, storage) = storage_with("BODY");

    let options = SubplotTitleOptions {
        group_name: "sims".to_string(),
        text_width: "7cm".to_string(),
        orientation: Orientation::Column,
    };
    let mut titles = SubplotTitles::new(options.clone());
    let cells: [(usize, usize, &str); 4] = [(0, 0, "a"), (1, 0, "b"), (0, 1, "c"), (1, 1, "d")];
    for (i, (a, b, id)) in cells.into_iter().enumerate() {
        titles.add(GridPos::Pair(a, b), "sim", id, &format!("run {}", i));
    }

    add_begin_content(&storage, "fig.tex", None).unwrap();
    add_end_content(&storage, "fig.tex", titles.node_code(), Some("Four runs")).unwrap();

    let content = storage.read_file("fig.tex").unwrap();
    for anchor in ["c1r1", "c2r1", "c1r2", "c2r2"] {
        assert!(content.contains(&format!("(sims {}.north)", anchor)), "missing {}", anchor);
    }
    assert_eq!(
        subplot_title(GridPos::Pair(1, 0), "sim", "b", "run 1", &options).trim_start(),
        "\\node [text width=7cm, align=center, anchor=south] at (sims c2r1.north) {\\subcaption{\\label{sim_b} run 1}};"
    );
    assert!(content.ends_with("\\end{tikzpicture}\n\n\\caption{Four runs}\n"));
    assert_eq!(content.matches("\\end{tikzpicture}").count(), 1);
}
