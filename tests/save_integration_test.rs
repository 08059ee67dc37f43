use pubfig::core::annotate::{SubplotTitleOptions, SubplotTitles};
use pubfig::core::save::XLabelLoc;
use pubfig::domain::model::GridPos;
use pubfig::{
    load_table, plot_table_new, read_table, ArticleSize, FigError, FigureConfig, FigureSaver,
    LineChartSpec, LocalStorage, PgfplotsExporter, SaveOptions,
};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

const FLIGHTS: &str = "\
month,1949,1950,1951
1,112,115,145
2,118,126,150
3,132,141,178
4,129,135,
5,121,125,
";

#[test]
fn test_save_labelled_chart_to_disk() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

    let table = read_table(FLIGHTS.as_bytes()).unwrap();
    let mut col_labels = HashMap::new();
    col_labels.insert("1951".to_string(), "third year".to_string());
    let spec = LineChartSpec {
        col_labels: Some(col_labels),
        title: "Passengers".to_string(),
        x_title: "Month".to_string(),
        ..Default::default()
    };
    let figure = plot_table_new(&table, &spec).unwrap();

    let mut titles = SubplotTitles::new(SubplotTitleOptions::default());
    titles.add(GridPos::Scalar(0), "flights", "a", "Monthly passengers");
    let options = SaveOptions {
        node_code: titles.node_code().map(str::to_string),
        caption: Some("Airline passengers".to_string()),
        xlabel_loc: Some(XLabelLoc::Right),
        ..Default::default()
    };

    let saver = FigureSaver::new(storage, PgfplotsExporter::new());
    let path = saver.save(&figure, "figs/flights.tex", &options).unwrap();
    assert_eq!(path, "figs/flights.tex");

    let content = fs::read_to_string(temp_dir.path().join("figs/flights.tex")).unwrap();
    assert!(content.starts_with("\\begin{tikzpicture}[every node/.style={font=\\small}]\n"));
    assert!(content.contains("group name=my plots"));
    assert!(content.contains(&format!("width={}", ArticleSize::new().w(None))));
    assert_eq!(content.matches("\\addplot").count(), 3);
    // 1951 ends at month 3, so its label sits at 3.5
    assert!(content.contains("(axis cs:3.5,178) node[anchor=base west, text=color2]{third year};"));
    assert!(content.contains("(axis cs:5.5,121)"));
    assert!(content.contains("(my plots c1r1.north) {\\subcaption{\\label{flights_a} Monthly passengers}};"));
    assert!(content.ends_with("\\end{tikzpicture}\n\n\\caption{Airline passengers}\n"));
}

#[test]
fn test_save_from_toml_config() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

    let config = FigureConfig::from_toml_str(
        r#"
[chart]
cols = ["1950"]
x_lim = 8.0

[size]
width_scale = 0.9

[save]
group_name = "airline"
tikzpicture_parameters = ["baseline"]

[[titles]]
loc = [0]
ref_name = "air"
subtitle_id = "a"
title = "1950 only"
"#,
    )
    .unwrap();

    let table = read_table(FLIGHTS.as_bytes()).unwrap();
    let figure = plot_table_new(&table, &config.chart).unwrap();
    let options = config.save_options(Some("One year")).unwrap();

    let saver = FigureSaver::new(storage, PgfplotsExporter::new()).with_size(config.article_size());
    saver.save(&figure, "air.tex", &options).unwrap();

    let content = fs::read_to_string(temp_dir.path().join("air.tex")).unwrap();
    assert!(content.starts_with("\\begin{tikzpicture}[baseline]\n"));
    assert!(content.contains("horizontal sep=1.2cm, vertical sep=2cm, group name=airline"));
    assert!(content.contains(&format!("width={}", ArticleSize::new().w(Some(0.9)))));
    assert!(content.contains("xmax=8"));
    assert_eq!(content.matches("\\addplot").count(), 1);
    assert!(content.contains("(airline c1r1.north)"));
    assert!(content.ends_with("\\caption{One year}\n"));
}

#[test]
fn test_missing_column_leaves_no_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("flights.csv");
    fs::write(&csv_path, FLIGHTS).unwrap();
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let saver = FigureSaver::new(storage, PgfplotsExporter::new());

    let spec = LineChartSpec {
        cols: Some(vec!["1951".to_string(), "1960".to_string()]),
        ..Default::default()
    };
    let result = load_table(&csv_path)
        .and_then(|table| plot_table_new(&table, &spec))
        .and_then(|figure| saver.save(&figure, "flights.tex", &SaveOptions::default()));

    let err = result.unwrap_err();
    assert!(matches!(&err, FigError::MissingColumnError { column } if column == "1960"));
    assert!(err.user_friendly_message().contains("1960"));
    assert!(!temp_dir.path().join("flights.tex").exists());
    let names: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("flights.csv")]);
}
