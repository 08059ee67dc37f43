use clap::Parser;
use pubfig::core::preview::render_preview;
use pubfig::core::MarkupStore;
use pubfig::utils::error::{ErrorSeverity, FigError};
use pubfig::utils::{
    logger,
    validation::{validate_required_field, Validate},
};
use pubfig::{
    load_table, plot_table_new, CliConfig, FigureConfig, FigureSaver, LocalStorage, MemoryStore,
    PgfplotsExporter,
};
use std::path::Path;

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting pubfig CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match run(&config) {
        Ok(output_path) => {
            if !config.dry_run {
                tracing::info!("✅ Figure written successfully!");
                println!("✅ Figure written successfully!");
                println!("📁 Output saved to: {}", output_path);
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Figure generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn run(cli: &CliConfig) -> Result<String, FigError> {
    let figure_config = match &cli.config {
        Some(path) => {
            tracing::info!("📋 Loading figure config from {}", path);
            FigureConfig::from_file(path)?
        }
        None => FigureConfig::default(),
    };
    figure_config.validate()?;

    // 命令列參數優先於設定檔
    let table_path = cli.table.clone().or_else(|| figure_config.figure.table.clone());
    let table_path = validate_required_field("table", &table_path)?;
    let output_path = cli
        .output
        .clone()
        .or_else(|| figure_config.figure.output.clone())
        .unwrap_or_else(|| Path::new(table_path).with_extension("tex").to_string_lossy().into_owned());

    let table = load_table(table_path)?;
    let figure = plot_table_new(&table, &figure_config.chart)?;
    let options = figure_config.save_options(cli.caption.as_deref())?;

    let preview_path = cli
        .preview
        .clone()
        .or_else(|| figure_config.preview.as_ref().map(|p| p.path.clone()));

    if cli.dry_run {
        tracing::info!("🔍 Dry run: nothing is written to disk");
        let saver = FigureSaver::new(MemoryStore::new(), PgfplotsExporter::new())
            .with_size(figure_config.article_size());
        saver.save(&figure, &output_path, &options)?;
        println!("{}", saver.store().read_file(&output_path)?);
        eprintln!("{}", serde_json::to_string_pretty(&figure)?);

        // 預覽照樣畫，只是不寫檔
        if let Some(preview_path) = preview_path {
            render_preview(&figure, Path::new(&preview_path), figure_config.preview_size(), true)?;
            eprintln!("🖼️ Preview not written in dry run: {}", preview_path);
        }
        return Ok(output_path);
    }

    let saver = FigureSaver::new(LocalStorage::new(".".to_string()), PgfplotsExporter::new())
        .with_size(figure_config.article_size());
    saver.save(&figure, &output_path, &options)?;

    if let Some(preview_path) = preview_path {
        render_preview(&figure, Path::new(&preview_path), figure_config.preview_size(), false)?;
        println!("🖼️ Preview saved to: {}", preview_path);
    }

    Ok(output_path)
}
