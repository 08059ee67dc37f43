use crate::core::annotate::{SubplotTitleOptions, SubplotTitles, DEFAULT_GROUP_NAME};
use crate::core::figsize::ArticleSize;
use crate::core::labeled_lines::LineChartSpec;
use crate::core::preview::DEFAULT_PREVIEW_SIZE;
use crate::core::save::{SaveOptions, XLabelLoc};
use crate::domain::model::{GridPos, Orientation, StyleSet};
use crate::utils::error::{FigError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range,
    validate_scale, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 欄位標籤的最大字元數（標籤會畫在線尾，太長會把 x 軸推得很遠）
pub const MAX_LABEL_CHARS: usize = 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub figure: FigureSection,
    pub chart: LineChartSpec,
    pub size: SizeConfig,
    pub save: SaveConfig,
    pub titles: Vec<TitleConfig>,
    pub preview: Option<PreviewConfig>,
}

/// Input and output files; the command line overrides these.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureSection {
    pub table: Option<String>,
    pub output: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeConfig {
    /// document textwidth in cm; the article default when absent
    pub textwidth_cm: Option<f64>,
    pub width_scale: Option<f64>,
    pub height_scale: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub group_name: Option<String>,
    pub orientation: Orientation,
    pub title_text_width: Option<String>,
    pub xlabel_loc: Option<XLabelLoc>,
    pub tikzpicture_parameters: Option<StyleSet>,
    pub groupstyle_parameters: Option<StyleSet>,
    pub clean_figure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleConfig {
    /// 0-based; one index or `[a, b]`
    pub loc: Vec<usize>,
    pub ref_name: String,
    pub subtitle_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    pub path: String,
    pub width_px: Option<u32>,
    pub height_px: Option<u32>,
}

impl FigureConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FigError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FigError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| FigError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn article_size(&self) -> ArticleSize {
        match self.size.textwidth_cm {
            Some(width) => ArticleSize::from_textwidth(width),
            None => ArticleSize::new(),
        }
    }

    pub fn group_name(&self) -> &str {
        self.save.group_name.as_deref().unwrap_or(DEFAULT_GROUP_NAME)
    }

    /// Node code for every configured subplot title, in file order.
    pub fn subplot_titles(&self) -> Result<SubplotTitles> {
        let mut options = SubplotTitleOptions {
            group_name: self.group_name().to_string(),
            orientation: self.save.orientation,
            ..Default::default()
        };
        options.text_width = match &self.save.title_text_width {
            Some(width) => width.clone(),
            None => self.article_size().w(Some(0.9)).to_string(),
        };

        let mut titles = SubplotTitles::new(options);
        for title in &self.titles {
            let loc = GridPos::from_slice(&title.loc)?;
            titles.add(loc, &title.ref_name, &title.subtitle_id, &title.title);
        }
        Ok(titles)
    }

    /// Save options for this figure; `caption` overrides `[figure] caption`.
    pub fn save_options(&self, caption: Option<&str>) -> Result<SaveOptions> {
        let size = self.article_size();
        let titles = self.subplot_titles()?;
        Ok(SaveOptions {
            node_code: titles.node_code().map(str::to_string),
            caption: caption
                .map(str::to_string)
                .or_else(|| self.figure.caption.clone()),
            width: Some(size.w(self.size.width_scale).to_string()),
            height: Some(size.h(self.size.height_scale).to_string()),
            xlabel_loc: self.save.xlabel_loc,
            extra_tikzpicture_parameters: self.save.tikzpicture_parameters.clone(),
            extra_groupstyle_parameters: self.save.groupstyle_parameters.clone(),
            group_name: self.group_name().to_string(),
            clean_figure: self.save.clean_figure,
        })
    }

    pub fn preview_size(&self) -> (u32, u32) {
        let (default_w, default_h) = DEFAULT_PREVIEW_SIZE;
        match &self.preview {
            Some(p) => (p.width_px.unwrap_or(default_w), p.height_px.unwrap_or(default_h)),
            None => DEFAULT_PREVIEW_SIZE,
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(table) = &self.figure.table {
            validate_path("figure.table", table)?;
            validate_file_extension("figure.table", table, &["csv"])?;
        }
        if let Some(output) = &self.figure.output {
            validate_path("figure.output", output)?;
            validate_file_extension("figure.output", output, &["tex", "tikz", "pgf"])?;
        }

        if let Some(width) = self.size.textwidth_cm {
            validate_scale("size.textwidth_cm", width)?;
        }
        if let Some(scale) = self.size.width_scale {
            validate_scale("size.width_scale", scale)?;
        }
        if let Some(scale) = self.size.height_scale {
            validate_scale("size.height_scale", scale)?;
        }

        if let Some(labels) = &self.chart.col_labels {
            for (col, label) in labels {
                let field = format!("chart.col_labels.{}", col);
                validate_non_empty_string(&field, label)?;
                validate_range(&field, label.chars().count(), 1, MAX_LABEL_CHARS)?;
            }
        }

        if let Some(group_name) = &self.save.group_name {
            validate_non_empty_string("save.group_name", group_name)?;
        }

        for (i, title) in self.titles.iter().enumerate() {
            GridPos::from_slice(&title.loc)?;
            validate_non_empty_string(&format!("titles[{}].ref_name", i), &title.ref_name)?;
            validate_non_empty_string(&format!("titles[{}].subtitle_id", i), &title.subtitle_id)?;
        }

        if let Some(preview) = &self.preview {
            validate_path("preview.path", &preview.path)?;
            validate_file_extension("preview.path", &preview.path, &["svg"])?;
            let (w, h) = self.preview_size();
            validate_range("preview.width_px", w, 64, 8192)?;
            validate_range("preview.height_px", h, 64, 8192)?;
        }

        Ok(())
    }
}

impl Validate for FigureConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
