use thiserror::Error;

#[derive(Error, Debug)]
pub enum FigError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Column '{column}' not found in table")]
    MissingColumnError { column: String },

    #[error("Table error: {message}")]
    TableError { message: String },

    #[error("Invalid grid position: {message}")]
    GridPositionError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Data,
    Rendering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FigError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FigError::IoError(_) => ErrorCategory::Io,
            FigError::ConfigError { .. }
            | FigError::ConfigValidationError { .. }
            | FigError::MissingConfigError { .. }
            | FigError::InvalidConfigValueError { .. }
            | FigError::ValidationError { .. } => ErrorCategory::Configuration,
            FigError::CsvError(_)
            | FigError::SerializationError(_)
            | FigError::MissingColumnError { .. }
            | FigError::TableError { .. }
            | FigError::GridPositionError { .. } => ErrorCategory::Data,
            FigError::RenderError { .. } => ErrorCategory::Rendering,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Rendering => ErrorSeverity::Medium,
            // 檔案可能已經寫到一半
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FigError::IoError(_) => {
                "Check that the output directory exists and the markup file is writable"
            }
            FigError::CsvError(_) => {
                "Make sure the table has a header row and the first column is the index"
            }
            FigError::MissingColumnError { .. } => {
                "Check the column names listed under [chart] against the CSV header"
            }
            FigError::TableError { .. } => "The table needs at least two rows with numeric index values",
            FigError::GridPositionError { .. } => "Title positions take one or two indices, e.g. [0] or [0, 1]",
            FigError::RenderError { .. } => "Try again without --preview to get the TikZ output only",
            _ => "Review the configuration file and command line arguments",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FigError::IoError(e) => format!("Could not access the figure file: {}", e),
            FigError::MissingColumnError { column } => {
                format!("The table has no column named '{}'", column)
            }
            FigError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            FigError::MissingConfigError { field } => format!("Setting '{}' is required", field),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FigError>;
