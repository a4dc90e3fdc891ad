use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Pattern,
    Configuration,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl PatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PatchError::IoError(_) => ErrorCategory::Io,
            PatchError::RegexError(_) => ErrorCategory::Pattern,
            PatchError::SerializationError(_) => ErrorCategory::Serialization,
            PatchError::ConfigValidationError { .. }
            | PatchError::InvalidConfigValueError { .. }
            | PatchError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Serialization => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Pattern => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// 退出碼：設定錯誤 1，序列化 2，檔案系統錯誤 3
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PatchError::IoError(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "Check that the target file exists and run from the repository root".to_string()
            }
            PatchError::IoError(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                "The target file must be valid UTF-8 text".to_string()
            }
            PatchError::IoError(_) => "Check file permissions and available disk space".to_string(),
            PatchError::RegexError(_) => "Check the marker string passed with --marker".to_string(),
            PatchError::SerializationError(_) => "Retry without --json".to_string(),
            PatchError::ConfigValidationError { .. } => {
                "Check the configuration file syntax".to_string()
            }
            PatchError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            PatchError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PatchError::IoError(e) => format!("Could not read or write the target file: {}", e),
            PatchError::RegexError(e) => format!("Could not build the marker pattern: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PatchError>;
