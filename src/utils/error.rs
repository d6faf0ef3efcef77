use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API request to {url} failed with status: {status}")]
    HttpStatusError { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unexpected payload: expected a JSON array of candidates, found {found}")]
    UnexpectedPayloadError { found: String },

    #[error("Invalid date '{value}' for candidate '{candidate}' (expected format {expected})")]
    DateFormatError {
        candidate: String,
        value: String,
        expected: String,
    },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤分類，對應資料流程中的失敗位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Decode,
    Record,
    Configuration,
    Storage,
}

/// 錯誤嚴重程度，決定 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => ErrorCategory::Transport,
            EtlError::SerializationError(_) | EtlError::UnexpectedPayloadError { .. } => {
                ErrorCategory::Decode
            }
            EtlError::DateFormatError { .. } => ErrorCategory::Record,
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::IoError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常可以重試
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Decode | ErrorCategory::Record | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2, // 重試錯誤
            ErrorSeverity::High => 1,   // 處理錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) => "Check network connectivity and that the source URL is reachable",
            EtlError::HttpStatusError { .. } => "Verify the source URL and try again later",
            EtlError::SerializationError(_) | EtlError::UnexpectedPayloadError { .. } => {
                "Make sure the source returns a JSON array of candidate objects"
            }
            EtlError::DateFormatError { .. } => {
                "Fix the date in the source data or rerun with --on-invalid-date skip"
            }
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
            EtlError::IoError(_) => "Check that the output path is writable and the disk is not full",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Transport => format!("Could not fetch candidate data: {}", self),
            ErrorCategory::Decode => format!("Candidate data could not be decoded: {}", self),
            ErrorCategory::Record => format!("Candidate data contains an invalid record: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Storage => format!("Could not write output: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
