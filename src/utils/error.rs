use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required column(s): {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::CsvError(_) | EtlError::MissingColumns { .. } => ErrorCategory::Input,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorCategory::Output,
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EtlError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 重新執行可能成功（檔案被鎖定、磁碟暫時已滿）
            EtlError::IoError(_) => ErrorSeverity::Medium,
            EtlError::CsvError(_)
            | EtlError::MissingColumns { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            EtlError::SerializationError(_) | EtlError::ProcessingError { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    /// 退出碼：High → 1, Medium → 2, Critical → 3
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::CsvError(_) => {
                "Check that the input file is a well-formed CSV with a header line".to_string()
            }
            EtlError::IoError(_) => {
                "Check that the input file exists and the output directory is writable".to_string()
            }
            EtlError::SerializationError(_) => {
                "Re-run the tool; if the problem persists, report it with the input file".to_string()
            }
            EtlError::MissingColumns { missing } => format!(
                "Add the column(s) {} to the input header, or configure different column names",
                missing.join(", ")
            ),
            EtlError::ConfigValidationError { field, .. }
            | EtlError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the configuration", field)
            }
            EtlError::ProcessingError { .. } => {
                "Inspect the input data with --verbose for more details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::CsvError(e) => format!("Could not read the input CSV: {}", e),
            EtlError::IoError(e) => format!("File access failed: {}", e),
            EtlError::SerializationError(e) => format!("Could not encode output JSON: {}", e),
            EtlError::MissingColumns { missing } => format!(
                "The input file is missing required column(s): {}",
                missing.join(", ")
            ),
            EtlError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            EtlError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("'{}' = '{}' is not allowed: {}", field, value, reason),
            EtlError::ProcessingError { message } => format!("Processing failed: {}", message),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_is_fatal_input_error() {
        let err = EtlError::MissingColumns {
            missing: vec!["Latitude".to_string(), "Longitude".to_string()],
        };

        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("Latitude, Longitude"));
        assert!(err.recovery_suggestion().contains("Latitude"));
    }

    #[test]
    fn test_io_error_maps_to_retryable_exit_code() {
        let err = EtlError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));

        assert_eq!(err.category(), ErrorCategory::Output);
        assert_eq!(err.exit_code(), 2);
        assert!(err.user_friendly_message().contains("read-only"));
    }

    #[test]
    fn test_every_error_has_non_zero_exit_code() {
        let errors = vec![
            EtlError::InvalidConfigValueError {
                field: "input".to_string(),
                value: String::new(),
                reason: "empty".to_string(),
            },
            EtlError::ProcessingError {
                message: "boom".to_string(),
            },
            EtlError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: "bad".to_string(),
            },
        ];

        for err in errors {
            assert!(err.exit_code() > 0, "{:?}", err);
        }
    }
}
