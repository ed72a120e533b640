use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostureError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Malformed posture store '{path}': {reason}")]
    MalformedStoreError { path: String, reason: String },

    #[error("Invalid landmark frame at line {line}: {reason}")]
    InvalidFrameError { line: u64, reason: String },
}

pub type Result<T> = std::result::Result<T, PostureError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Storage,
    Input,
    Validation,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a session that ended with this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl PostureError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PostureError::ConfigError { .. }
            | PostureError::ConfigValidationError { .. }
            | PostureError::InvalidConfigValueError { .. }
            | PostureError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PostureError::MalformedStoreError { .. } | PostureError::SerializationError(_) => {
                ErrorCategory::Storage
            }
            PostureError::InvalidFrameError { .. } => ErrorCategory::Input,
            PostureError::ValidationError { .. } => ErrorCategory::Validation,
            PostureError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單一壞掉的影格不影響整個工作階段
            PostureError::InvalidFrameError { .. } => ErrorSeverity::Low,
            PostureError::ValidationError { .. } => ErrorSeverity::Medium,
            PostureError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Errors the frame loop can log and move past.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PostureError::InvalidFrameError { .. } | PostureError::ValidationError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PostureError::IoError(_) => {
                "Check that the store and frame paths exist and are readable/writable".to_string()
            }
            PostureError::SerializationError(_) => {
                "The posture data could not be encoded as JSON; re-register the posture".to_string()
            }
            PostureError::ConfigError { .. } | PostureError::ConfigValidationError { .. } => {
                "Fix the configuration file syntax and try again".to_string()
            }
            PostureError::InvalidConfigValueError { field, .. } => {
                format!("Provide a valid value for '{}'", field)
            }
            PostureError::MissingConfigError { field } => {
                format!("Set '{}' in the configuration or on the command line", field)
            }
            PostureError::ValidationError { .. } => {
                "Enter a non-empty posture name after capturing a hand".to_string()
            }
            PostureError::MalformedStoreError { path, .. } => format!(
                "Repair or remove '{}'; it must map names to arrays of 5 angles",
                path
            ),
            PostureError::InvalidFrameError { .. } => {
                "Each line must be a JSON frame with 21 landmarks per hand".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Storage => format!("Posture store problem: {}", self),
            ErrorCategory::Input => format!("Landmark input problem: {}", self),
            ErrorCategory::Validation => format!("Invalid input: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_errors_are_recoverable() {
        let err = PostureError::InvalidFrameError {
            line: 3,
            reason: "expected 21 landmarks".to_string(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_malformed_store_is_fatal() {
        let err = PostureError::MalformedStoreError {
            path: "registered_postures.json".to_string(),
            reason: "expected an object".to_string(),
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("registered_postures.json"));
        assert!(err.user_friendly_message().starts_with("Posture store problem"));
    }

    #[test]
    fn test_exit_codes_by_severity() {
        assert_eq!(ErrorSeverity::Low.exit_code(), 1);
        assert_eq!(ErrorSeverity::Medium.exit_code(), 2);
        assert_eq!(ErrorSeverity::High.exit_code(), 1);
        let io = PostureError::IoError(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.severity().exit_code(), 3);
    }
}
