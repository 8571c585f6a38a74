//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Caller supplied input the engine refuses to coerce.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity (period, file) not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading or writing input/output failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Input or output document could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The error's message without its category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::Config(msg)
            | Self::Io(msg)
            | Self::Serialization(msg)
            | Self::Internal(msg) => msg,
        }
    }

    /// Returns the process exit code for this error.
    ///
    /// Codes follow the BSD `sysexits.h` conventions.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Serialization(_) => 65,
            Self::NotFound(_) => 66,
            Self::Config(_) => 78,
            Self::Io(_) => 74,
            Self::Internal(_) => 70,
        }
    }

    /// Returns the error code for machine-readable output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(AppError::Validation(String::new()).exit_code(), 65);
        assert_eq!(AppError::Serialization(String::new()).exit_code(), 65);
        assert_eq!(AppError::NotFound(String::new()).exit_code(), 66);
        assert_eq!(AppError::Config(String::new()).exit_code(), 78);
        assert_eq!(AppError::Io(String::new()).exit_code(), 74);
        assert_eq!(AppError::Internal(String::new()).exit_code(), 70);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(AppError::Config(String::new()).error_code(), "CONFIG_ERROR");
        assert_eq!(AppError::Io(String::new()).error_code(), "IO_ERROR");
        assert_eq!(
            AppError::Serialization(String::new()).error_code(),
            "SERIALIZATION_ERROR"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::Config("msg".into()).to_string(),
            "Configuration error: msg"
        );
        assert_eq!(AppError::Io("msg".into()).to_string(), "I/O error: msg");
    }

    #[test]
    fn test_error_message_drops_prefix() {
        assert_eq!(AppError::Config("bad tolerance".into()).message(), "bad tolerance");
        assert_eq!(AppError::Internal("boom".into()).message(), "boom");
    }

    #[test]
    fn test_io_error_conversion() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, AppError::Io(ref msg) if msg == "gone"));
    }
}
