//! Error types for board and bindings file loading.

use boardkit_diagnostics::{Category, Diagnostic, DiagnosticCode};
use boardkit_platform::PlatformError;

/// Errors that can occur when loading a board definition or bindings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A value is present but inconsistent with the schema.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The declarations parsed but do not form a valid platform.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl ConfigError {
    /// Returns the diagnostic code, delegating to the platform error if any.
    pub fn code(&self) -> DiagnosticCode {
        let number = match self {
            ConfigError::IoError(_) => 301,
            ConfigError::ParseError(_) => 302,
            ConfigError::MissingField(_) => 303,
            ConfigError::ValidationError(_) => 304,
            ConfigError::Platform(err) => return err.code(),
        };
        DiagnosticCode::new(Category::Config, number)
    }

    /// Converts this error into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigError::Platform(err) => err.to_diagnostic(),
            other => Diagnostic::error(other.code(), other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("device.part".to_string());
        assert_eq!(format!("{err}"), "missing required field: device.part");
        assert_eq!(err.code().to_string(), "C303");
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        assert!(format!("{err}").starts_with("failed to read configuration:"));
    }

    #[test]
    fn platform_errors_keep_their_code() {
        let err = ConfigError::from(PlatformError::DuplicateResource { key: "led#0".into() });
        assert_eq!(err.to_string(), "duplicate resource 'led#0'");
        assert_eq!(err.code().to_string(), "P102");
        assert_eq!(err.to_diagnostic().code.to_string(), "P102");
    }
}
