//! Error types and handling for the CLI

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from racefetch-core
    #[error("{0}")]
    Core(#[from] racefetch_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {} ({})", path.display(), expected, reason)]
    InvalidFormat {
        path: PathBuf,
        expected: String,
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::InvalidFormat { .. } => 4,
            Self::Config(_) => 5,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Other { .. } => 99,
        }
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    let mut message = if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    };

    // List every failed attempt of an exhausted race
    if let Error::Core(racefetch_core::Error::Exhausted { attempts }) = error {
        for attempt in attempts {
            message.push_str(&format!(
                "\n  #{} {} ({:?}, {}ms): {}",
                attempt.position,
                attempt.provider,
                attempt.classification,
                attempt.duration.as_millis(),
                attempt.error
            ));
        }
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use racefetch_core::{ErrorClassification, FallbackAttempt};
    use std::time::Duration;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::config("bad").exit_code(), 5);
        assert_eq!(
            Error::FileNotFound {
                path: PathBuf::from("missing.yaml")
            }
            .exit_code(),
            3
        );
        let core = racefetch_core::Error::Exhausted { attempts: Vec::new() };
        assert_eq!(Error::from(core).exit_code(), 2);
    }

    #[test]
    fn test_format_exhausted() {
        let attempt = FallbackAttempt {
            provider: "primary".to_string(),
            position: 0,
            error: "Provider 'primary' timed out after 100ms".to_string(),
            classification: ErrorClassification::TimeoutError,
            started_at: chrono::Utc::now(),
            duration: Duration::from_millis(101),
        };
        let error = Error::from(racefetch_core::Error::Exhausted {
            attempts: vec![attempt],
        });

        let formatted = format_error(&error, false);
        assert!(formatted.starts_with("Error: No providers available: 1 attempt(s) failed"));
        assert!(formatted.contains("#0 primary (TimeoutError, 101ms)"));
    }
}
