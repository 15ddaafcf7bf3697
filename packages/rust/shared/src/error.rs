//! Error types for specgen.
//!
//! Library crates use [`SpecgenError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all specgen operations.
#[derive(Debug, thiserror::Error)]
pub enum SpecgenError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A line of the overrides file does not follow the directive grammar.
    #[error("could not parse override: '{line}'")]
    OverridesSyntax { line: String },

    /// The overrides stream could not be read.
    #[error("error reading overrides file: {source}")]
    OverridesRead { source: std::io::Error },

    /// The extractor failed to produce a document.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// The document could not be rewritten into the current dialect.
    #[error("conversion error: {message}")]
    Conversion { message: String },

    /// JSON/YAML/source rendering error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SpecgenError>;

impl SpecgenError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a conversion error from any displayable message.
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion {
            message: msg.into(),
        }
    }

    /// Create an extraction error from any displayable message.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a serialization error from any displayable message.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for SpecgenError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = SpecgenError::config("dir: ./api does not exist");
        assert_eq!(err.to_string(), "config error: dir: ./api does not exist");

        let err = SpecgenError::OverridesSyntax {
            line: "skip a b c d".into(),
        };
        assert_eq!(err.to_string(), "could not parse override: 'skip a b c d'");
    }

    #[test]
    fn read_and_syntax_errors_are_distinct() {
        let read = SpecgenError::OverridesRead {
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "bad utf-8"),
        };
        assert!(matches!(read, SpecgenError::OverridesRead { .. }));
        assert!(read.to_string().starts_with("error reading overrides file"));
    }
}
