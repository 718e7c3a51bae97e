//! Error types for ingestion, indexing and search

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dcindex operations
pub type Result<T> = std::result::Result<T, Error>;

/// dcindex errors
///
/// A missing documents folder is not represented here: it ingests as an
/// empty batch.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A source file could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML source that is not well-formed
    #[error("Malformed document '{filename}': {message}")]
    MalformedDocument { filename: String, message: String },

    /// Directory enumeration error
    #[error("Failed to walk documents folder: {0}")]
    Walk(#[from] walkdir::Error),

    /// Full-text index error
    #[error("Index error: {0}")]
    Index(String),

    /// Query or query-batch error
    #[error("Query error: {0}")]
    Query(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed document error
    pub fn malformed(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an index error
    pub fn index(message: impl Into<String>) -> Self {
        Self::Index(message.into())
    }

    /// Create a query error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    /// Whether this error came from a single source file (read or parse)
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::FileRead { .. } | Self::MalformedDocument { .. })
    }
}

impl From<tantivy::TantivyError> for Error {
    fn from(err: tantivy::TantivyError) -> Self {
        Error::Index(err.to_string())
    }
}

impl From<tantivy::directory::error::OpenDirectoryError> for Error {
    fn from(err: tantivy::directory::error::OpenDirectoryError) -> Self {
        Error::Index(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_file_errors() {
        let read = Error::file_read(
            "docs/a.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(read.is_per_file());
        assert!(read.to_string().contains("docs/a.txt"));

        let malformed = Error::malformed("b.xml", "unclosed element");
        assert!(malformed.is_per_file());
        assert_eq!(
            malformed.to_string(),
            "Malformed document 'b.xml': unclosed element"
        );

        assert!(!Error::index("locked").is_per_file());
    }
}
