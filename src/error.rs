//! Error types shared by the store, the index and the admin API

use std::path::{Path, PathBuf};

/// Errors raised by blog operations
#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    /// No post exists for the requested slug
    #[error("post not found: {0}")]
    NotFound(String),

    /// A write request is missing a required field or carries a bad value
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Disk read/write/delete failure
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A markdown file whose front matter does not fit the post schema
    #[error("invalid front matter in {file}: {reason}")]
    FrontMatter { file: String, reason: String },

    /// The index file could not be encoded or decoded
    #[error("index error: {0}")]
    Index(#[from] serde_json::Error),
}

impl BlogError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build a validation error for a request field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Build a "field is required" validation error
    pub fn required(field: &'static str) -> Self {
        Self::validation(field, format!("{} is required", field))
    }

    /// Whether this error is an expected client-side condition
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
