//! Error types for the blog pipeline

use thiserror::Error;

/// Result type alias using `BlogError`.
pub type Result<T> = std::result::Result<T, BlogError>;

/// Errors surfaced while fetching, assembling or rendering posts.
#[derive(Error, Debug)]
pub enum BlogError {
    /// The requested identifier has no corresponding document.
    #[error("Document not found: {uid}")]
    NotFound { uid: String },

    /// Network or transport failure talking to the content API.
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// The content API answered with a non-success status.
    #[error("Content API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// A document that does not fit the post shape.
    #[error("Malformed document {uid}: {message}")]
    MalformedDocument { uid: String, message: String },

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// Configuration loading or parsing error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlogError {
    /// Create a not-found error for a uid.
    pub fn not_found(uid: impl Into<String>) -> Self {
        Self::NotFound { uid: uid.into() }
    }

    /// Create a malformed-document error.
    pub fn malformed(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            uid: uid.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error means the document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
