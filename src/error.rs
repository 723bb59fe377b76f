//! Error handling for the inventory client

use std::fmt;
use thiserror::Error;

/// Unified error type for backend handles
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message decoded from the error body, or the raw body
        message: String,
    },

    /// Document store errors
    #[error("Database error: {0}")]
    Database(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// JWT errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Session persistence I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new database error
    pub fn database<T: fmt::Display>(msg: T) -> Self {
        Error::Database(msg.to_string())
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Status code of a failed API call, if this error came from one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend reported the target as missing
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Failures surfaced by the inventory view.
///
/// Either variant leaves the view's item list exactly as it was before the
/// failed operation.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Enumerating the collection failed
    #[error("failed to load collection `{collection}`: {source}")]
    Fetch {
        /// Collection that was being enumerated
        collection: String,
        /// Underlying backend error
        #[source]
        source: Error,
    },

    /// Deleting a document failed
    #[error("failed to delete item `{id}`: {source}")]
    Delete {
        /// Identifier of the item that is still present
        id: String,
        /// Underlying backend error
        #[source]
        source: Error,
    },
}

impl InventoryError {
    /// The backend error behind this failure
    pub fn backend_error(&self) -> &Error {
        match self {
            InventoryError::Fetch { source, .. } | InventoryError::Delete { source, .. } => source,
        }
    }
}
