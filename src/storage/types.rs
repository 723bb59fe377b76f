//! Types for storage operations

use serde::{Deserialize, Serialize};

/// Metadata of a stored object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    /// Object path inside the bucket
    pub name: String,

    /// Bucket holding the object
    pub bucket: String,

    /// MIME type
    #[serde(default)]
    pub content_type: Option<String>,

    /// Size in bytes; the API sends it as a decimal string
    #[serde(default)]
    pub size: Option<String>,

    /// Creation timestamp
    #[serde(default)]
    pub time_created: Option<String>,

    /// Update timestamp
    #[serde(default)]
    pub updated: Option<String>,

    /// Comma separated download tokens
    #[serde(default)]
    pub download_tokens: Option<String>,
}

impl ObjectMetadata {
    /// Size in bytes, if reported and well formed
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref().and_then(|s| s.parse().ok())
    }

    /// The first download token, if any
    pub fn download_token(&self) -> Option<&str> {
        self.download_tokens
            .as_deref()
            .and_then(|t| t.split(',').next())
            .filter(|t| !t.is_empty())
    }
}
