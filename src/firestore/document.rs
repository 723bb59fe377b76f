//! Documents as returned by the REST API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::FieldValue;

/// A stored document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name, `projects/{p}/databases/{d}/documents/{collection}/{id}`
    pub name: String,

    /// Field values by name
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,

    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,

    /// Last update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    /// The document id: the last segment of the resource name
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Drop the metadata, keeping the id and fields
    pub fn into_snapshot(self) -> DocumentSnapshot {
        DocumentSnapshot {
            id: self.id().to_string(),
            fields: self.fields,
        }
    }
}

/// A document's id and field map
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentSnapshot {
    /// Document id, unique within its collection
    pub id: String,

    /// Field values by name
    pub fields: BTreeMap<String, FieldValue>,
}

impl DocumentSnapshot {
    /// Create an empty snapshot
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field
    pub fn with_field<V: Into<FieldValue>>(mut self, name: &str, value: V) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }
}

/// One page of a collection listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    /// Documents on this page; absent when the collection is empty
    #[serde(default)]
    pub documents: Vec<Document>,

    /// Token for the next page, absent on the last page
    #[serde(default)]
    pub next_page_token: Option<String>,
}
