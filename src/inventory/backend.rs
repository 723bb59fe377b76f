//! The two remote capabilities the inventory view relies on

use async_trait::async_trait;

use crate::error::Error;
use crate::firestore::{DocumentSnapshot, DocumentStore};

/// Remote document collection the view mirrors
#[async_trait]
pub trait InventoryBackend: Send + Sync {
    /// Enumerate every document in `collection`, in backend order
    async fn list_documents(&self, collection: &str) -> Result<Vec<DocumentSnapshot>, Error>;

    /// Delete one document
    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), Error>;
}

#[async_trait]
impl InventoryBackend for DocumentStore {
    async fn list_documents(&self, collection: &str) -> Result<Vec<DocumentSnapshot>, Error> {
        let documents = DocumentStore::list_documents(self, collection).await?;
        Ok(documents.into_iter().map(|d| d.into_snapshot()).collect())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<(), Error> {
        DocumentStore::delete_document(self, collection, id).await
    }
}

