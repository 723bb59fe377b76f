//! Document store operations through the Firestore REST API

mod document;
mod value;

use reqwest::Client;

use crate::auth::Auth;
use crate::error::Error;
use crate::fetch::Fetch;

pub use document::*;
pub use value::*;

/// Client for the document store
#[derive(Clone)]
pub struct DocumentStore {
    /// Base URL of the REST endpoint
    url: String,

    /// The browser API key
    key: String,

    /// Project id
    project_id: String,

    /// Database id, usually `(default)`
    database_id: String,

    /// Page size requested when listing
    page_size: Option<u32>,

    /// HTTP client
    client: Client,

    /// Source of the bearer token
    auth: Auth,
}

impl DocumentStore {
    /// Create a new DocumentStore
    pub(crate) fn new(
        url: &str,
        key: &str,
        project_id: &str,
        database_id: &str,
        client: Client,
        auth: Auth,
    ) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            project_id: project_id.to_string(),
            database_id: database_id.to_string(),
            page_size: None,
            client,
            auth,
        }
    }

    /// Request pages of at most `size` documents when listing
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Resource name prefix of all documents in this database
    pub fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database_id
        )
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/v1/{}/{}",
            self.url,
            self.documents_root(),
            urlencoding::encode(collection)
        )
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/{}",
            self.collection_url(collection),
            urlencoding::encode(id)
        )
    }

    /// List every document in `collection`, following page tokens.
    ///
    /// Documents are returned in the order the backend sends them.
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, Error> {
        let url = self.collection_url(collection);
        let token = self.auth.id_token();
        let page_size = self.page_size.map(|s| s.to_string());

        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = Fetch::get(&self.client, &url)
                .query("key", &self.key)
                .bearer_auth(token.as_deref());
            if let Some(ref size) = page_size {
                request = request.query("pageSize", size);
            }
            if let Some(ref page) = page_token {
                request = request.query("pageToken", page);
            }

            let page = request.execute::<ListDocumentsResponse>().await?;
            log::trace!(
                "{}: page of {} documents",
                collection,
                page.documents.len()
            );
            documents.extend(page.documents);

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        log::debug!("listed {} documents from {}", documents.len(), collection);
        Ok(documents)
    }

    /// Get a single document
    pub async fn get_document(&self, collection: &str, id: &str) -> Result<Document, Error> {
        let url = self.document_url(collection, id);
        let token = self.auth.id_token();

        Fetch::get(&self.client, &url)
            .query("key", &self.key)
            .bearer_auth(token.as_deref())
            .execute::<Document>()
            .await
    }

    /// Delete a document by id
    pub async fn delete_document(&self, collection: &str, id: &str) -> Result<(), Error> {
        let url = self.document_url(collection, id);
        let token = self.auth.id_token();

        Fetch::delete(&self.client, &url)
            .query("key", &self.key)
            .bearer_auth(token.as_deref())
            .execute_checked()
            .await?;

        log::debug!("deleted {}/{}", collection, id);
        Ok(())
    }
}
