//! Boiler Room inventory client
//!
//! Headless implementation of the parts inventory screen: it mirrors the
//! `Inventory` collection of a document store, filters it client-side, and
//! deletes parts on request. [`Backend`] bundles the handles for the
//! application's backend (auth, documents, file storage).

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod firestore;
pub mod inventory;
pub mod storage;

use std::sync::Arc;

use reqwest::Client;

use crate::auth::{Auth, MemorySessionStore, SessionStore};
use crate::config::{ClientOptions, FirebaseConfig};
use crate::error::Error;
use crate::firestore::DocumentStore;
use crate::inventory::InventoryView;
use crate::storage::StorageClient;

/// Handles for one backend application.
///
/// Construct it once and pass it, or the handles it hands out, to whatever
/// needs them.
pub struct Backend {
    /// Project settings
    pub config: FirebaseConfig,
    /// HTTP client shared by all handles
    pub http_client: Client,
    /// Auth handle for the signed-in session
    pub auth: Auth,
    /// Client options
    pub options: ClientOptions,
}

impl Backend {
    /// Create the backend handles with default options
    ///
    /// # Example
    ///
    /// ```
    /// use boiler_room_inventory::{config::FirebaseConfig, Backend};
    ///
    /// let config = FirebaseConfig::new("api-key", "demo.firebaseapp.com", "demo", "demo.appspot.com");
    /// let backend = Backend::new(config).unwrap();
    /// let view = backend.inventory();
    /// assert_eq!(view.collection(), "Inventory");
    /// ```
    pub fn new(config: FirebaseConfig) -> Result<Self, Error> {
        Self::new_with_options(
            config,
            ClientOptions::default(),
            Arc::new(MemorySessionStore::new()),
        )
    }

    /// Create the backend handles with custom options and session storage
    pub fn new_with_options(
        config: FirebaseConfig,
        options: ClientOptions,
        session_store: Arc<dyn SessionStore>,
    ) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let auth = Auth::new(session_store, options.persist_session);

        log::debug!("initialized backend for project {}", config.project_id);

        Ok(Self {
            config,
            http_client,
            auth,
            options,
        })
    }

    /// Get a reference to the auth handle
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Document store client
    pub fn firestore(&self) -> DocumentStore {
        DocumentStore::new(
            &self.options.firestore_url,
            &self.config.api_key,
            &self.config.project_id,
            &self.options.database_id,
            self.http_client.clone(),
            self.auth.clone(),
        )
    }

    /// Storage client for the configured bucket
    pub fn storage(&self) -> StorageClient {
        StorageClient::new(
            &self.options.storage_url,
            &self.config.storage_bucket,
            self.http_client.clone(),
            self.auth.clone(),
        )
    }

    /// Inventory view backed by this application's document store
    pub fn inventory(&self) -> InventoryView<DocumentStore> {
        InventoryView::new(Arc::new(self.firestore()))
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{ClientOptions, FirebaseConfig};
    pub use crate::error::{Error, InventoryError};
    pub use crate::inventory::{InventoryBackend, InventoryItem, InventoryView, ItemCard};
    pub use crate::Backend;
}
