//! Configuration for the backend handles

use std::env;
use std::time::Duration;

use crate::error::Error;

/// Default Firestore REST endpoint
pub const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com";

/// Default Cloud Storage for Firebase REST endpoint
pub const DEFAULT_STORAGE_URL: &str = "https://firebasestorage.googleapis.com";

/// Project settings identifying the backend application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    /// Browser API key
    pub api_key: String,

    /// Domain used by the hosted auth pages
    pub auth_domain: String,

    /// Project the document store and buckets belong to
    pub project_id: String,

    /// Default storage bucket, e.g. `my-app.appspot.com`
    pub storage_bucket: String,

    /// Sender id for cloud messaging
    pub messaging_sender_id: Option<String>,

    /// Application id
    pub app_id: Option<String>,
}

impl FirebaseConfig {
    /// Create a config with the four settings the handles need
    pub fn new(api_key: &str, auth_domain: &str, project_id: &str, storage_bucket: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            auth_domain: auth_domain.to_string(),
            project_id: project_id.to_string(),
            storage_bucket: storage_bucket.to_string(),
            messaging_sender_id: None,
            app_id: None,
        }
    }

    /// Read the config from `FIREBASE_*` environment variables
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::config(format!("{} must be set", name)))
        };

        Ok(Self {
            api_key: required("FIREBASE_API_KEY")?,
            auth_domain: required("FIREBASE_AUTH_DOMAIN")?,
            project_id: required("FIREBASE_PROJECT_ID")?,
            storage_bucket: required("FIREBASE_STORAGE_BUCKET")?,
            messaging_sender_id: lookup("FIREBASE_MESSAGING_SENDER_ID"),
            app_id: lookup("FIREBASE_APP_ID"),
        })
    }

    /// Set the messaging sender id
    pub fn with_messaging_sender_id(mut self, value: &str) -> Self {
        self.messaging_sender_id = Some(value.to_string());
        self
    }

    /// Set the application id
    pub fn with_app_id(mut self, value: &str) -> Self {
        self.app_id = Some(value.to_string());
        self
    }
}

/// Configuration options for the backend handles
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Whether the auth session is written to and restored from a session store
    pub persist_session: bool,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// The document database id
    pub database_id: String,

    /// Base URL of the document REST API
    pub firestore_url: String,

    /// Base URL of the storage REST API
    pub storage_url: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            persist_session: true,
            request_timeout: Some(Duration::from_secs(30)),
            database_id: "(default)".to_string(),
            firestore_url: DEFAULT_FIRESTORE_URL.to_string(),
            storage_url: DEFAULT_STORAGE_URL.to_string(),
        }
    }
}

impl ClientOptions {
    /// Set whether to persist the session
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the database id
    pub fn with_database_id(mut self, value: &str) -> Self {
        self.database_id = value.to_string();
        self
    }

    /// Point the document store at another endpoint (emulator, mock server)
    pub fn with_firestore_url(mut self, value: &str) -> Self {
        self.firestore_url = value.trim_end_matches('/').to_string();
        self
    }

    /// Point the storage client at another endpoint
    pub fn with_storage_url(mut self, value: &str) -> Self {
        self.storage_url = value.trim_end_matches('/').to_string();
        self
    }
}
