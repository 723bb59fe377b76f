//! File storage: image URIs and object downloads

mod types;

use reqwest::Client;

use crate::auth::Auth;
use crate::error::Error;
use crate::fetch::Fetch;

pub use types::*;

/// Client for the file storage bucket
#[derive(Clone)]
pub struct StorageClient {
    /// Base URL of the storage REST endpoint
    url: String,

    /// Default bucket
    bucket: String,

    /// HTTP client used for requests
    client: Client,

    /// Source of the bearer token
    auth: Auth,
}

impl StorageClient {
    /// Create a new StorageClient
    pub(crate) fn new(url: &str, bucket: &str, client: Client, auth: Auth) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            client,
            auth,
        }
    }

    fn object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/v0/b/{}/o/{}",
            self.url,
            bucket,
            urlencoding::encode(path.trim_start_matches('/'))
        )
    }

    /// URL serving the content of `path` in the default bucket
    pub fn download_url(&self, path: &str) -> String {
        format!("{}?alt=media", self.object_url(&self.bucket, path))
    }

    /// Turn the `Image` value of an item into a URL that can be fetched.
    ///
    /// `http(s)://` URIs pass through, `gs://bucket/path` and bare object
    /// paths become download URLs. Blank values yield `None`.
    pub fn resolve_image_uri(&self, uri: &str) -> Option<String> {
        let uri = uri.trim();
        if uri.is_empty() {
            return None;
        }
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return Some(uri.to_string());
        }
        if let Some(rest) = uri.strip_prefix("gs://") {
            let (bucket, path) = rest.split_once('/')?;
            if path.is_empty() {
                return None;
            }
            return Some(format!("{}?alt=media", self.object_url(bucket, path)));
        }
        Some(self.download_url(uri))
    }

    /// Fetch the metadata of an object
    pub async fn metadata(&self, path: &str) -> Result<ObjectMetadata, Error> {
        let url = self.object_url(&self.bucket, path);
        let token = self.auth.id_token();

        Fetch::get(&self.client, &url)
            .bearer_auth(token.as_deref())
            .execute::<ObjectMetadata>()
            .await
            .map_err(|e| match e {
                Error::Api { status, message } => {
                    Error::storage(format!("metadata of {} failed ({}): {}", path, status, message))
                }
                other => other,
            })
    }

    /// Download an object's bytes
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, Error> {
        let url = self.object_url(&self.bucket, path);
        let token = self.auth.id_token();

        let response = Fetch::get(&self.client, &url)
            .query("alt", "media")
            .bearer_auth(token.as_deref())
            .execute_checked()
            .await?;

        let bytes = response.bytes().await?;
        log::debug!("downloaded {} ({} bytes)", path, bytes.len());
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemorySessionStore;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(uri: &str) -> StorageClient {
        let auth = Auth::new(Arc::new(MemorySessionStore::new()), false);
        StorageClient::new(uri, "demo.appspot.com", Client::new(), auth)
    }

    #[test]
    fn test_resolve_image_uri() {
        let storage = client("https://firebasestorage.googleapis.com");

        assert_eq!(
            storage.resolve_image_uri("https://cdn.example.com/valve.png").as_deref(),
            Some("https://cdn.example.com/valve.png")
        );
        assert_eq!(
            storage.resolve_image_uri("gs://other.appspot.com/parts/valve 2.png").as_deref(),
            Some("https://firebasestorage.googleapis.com/v0/b/other.appspot.com/o/parts%2Fvalve%202.png?alt=media")
        );
        assert_eq!(
            storage.resolve_image_uri("parts/pump.jpg").as_deref(),
            Some("https://firebasestorage.googleapis.com/v0/b/demo.appspot.com/o/parts%2Fpump.jpg?alt=media")
        );
        assert_eq!(storage.resolve_image_uri("   "), None);
        assert_eq!(storage.resolve_image_uri("gs://bucket-only"), None);
    }

    #[tokio::test]
    async fn test_download_and_metadata() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v0/b/demo.appspot.com/o/parts%2Fpump.jpg"))
            .and(query_param("alt", "media"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v0/b/demo.appspot.com/o/parts%2Fpump.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "parts/pump.jpg",
                "bucket": "demo.appspot.com",
                "contentType": "image/jpeg",
                "size": "3",
                "downloadTokens": "tok-1,tok-2"
            })))
            .mount(&mock_server)
            .await;

        let storage = client(&mock_server.uri());
        let bytes = storage.download("parts/pump.jpg").await.unwrap();
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);

        let meta = storage.metadata("parts/pump.jpg").await.unwrap();
        assert_eq!(meta.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(meta.size_bytes(), Some(3));
        assert_eq!(meta.download_token(), Some("tok-1"));
    }
}
