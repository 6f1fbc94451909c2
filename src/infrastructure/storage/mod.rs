use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod s3;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload of {key} rejected: {reason}")]
    Rejected { key: String, reason: String },

    #[error("no public URL can be derived for {key}: {reason}")]
    NoPublicUrl { key: String, reason: String },
}

/// Durable object storage that published artifacts are written to.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `body` under `key`, replacing any existing object.
    /// Returns the store path of the written object.
    async fn upload(&self, key: &str, body: Bytes, content_type: &str) -> Result<String, StorageError>;

    /// Public retrieval URL for `key`, derived from the store's URL convention.
    fn public_url(&self, key: &str) -> Result<String, StorageError>;
}
