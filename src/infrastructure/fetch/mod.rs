use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod client;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out")]
    Timeout { url: String },
}

/// Client used to download remote source audio.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// GETs `url` and buffers the whole body. Non-2xx answers are errors.
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError>;
}
