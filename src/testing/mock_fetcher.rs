use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::infrastructure::fetch::{FetchError, SourceFetcher};

#[derive(Debug, Clone)]
enum Canned {
    Body(Bytes),
    Status(u16),
}

/// Fetcher answering from canned responses. Unknown URLs are transport errors.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<String, Canned>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, body: Bytes) {
        self.responses.lock().unwrap().insert(url.to_string(), Canned::Body(body));
    }

    pub fn respond_status(&self, url: &str, status: u16) {
        self.responses.lock().unwrap().insert(url.to_string(), Canned::Status(status));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        let canned = self.responses.lock().unwrap().get(url).cloned();

        match canned {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            None => Err(FetchError::Transport {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            }),
        }
    }
}
