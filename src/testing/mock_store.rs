use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::infrastructure::storage::{ObjectStore, StorageError};

pub const MOCK_PUBLIC_BASE: &str = "https://storage.test/public/transcoded-audio";

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
}

/// In-memory object store with overwrite semantics.
#[derive(Debug)]
pub struct MockObjectStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    upload_error: Mutex<Option<String>>,
    public_urls: bool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            upload_error: Mutex::new(None),
            public_urls: true,
        }
    }

    /// A store that accepts uploads but cannot derive public URLs.
    pub fn without_public_urls() -> Self {
        Self {
            public_urls: false,
            ..Self::new()
        }
    }

    pub fn fail_uploads(&self, reason: &str) {
        *self.upload_error.lock().unwrap() = Some(reason.to_string());
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn upload(&self, key: &str, body: Bytes, content_type: &str) -> Result<String, StorageError> {
        if let Some(reason) = self.upload_error.lock().unwrap().clone() {
            return Err(StorageError::Rejected {
                key: key.to_string(),
                reason,
            });
        }

        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("transcoded-audio/{key}"))
    }

    fn public_url(&self, key: &str) -> Result<String, StorageError> {
        if !self.public_urls {
            return Err(StorageError::NoPublicUrl {
                key: key.to_string(),
                reason: "public access disabled".to_string(),
            });
        }
        Ok(format!("{MOCK_PUBLIC_BASE}/{key}"))
    }
}
