use std::path::Path;
use std::sync::Arc;

use super::{MockEncoder, MockFetcher, MockObjectStore};
use crate::config::settings::{AppConfig, StorageConfig};
use crate::state::AppState;

pub fn test_config(temp_dir: &Path) -> AppConfig {
    AppConfig {
        server_port: 3000,
        storage: StorageConfig {
            endpoint: "http://localhost:9000".to_string(),
            bucket: "transcoded-audio".to_string(),
            region: "us-east-1".to_string(),
            public_url: None,
            access_key: "test".to_string(),
            secret_key: "test".to_string(),
        },
        ffmpeg_path: "ffmpeg".to_string(),
        temp_dir: temp_dir.to_path_buf(),
        encoder_timeout_secs: 5,
        fetch_timeout_secs: 5,
        max_upload_bytes: 1024 * 1024,
        cors_allowed_origins: vec!["https://*.example.com".to_string()],
    }
}

pub fn test_state(
    temp_dir: &Path,
    encoder: Arc<MockEncoder>,
    fetcher: Arc<MockFetcher>,
    store: Arc<MockObjectStore>,
) -> AppState {
    AppState::new(test_config(temp_dir), encoder, fetcher, store)
}
