use crate::config::env::{self, EnvKey, Lookup};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_BUCKET: &str = "transcoded-audio";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub storage: StorageConfig,
    pub ffmpeg_path: String,
    pub temp_dir: PathBuf,
    pub encoder_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub public_url: Option<String>,
    pub access_key: String,
    pub secret_key: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_lookup(&env::process_env)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            server_port: required_port(lookup)?,
            storage: StorageConfig {
                endpoint: required(lookup, EnvKey::StorageEndpoint)?,
                bucket: env::get_or(lookup, EnvKey::StorageBucket, DEFAULT_BUCKET),
                region: env::get_or(lookup, EnvKey::StorageRegion, "us-east-1"),
                public_url: env::get_opt(lookup, EnvKey::StoragePublicUrl),
                access_key: required(lookup, EnvKey::StorageAccessKey)?,
                secret_key: required(lookup, EnvKey::StorageSecretKey)?,
            },
            ffmpeg_path: env::get_or(lookup, EnvKey::FfmpegPath, "ffmpeg"),
            temp_dir: env::get_opt(lookup, EnvKey::TempDir)
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            encoder_timeout_secs: env::get_parsed(lookup, EnvKey::EncoderTimeoutSecs, 300),
            fetch_timeout_secs: env::get_parsed(lookup, EnvKey::FetchTimeoutSecs, 60),
            max_upload_bytes: env::get_parsed(lookup, EnvKey::MaxUploadBytes, DEFAULT_MAX_UPLOAD_BYTES),
            cors_allowed_origins: env::get_opt(lookup, EnvKey::CorsAllowedOrigins)
                .map(|raw| parse_origin_list(&raw))
                .unwrap_or_default(),
        })
    }
}

fn required(lookup: Lookup<'_>, key: EnvKey) -> Result<String, ConfigError> {
    let name = key.as_str();
    env::get_opt(lookup, key).ok_or(ConfigError::Missing(name))
}

fn required_port(lookup: Lookup<'_>) -> Result<u16, ConfigError> {
    let key = EnvKey::ServerPort.as_str();
    let raw = required(lookup, EnvKey::ServerPort)?;
    raw.trim()
        .parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .ok_or(ConfigError::Invalid { key, value: raw })
}

/// Splits a comma-separated origin list, dropping blanks and trailing slashes.
pub fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
