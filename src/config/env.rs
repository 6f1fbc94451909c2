use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    StorageEndpoint,
    StorageBucket,
    StorageRegion,
    StoragePublicUrl,
    StorageAccessKey,
    StorageSecretKey,
    FfmpegPath,
    TempDir,
    EncoderTimeoutSecs,
    FetchTimeoutSecs,
    MaxUploadBytes,
    CorsAllowedOrigins,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::StorageEndpoint => "STORAGE_ENDPOINT",
            EnvKey::StorageBucket => "STORAGE_BUCKET",
            EnvKey::StorageRegion => "STORAGE_REGION",
            EnvKey::StoragePublicUrl => "STORAGE_PUBLIC_URL",
            EnvKey::StorageAccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::StorageSecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::TempDir => "TRANSCODE_TEMP_DIR",
            EnvKey::EncoderTimeoutSecs => "ENCODER_TIMEOUT_SECS",
            EnvKey::FetchTimeoutSecs => "FETCH_TIMEOUT_SECS",
            EnvKey::MaxUploadBytes => "MAX_UPLOAD_BYTES",
            EnvKey::CorsAllowedOrigins => "CORS_ALLOWED_ORIGINS",
        }
    }
}

/// Resolves a variable by name. [`process_env`] in production.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub fn process_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Blank values count as unset.
pub fn get_opt(lookup: Lookup<'_>, key: EnvKey) -> Option<String> {
    lookup(key.as_str()).filter(|v| !v.trim().is_empty())
}

pub fn get_or(lookup: Lookup<'_>, key: EnvKey, default: &str) -> String {
    get_opt(lookup, key).unwrap_or_else(|| default.to_string())
}

pub fn get_parsed<T: FromStr>(lookup: Lookup<'_>, key: EnvKey, default: T) -> T {
    get_opt(lookup, key)
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}
