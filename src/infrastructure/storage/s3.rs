use super::{ObjectStore, StorageError};
use crate::config::settings::StorageConfig;
use async_trait::async_trait;
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, config::BehaviorVersion, config::Credentials, config::Region};
use bytes::Bytes;
use tracing::info;
use url::Url;

#[derive(Clone)]
pub struct StorageService {
    pub client: Client,
    pub bucket: String,
    endpoint: String,
    public_base: Option<String>,
}

impl StorageService {
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "static",
        );

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO and Supabase storage
            .build();

        let client = Client::from_conf(sdk_config);

        info!(endpoint = %config.endpoint, bucket = %config.bucket, "✅ Object storage client ready");

        Self {
            client,
            bucket: config.bucket.clone(),
            endpoint: config.endpoint.clone(),
            public_base: config.public_url.clone(),
        }
    }
}

/// Builds the public URL of `key`.
///
/// With an explicit public base the key is appended to it. Otherwise the
/// path-style address `<endpoint>/<bucket>/<key>` is used.
pub fn derive_public_url(
    endpoint: &str,
    bucket: &str,
    public_base: Option<&str>,
    key: &str,
) -> Result<String, StorageError> {
    let no_url = |reason: String| StorageError::NoPublicUrl {
        key: key.to_string(),
        reason,
    };

    if key.is_empty() {
        return Err(no_url("empty key".to_string()));
    }

    let (base, segments) = match public_base {
        Some(base) => (base, vec![key]),
        None => (endpoint, vec![bucket, key]),
    };

    let mut url = Url::parse(base).map_err(|e| no_url(format!("invalid base {base:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(no_url(format!("{base:?} cannot be a base URL")));
    }

    url.path_segments_mut()
        .map_err(|_| no_url(format!("{base:?} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);

    Ok(url.to_string())
}

#[async_trait]
impl ObjectStore for StorageService {
    async fn upload(&self, key: &str, body: Bytes, content_type: &str) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Rejected {
                key: key.to_string(),
                reason: aws_sdk_s3::error::DisplayErrorContext(e).to_string(),
            })?;

        Ok(format!("{}/{}", self.bucket, key))
    }

    fn public_url(&self, key: &str) -> Result<String, StorageError> {
        derive_public_url(&self.endpoint, &self.bucket, self.public_base.as_deref(), key)
    }
}
