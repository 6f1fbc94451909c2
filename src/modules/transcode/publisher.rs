use super::error::TranscodeError;
use super::invoker::EncodedArtifact;
use super::model::WorkUnit;
use crate::infrastructure::storage::ObjectStore;
use bytes::Bytes;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Published {
    pub key: String,
    pub public_url: String,
    pub byte_size: u64,
}

/// Uploads the encoded artifact under `<work-unit>.<extension>` and derives
/// its public URL. No retries: a failed upload is reported to the caller.
pub async fn publish(
    store: &dyn ObjectStore,
    work_unit: WorkUnit,
    artifact: &EncodedArtifact,
) -> Result<Published, TranscodeError> {
    let body = tokio::fs::read(&artifact.path).await.map_err(|e| {
        TranscodeError::PublishFailed(format!("cannot read encoded file {}: {}", artifact.path.display(), e))
    })?;
    if body.is_empty() {
        return Err(TranscodeError::PublishFailed("encoder produced an empty file".to_string()));
    }

    let key = work_unit.storage_key(artifact.plan.container_extension);
    let byte_size = body.len() as u64;

    let path = store
        .upload(&key, Bytes::from(body), artifact.plan.mime_type)
        .await
        .map_err(|e| TranscodeError::PublishFailed(e.to_string()))?;

    let public_url = store
        .public_url(&key)
        .map_err(|e| TranscodeError::PublishFailed(e.to_string()))?;
    if public_url.trim().is_empty() {
        return Err(TranscodeError::PublishFailed(format!("store returned no public URL for {key}")));
    }

    info!(%work_unit, %path, bytes = byte_size, content_type = artifact.plan.mime_type, "published");

    Ok(Published {
        key,
        public_url,
        byte_size,
    })
}
