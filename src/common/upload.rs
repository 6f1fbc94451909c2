use crate::modules::transcode::error::TranscodeError;
use crate::modules::transcode::model::UploadedFile;
use axum::extract::{
    Multipart,
    multipart::{Field, MultipartError},
};
use bytes::BytesMut;
use futures_util::StreamExt;
use tracing::{debug, error};

/// Field names that carry the audio file part.
const FILE_FIELDS: [&str; 2] = ["audio", "file"];

/// Everything a multipart transcode request can carry.
#[derive(Debug, Default)]
pub struct TranscodeForm {
    pub file: Option<UploadedFile>,
    pub source_url: Option<String>,
    pub file_name: Option<String>,
    pub format: Option<String>,
    pub bitrate: Option<i64>,
    pub duration: Option<f64>,
}

fn invalid(message: impl Into<String>) -> TranscodeError {
    TranscodeError::InvalidInput(message.into())
}

fn multipart_error(context: &str, e: MultipartError) -> TranscodeError {
    TranscodeError::rejected(e.status(), context, e.body_text())
}

async fn buffer_file(mut field: Field<'_>) -> Result<UploadedFile, TranscodeError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
    let mut buffer = BytesMut::new();

    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| {
            error!("Stream error: {}", e);
            multipart_error("upload interrupted", e)
        })?;
        buffer.extend_from_slice(&chunk);
    }

    debug!(?file_name, %content_type, bytes = buffer.len(), "received audio part");

    Ok(UploadedFile {
        data: buffer.freeze(),
        file_name,
    })
}

async fn text(field: Field<'_>, name: &str) -> Result<Option<String>, TranscodeError> {
    let value = field
        .text()
        .await
        .map_err(|e| multipart_error(&format!("unreadable field {name}"), e))?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: Option<String>) -> Result<Option<T>, TranscodeError> {
    raw.map(|v| v.parse::<T>().map_err(|_| invalid(format!("{name} must be a number, got {v:?}"))))
        .transpose()
}

/// Reads a `multipart/form-data` transcode request, buffering the audio part.
pub async fn read_transcode_form(mut multipart: Multipart) -> Result<TranscodeForm, TranscodeError> {
    let mut form = TranscodeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("malformed multipart body", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        if FILE_FIELDS.contains(&name.as_str()) {
            if form.file.is_some() {
                return Err(invalid("only one audio file per request is supported"));
            }
            form.file = Some(buffer_file(field).await?);
            continue;
        }

        match name.as_str() {
            "audioUrl" | "fileUrl" => form.source_url = text(field, &name).await?,
            "fileName" => form.file_name = text(field, &name).await?,
            "format" => form.format = text(field, &name).await?,
            "bitrate" => form.bitrate = parse_number("bitrate", text(field, &name).await?)?,
            "duration" => form.duration = parse_number("duration", text(field, &name).await?)?,
            other => debug!(field = other, "ignoring unknown multipart field"),
        }
    }

    Ok(form)
}
