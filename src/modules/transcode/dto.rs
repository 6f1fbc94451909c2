use super::model::{AudioFormat, TranscodeResult};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Encoding hints accepted in the query string.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TranscodeQuery {
    /// Output format, `mp3` (default) or `aac`
    pub format: Option<String>,
    /// Target bitrate in kbps
    pub bitrate: Option<i64>,
    /// Source duration in seconds, used to pick a bitrate tier
    pub duration: Option<f64>,
}

/// JSON or form body for transcoding a remote file.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeUrlRequest {
    #[serde(alias = "fileUrl")]
    #[validate(url(message = "audioUrl must be a valid URL"))]
    pub audio_url: Option<String>,
    #[validate(length(min = 1, max = 255, message = "fileName must be 1-255 characters"))]
    pub file_name: Option<String>,
    pub format: Option<String>,
    pub bitrate: Option<i64>,
    pub duration: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeResponse {
    pub public_url: String,
    pub storage_key: String,
    pub original_filename: String,
    pub original_size: u64,
    pub transcoded_size: u64,
    pub format: AudioFormat,
    pub content_type: String,
}

impl From<TranscodeResult> for TranscodeResponse {
    fn from(r: TranscodeResult) -> Self {
        Self {
            public_url: r.public_url,
            storage_key: r.storage_key,
            original_filename: r.original_filename_stem,
            original_size: r.input_byte_size,
            transcoded_size: r.output_byte_size,
            format: r.format,
            content_type: r.mime_type.to_string(),
        }
    }
}
