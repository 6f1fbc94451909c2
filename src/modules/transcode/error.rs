use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("unsupported format {0:?}, expected one of: mp3, aac")]
    UnsupportedFormat(String),

    #[error("failed to fetch source audio: {0}")]
    SourceFetchFailed(String),

    #[error("transcoding failed: {0}")]
    EncodingFailed(String),

    #[error("failed to publish transcoded file: {0}")]
    PublishFailed(String),
}

impl TranscodeError {
    /// Maps a body extractor failure. Bodies cut off by the upload limit
    /// stay 413; everything else is a malformed request.
    pub fn rejected(status: StatusCode, context: &str, detail: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(detail)
        } else {
            Self::InvalidInput(format!("{context}: {detail}"))
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::SourceFetchFailed(_) | Self::EncodingFailed(_) | Self::PublishFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
