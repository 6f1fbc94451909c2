use super::error::TranscodeError;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Output formats the service can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Aac,
}

impl AudioFormat {
    pub const SUPPORTED: [AudioFormat; 2] = [AudioFormat::Mp3, AudioFormat::Aac];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Aac => "aac",
        }
    }

    pub fn codec_id(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "libmp3lame",
            AudioFormat::Aac => "aac",
        }
    }

    pub fn container_extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Aac => "m4a",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Aac => "audio/mp4",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AudioFormat::SUPPORTED
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| TranscodeError::UnsupportedFormat(s.trim().to_string()))
    }
}

/// Resolved codec configuration for a single encoder attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingPlan {
    pub format: AudioFormat,
    pub codec_id: &'static str,
    pub container_extension: &'static str,
    pub mime_type: &'static str,
    pub bitrate_kbps: u32,
    pub channels: u8,
    pub sample_rate_hz: u32,
}

/// Per-request scope for temporary files and the storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkUnit(Uuid);

impl WorkUnit {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn storage_key(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }
}

impl Default for WorkUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    pub file_name: Option<String>,
}

/// Where the source audio comes from. Exactly one origin per request.
#[derive(Debug, Clone)]
pub enum SourceInput {
    Upload { data: Bytes, file_name: Option<String> },
    Remote { url: String, file_name: Option<String> },
}

#[derive(Debug, Clone)]
pub struct TranscodeRequest {
    pub source: SourceInput,
    pub requested_format: Option<String>,
    pub requested_bitrate_kbps: Option<i64>,
    pub duration_secs: Option<f64>,
}

impl TranscodeRequest {
    /// Builds a request from an optional uploaded file and an optional
    /// source URL. Exactly one of the two must be present.
    pub fn new(
        upload: Option<UploadedFile>,
        source_url: Option<String>,
        file_name: Option<String>,
    ) -> Result<Self, TranscodeError> {
        let source_url = source_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
        let file_name = file_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

        let source = match (upload, source_url) {
            (Some(_), Some(_)) => {
                return Err(TranscodeError::InvalidInput(
                    "provide either an audio file or a source URL, not both".to_string(),
                ));
            }
            (None, None) => {
                return Err(TranscodeError::InvalidInput(
                    "no audio file or source URL provided".to_string(),
                ));
            }
            (Some(file), None) => {
                if file.data.is_empty() {
                    return Err(TranscodeError::InvalidInput("uploaded audio file is empty".to_string()));
                }
                SourceInput::Upload {
                    data: file.data,
                    file_name: file.file_name.or(file_name),
                }
            }
            (None, Some(url)) => SourceInput::Remote { url, file_name },
        };

        Ok(Self {
            source,
            requested_format: None,
            requested_bitrate_kbps: None,
            duration_secs: None,
        })
    }

    pub fn with_format(mut self, format: Option<String>) -> Self {
        self.requested_format = format;
        self
    }

    pub fn with_bitrate(mut self, bitrate_kbps: Option<i64>) -> Self {
        self.requested_bitrate_kbps = bitrate_kbps;
        self
    }

    pub fn with_duration(mut self, duration_secs: Option<f64>) -> Self {
        self.duration_secs = duration_secs;
        self
    }
}

#[derive(Debug, Clone)]
pub struct TranscodeResult {
    pub public_url: String,
    pub storage_key: String,
    pub original_filename_stem: String,
    pub format: AudioFormat,
    pub mime_type: &'static str,
    pub input_byte_size: u64,
    pub output_byte_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(data: &'static [u8]) -> UploadedFile {
        UploadedFile {
            data: Bytes::from_static(data),
            file_name: Some("song.wav".to_string()),
        }
    }

    #[test]
    fn format_parsing_is_case_insensitive() {
        assert_eq!("MP3".parse::<AudioFormat>().unwrap(), AudioFormat::Mp3);
        assert_eq!(" aac ".parse::<AudioFormat>().unwrap(), AudioFormat::Aac);
    }

    #[test]
    fn flac_is_unsupported() {
        let err = "flac".parse::<AudioFormat>().unwrap_err();
        assert!(matches!(err, TranscodeError::UnsupportedFormat(ref f) if f == "flac"));
    }

    #[test]
    fn request_needs_exactly_one_source() {
        let none = TranscodeRequest::new(None, None, None).unwrap_err();
        assert!(matches!(none, TranscodeError::InvalidInput(_)));

        let both = TranscodeRequest::new(Some(upload(b"RIFF")), Some("https://x/a.wav".into()), None)
            .unwrap_err();
        assert!(matches!(both, TranscodeError::InvalidInput(_)));

        let blank_url = TranscodeRequest::new(None, Some("   ".into()), None).unwrap_err();
        assert!(matches!(blank_url, TranscodeError::InvalidInput(_)));
    }

    #[test]
    fn empty_upload_is_rejected() {
        let err = TranscodeRequest::new(Some(upload(b"")), None, None).unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidInput(_)));
    }

    #[test]
    fn remote_source_keeps_file_name_hint() {
        let req = TranscodeRequest::new(None, Some("https://cdn.example.com/a.wav".into()), Some("Take 3.wav".into()))
            .unwrap();
        match req.source {
            SourceInput::Remote { url, file_name } => {
                assert_eq!(url, "https://cdn.example.com/a.wav");
                assert_eq!(file_name.as_deref(), Some("Take 3.wav"));
            }
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn work_units_are_distinct() {
        let a = WorkUnit::new();
        let b = WorkUnit::new();
        assert_ne!(a, b);
        assert_ne!(a.storage_key("mp3"), b.storage_key("mp3"));
        assert!(a.storage_key("m4a").ends_with(".m4a"));
    }
}
