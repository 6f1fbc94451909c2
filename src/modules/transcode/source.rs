use super::error::TranscodeError;
use super::model::SourceInput;
use crate::infrastructure::fetch::SourceFetcher;
use bytes::Bytes;
use percent_encoding::percent_decode_str;
use std::path::Path;
use tracing::info;
use url::Url;

pub const DEFAULT_FILE_NAME: &str = "audio";
const DEFAULT_INPUT_EXTENSION: &str = "bin";

/// Raw source audio plus the name the output stem is derived from.
#[derive(Debug, Clone)]
pub struct AcquiredSource {
    pub data: Bytes,
    pub file_name: String,
}

impl AcquiredSource {
    pub fn stem(&self) -> String {
        filename_stem(&self.file_name)
    }

    /// Extension for the staged input file, so the encoder can probe by name.
    pub fn input_extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_INPUT_EXTENSION.to_string())
    }
}

pub async fn acquire(source: SourceInput, fetcher: &dyn SourceFetcher) -> Result<AcquiredSource, TranscodeError> {
    match source {
        SourceInput::Upload { data, file_name } => Ok(AcquiredSource {
            data,
            file_name: file_name.unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        }),
        SourceInput::Remote { url, file_name } => {
            let parsed = parse_source_url(&url)?;
            let file_name = file_name
                .or_else(|| name_from_url(&parsed))
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

            info!(url = %parsed, "fetching remote source");
            let data = fetcher
                .fetch(parsed.as_str())
                .await
                .map_err(|e| TranscodeError::SourceFetchFailed(e.to_string()))?;

            if data.is_empty() {
                return Err(TranscodeError::SourceFetchFailed(format!("{} returned an empty body", parsed)));
            }

            Ok(AcquiredSource { data, file_name })
        }
    }
}

fn parse_source_url(raw: &str) -> Result<Url, TranscodeError> {
    let url = Url::parse(raw).map_err(|e| TranscodeError::InvalidInput(format!("invalid source URL {raw:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(TranscodeError::InvalidInput(format!("unsupported source URL scheme {other:?}"))),
    }
}

fn name_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    let name = decoded.trim();
    // An encoded slash would smuggle a directory into the name
    (!name.is_empty() && !name.contains(['/', '\\'])).then(|| name.to_string())
}

/// File name without its final extension, e.g. `Take 3.final.wav` -> `Take 3.final`.
pub fn filename_stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;

    #[tokio::test]
    async fn upload_without_name_gets_default() {
        let fetcher = MockFetcher::new();
        let source = acquire(
            SourceInput::Upload {
                data: Bytes::from_static(b"RIFF"),
                file_name: None,
            },
            &fetcher,
        )
        .await
        .unwrap();

        assert_eq!(source.file_name, DEFAULT_FILE_NAME);
        assert_eq!(source.input_extension(), "bin");
        assert_eq!(fetcher.calls().len(), 0);
    }

    #[tokio::test]
    async fn remote_name_comes_from_url_path() {
        let fetcher = MockFetcher::new();
        fetcher.respond("https://cdn.example.com/stems/Mix%201.WAV", Bytes::from_static(b"RIFF"));

        let source = acquire(
            SourceInput::Remote {
                url: "https://cdn.example.com/stems/Mix%201.WAV".to_string(),
                file_name: None,
            },
            &fetcher,
        )
        .await
        .unwrap();

        assert_eq!(source.file_name, "Mix 1.WAV");
        assert_eq!(source.stem(), "Mix 1");
        assert_eq!(source.input_extension(), "wav");
        assert_eq!(&source.data[..], b"RIFF");
    }

    #[tokio::test]
    async fn remote_failure_is_source_fetch_failed() {
        let fetcher = MockFetcher::new();
        fetcher.respond_status("https://cdn.example.com/missing.wav", 404);

        let err = acquire(
            SourceInput::Remote {
                url: "https://cdn.example.com/missing.wav".to_string(),
                file_name: Some("missing.wav".to_string()),
            },
            &fetcher,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TranscodeError::SourceFetchFailed(_)));
    }

    #[tokio::test]
    async fn non_http_url_is_invalid_input() {
        let fetcher = MockFetcher::new();
        let err = acquire(
            SourceInput::Remote {
                url: "file:///etc/passwd".to_string(),
                file_name: None,
            },
            &fetcher,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TranscodeError::InvalidInput(_)));
        assert!(fetcher.calls().is_empty());
    }

    #[test]
    fn url_names_are_decoded() {
        let name = |raw: &str| name_from_url(&Url::parse(raw).unwrap());
        assert_eq!(name("https://cdn.example.com/a/Caf%C3%A9%20Live.mp3").as_deref(), Some("Café Live.mp3"));
        assert_eq!(name("https://cdn.example.com/a/plain.wav/").as_deref(), Some("plain.wav"));
        assert_eq!(name("https://cdn.example.com/a/..%2Fetc.wav"), None);
        assert_eq!(name("https://cdn.example.com/"), None);
    }

    #[test]
    fn stem_strips_only_last_extension() {
        assert_eq!(filename_stem("Take 3.final.wav"), "Take 3.final");
        assert_eq!(filename_stem("noext"), "noext");
        assert_eq!(filename_stem(""), DEFAULT_FILE_NAME);
    }

    #[test]
    fn odd_extensions_fall_back_to_bin() {
        let odd = AcquiredSource {
            data: Bytes::new(),
            file_name: "weird.w@v".to_string(),
        };
        assert_eq!(odd.input_extension(), "bin");
    }
}
