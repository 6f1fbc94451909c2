use super::{Encoder, EncoderError};
use crate::modules::transcode::model::EncodingPlan;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{Duration, timeout};
use tracing::{debug, info};

const STDERR_TAIL_LINES: usize = 20;

/// Runs the `ffmpeg` binary as a child process.
#[derive(Clone, Debug)]
pub struct FfmpegEncoder {
    ffmpeg_path: String,
    timeout_secs: u64,
}

impl FfmpegEncoder {
    pub fn new(ffmpeg_path: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout_secs,
        }
    }

    pub fn build_args(input: &Path, output: &Path, plan: &EncodingPlan) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            // Drop embedded cover art, it breaks some muxers
            "-vn".to_string(),
            "-c:a".to_string(),
            plan.codec_id.to_string(),
            "-b:a".to_string(),
            format!("{}k", plan.bitrate_kbps),
            "-ac".to_string(),
            plan.channels.to_string(),
            "-ar".to_string(),
            plan.sample_rate_hz.to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Checks that the configured binary can be started.
    pub async fn validate(&self) -> Result<(), EncoderError> {
        let status = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !status.success() {
            return Err(EncoderError::Exit {
                code: status.code(),
                stderr: String::new(),
            });
        }

        info!(path = %self.ffmpeg_path, "✅ ffmpeg available");
        Ok(())
    }

    fn spawn_error(&self, e: std::io::Error) -> EncoderError {
        if e.kind() == std::io::ErrorKind::NotFound {
            EncoderError::NotFound {
                path: self.ffmpeg_path.clone(),
            }
        } else {
            EncoderError::Io(e)
        }
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    async fn encode(&self, input: &Path, output: &Path, plan: &EncodingPlan) -> Result<(), EncoderError> {
        let args = Self::build_args(input, output, plan);
        debug!(ffmpeg = %self.ffmpeg_path, ?args, "spawning encoder");

        let child = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // Dropping the wait future on timeout kills the child
        let result = timeout(Duration::from_secs(self.timeout_secs), child.wait_with_output())
            .await
            .map_err(|_| EncoderError::Timeout {
                timeout_secs: self.timeout_secs,
            })??;

        if !result.status.success() {
            return Err(EncoderError::Exit {
                code: result.status.code(),
                stderr: stderr_tail(&result.stderr),
            });
        }

        Ok(())
    }
}
