use crate::modules::transcode::model::EncodingPlan;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub mod ffmpeg;

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("encoder binary not found at {path}")]
    NotFound { path: String },

    #[error("encoder process error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoder exited with status {}: {stderr}", exit_label(.code))]
    Exit { code: Option<i32>, stderr: String },

    #[error("encoder timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error("encoder reported success but produced no output at {path}")]
    EmptyOutput { path: String },
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

/// External audio encoder driven once per encoding attempt.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Encodes `input` into `output` following `plan`. Resolves only once
    /// the encoder has definitively finished.
    async fn encode(&self, input: &Path, output: &Path, plan: &EncodingPlan) -> Result<(), EncoderError>;
}
