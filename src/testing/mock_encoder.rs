use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::infrastructure::encoder::{Encoder, EncoderError};
use crate::modules::transcode::model::EncodingPlan;

#[derive(Debug, Clone)]
pub struct RecordedEncode {
    pub input: PathBuf,
    pub output: PathBuf,
    pub plan: EncodingPlan,
    /// Whether the staged input file existed when the encoder ran.
    pub input_existed: bool,
}

/// Encoder that writes a small fake artifact, or fails for chosen codecs.
///
/// Failing runs still leave a partial output behind, like a real encoder
/// killed mid-write, so cleanup paths get exercised. Codecs marked with
/// [`MockEncoder::empty_output_for`] exit cleanly with an empty file.
#[derive(Debug, Default)]
pub struct MockEncoder {
    calls: Mutex<Vec<RecordedEncode>>,
    failing_codecs: Mutex<HashSet<String>>,
    fail_all: Mutex<bool>,
    empty_codecs: Mutex<HashSet<String>>,
}

impl MockEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_codec(&self, codec_id: &str) {
        self.failing_codecs.lock().unwrap().insert(codec_id.to_string());
    }

    pub fn fail_all(&self) {
        *self.fail_all.lock().unwrap() = true;
    }

    pub fn empty_output_for(&self, codec_id: &str) {
        self.empty_codecs.lock().unwrap().insert(codec_id.to_string());
    }

    pub fn calls(&self) -> Vec<RecordedEncode> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn should_fail(&self, codec_id: &str) -> bool {
        *self.fail_all.lock().unwrap() || self.failing_codecs.lock().unwrap().contains(codec_id)
    }
}

#[async_trait]
impl Encoder for MockEncoder {
    async fn encode(&self, input: &Path, output: &Path, plan: &EncodingPlan) -> Result<(), EncoderError> {
        let input_existed = tokio::fs::try_exists(input).await.unwrap_or(false);
        self.calls.lock().unwrap().push(RecordedEncode {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            plan: plan.clone(),
            input_existed,
        });

        if self.should_fail(plan.codec_id) {
            tokio::fs::write(output, b"partial").await?;
            return Err(EncoderError::Exit {
                code: Some(1),
                stderr: format!("mock failure for {}", plan.codec_id),
            });
        }

        if self.empty_codecs.lock().unwrap().contains(plan.codec_id) {
            tokio::fs::write(output, b"").await?;
            return Ok(());
        }

        let body = format!("encoded:{}:{}k", plan.codec_id, plan.bitrate_kbps);
        tokio::fs::write(output, body).await?;
        Ok(())
    }
}
