//! Primary-then-fallback encoding.
//!
//! ```text
//! Idle -> Encoding(primary) -> Success
//!                           -> Encoding(fallback) -> Success
//!                                                 -> Failed
//! ```
//!
//! A failed primary attempt falls back exactly once, to MP3, and only when
//! MP3 was not already the requested format.

use super::error::TranscodeError;
use super::model::{AudioFormat, EncodingPlan};
use super::planner;
use super::temp::TempScope;
use crate::infrastructure::encoder::{Encoder, EncoderError};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Primary,
    Fallback,
}

impl Stage {
    fn role(&self) -> &'static str {
        match self {
            Stage::Primary => "primary",
            Stage::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role())
    }
}

/// One encoder run and how it ended.
#[derive(Debug)]
pub struct Attempt {
    pub stage: Stage,
    pub plan: EncodingPlan,
    pub output: PathBuf,
    pub outcome: Result<(), EncoderError>,
}

/// The artifact produced by the attempt that succeeded.
#[derive(Debug, Clone)]
pub struct EncodedArtifact {
    pub plan: EncodingPlan,
    pub path: PathBuf,
    pub stage: Stage,
}

async fn attempt(
    encoder: &dyn Encoder,
    input: &Path,
    stage: Stage,
    plan: EncodingPlan,
    scope: &mut TempScope,
) -> Attempt {
    let output = scope.allocate(stage.role(), plan.container_extension);
    info!(
        work_unit = %scope.work_unit(),
        %stage,
        codec = plan.codec_id,
        bitrate_kbps = plan.bitrate_kbps,
        "encoding"
    );
    let outcome = match encoder.encode(input, &output, &plan).await {
        Ok(()) => check_output(&output).await,
        Err(e) => Err(e),
    };
    Attempt {
        stage,
        plan,
        output,
        outcome,
    }
}

/// A zero exit only counts when the output file exists and is non-empty.
async fn check_output(output: &Path) -> Result<(), EncoderError> {
    match tokio::fs::metadata(output).await {
        Ok(meta) if meta.len() > 0 => Ok(()),
        Ok(_) => Err(EncoderError::EmptyOutput {
            path: output.display().to_string(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(EncoderError::EmptyOutput {
            path: output.display().to_string(),
        }),
        Err(e) => Err(EncoderError::Io(e)),
    }
}

/// Picks the last attempt that succeeded.
fn select(attempts: Vec<Attempt>) -> Option<EncodedArtifact> {
    attempts
        .into_iter()
        .rev()
        .find(|a| a.outcome.is_ok())
        .map(|a| EncodedArtifact {
            plan: a.plan,
            path: a.output,
            stage: a.stage,
        })
}

fn describe_failure(a: &Attempt) -> String {
    match &a.outcome {
        Ok(()) => format!("{} {} attempt succeeded", a.stage, a.plan.format),
        Err(e) => format!("{} {} attempt failed: {}", a.stage, a.plan.format, e),
    }
}

pub async fn encode(
    encoder: &dyn Encoder,
    input: &Path,
    primary: EncodingPlan,
    scope: &mut TempScope,
) -> Result<EncodedArtifact, TranscodeError> {
    let work_unit = scope.work_unit();
    let mut attempts = Vec::with_capacity(2);

    let first = attempt(encoder, input, Stage::Primary, primary, scope).await;
    let primary_failed = first.outcome.is_err();
    let requested = first.plan.format;
    attempts.push(first);

    if primary_failed {
        let reason = describe_failure(&attempts[0]);
        if requested == AudioFormat::Mp3 {
            warn!(%work_unit, "{}; no fallback for mp3", reason);
            return Err(TranscodeError::EncodingFailed(reason));
        }

        warn!(%work_unit, "{}; falling back to mp3", reason);
        let fallback = attempt(encoder, input, Stage::Fallback, planner::fallback_plan(), scope).await;
        if fallback.outcome.is_err() {
            let message = format!("{} (after {})", describe_failure(&fallback), reason);
            warn!(%work_unit, "{}", message);
            return Err(TranscodeError::EncodingFailed(message));
        }
        attempts.push(fallback);
    }

    let artifact = select(attempts)
        .ok_or_else(|| TranscodeError::EncodingFailed("no encoder attempt succeeded".to_string()))?;
    info!(%work_unit, stage = %artifact.stage, format = %artifact.plan.format, "encoding finished");
    Ok(artifact)
}
