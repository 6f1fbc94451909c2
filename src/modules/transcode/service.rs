use super::error::TranscodeError;
use super::model::{EncodingPlan, SourceInput, TranscodeRequest, TranscodeResult};
use super::temp::TempScope;
use super::{invoker, planner, publisher, source};
use crate::state::AppState;
use tracing::info;

pub struct TranscodeService;

impl TranscodeService {
    /// Runs the whole pipeline for one request: acquire the source, encode
    /// (with fallback), publish. Temporary files are released on every path.
    pub async fn transcode(state: AppState, req: TranscodeRequest) -> Result<TranscodeResult, TranscodeError> {
        // Pure validation first so a bad format never costs a download
        let plan = planner::plan_request(&req)?;

        let mut scope = TempScope::acquire(&state.config.temp_dir);
        info!(
            work_unit = %scope.work_unit(),
            format = %plan.format,
            bitrate_kbps = plan.bitrate_kbps,
            "transcode request accepted"
        );

        let result = Self::run(&state, req.source, plan, &mut scope).await;
        scope.release().await;
        result
    }

    async fn run(
        state: &AppState,
        input_source: SourceInput,
        plan: EncodingPlan,
        scope: &mut TempScope,
    ) -> Result<TranscodeResult, TranscodeError> {
        let work_unit = scope.work_unit();

        let acquired = source::acquire(input_source, state.fetcher.as_ref()).await?;
        info!(%work_unit, file_name = %acquired.file_name, bytes = acquired.data.len(), "source acquired");

        let input = scope.allocate("input", &acquired.input_extension());
        tokio::fs::write(&input, &acquired.data)
            .await
            .map_err(|e| TranscodeError::EncodingFailed(format!("cannot stage input file: {}", e)))?;

        let artifact = invoker::encode(state.encoder.as_ref(), &input, plan, scope).await?;
        let published = publisher::publish(state.storage.as_ref(), work_unit, &artifact).await?;

        info!(%work_unit, url = %published.public_url, "transcode complete");

        Ok(TranscodeResult {
            public_url: published.public_url,
            storage_key: published.key,
            original_filename_stem: acquired.stem(),
            format: artifact.plan.format,
            mime_type: artifact.plan.mime_type,
            input_byte_size: acquired.data.len() as u64,
            output_byte_size: published.byte_size,
        })
    }
}
