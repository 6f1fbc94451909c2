use super::dto::{TranscodeQuery, TranscodeResponse, TranscodeUrlRequest};
use super::error::TranscodeError;
use super::model::{TranscodeRequest, UploadedFile};
use super::service::TranscodeService;
use crate::common::response::{ApiError, ApiSuccess, ErrorResponse};
use crate::common::upload::read_transcode_form;
use crate::state::AppState;
use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Query, Request, State, rejection::QueryRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::{error, warn};
use validator::Validate;

/// Transcode an audio file and publish it
///
/// Accepts `multipart/form-data` with the file in an `audio` (or `file`)
/// part, or a JSON / form body pointing at a remote `audioUrl`.
#[utoipa::path(
    post,
    path = "/transcode",
    params(TranscodeQuery),
    request_body(content = TranscodeUrlRequest, description = "Remote source. A multipart/form-data body with an `audio` file part is also accepted."),
    responses(
        (status = 200, description = "Transcoded and published", body = TranscodeResponse),
        (status = 400, description = "Missing source or unsupported format", body = ErrorResponse),
        (status = 413, description = "Upload exceeds the configured size limit", body = ErrorResponse),
        (status = 500, description = "Fetch, encode or upload failed", body = ErrorResponse)
    ),
    tag = "Transcode"
)]
pub async fn transcode(
    State(state): State<AppState>,
    query: Result<Query<TranscodeQuery>, QueryRejection>,
    req: Request,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return ApiError(e.body_text(), StatusCode::BAD_REQUEST).into_response(),
    };

    let request = match read_request(&state, query, req).await {
        Ok(r) => r,
        Err(e) => {
            warn!("Rejected transcode request: {}", e);
            return ApiError(e.to_string(), e.status_code()).into_response();
        }
    };

    match TranscodeService::transcode(state, request).await {
        Ok(result) => ApiSuccess(TranscodeResponse::from(result), StatusCode::OK).into_response(),
        Err(e) => {
            if e.status_code().is_server_error() {
                error!("Transcode failed: {}", e);
            } else {
                warn!("Rejected transcode request: {}", e);
            }
            ApiError(e.to_string(), e.status_code()).into_response()
        }
    }
}

async fn read_request(
    state: &AppState,
    query: TranscodeQuery,
    req: Request,
) -> Result<TranscodeRequest, TranscodeError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (file, body): (Option<UploadedFile>, TranscodeUrlRequest) = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| TranscodeError::rejected(e.status(), "malformed multipart body", e.body_text()))?;
        let form = read_transcode_form(multipart).await?;
        let body = TranscodeUrlRequest {
            audio_url: form.source_url,
            file_name: form.file_name,
            format: form.format,
            bitrate: form.bitrate,
            duration: form.duration,
        };
        (form.file, body)
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<TranscodeUrlRequest>::from_request(req, state)
            .await
            .map_err(|e| TranscodeError::rejected(e.status(), "malformed JSON body", e.body_text()))?;
        (None, body)
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(body) = Form::<TranscodeUrlRequest>::from_request(req, state)
            .await
            .map_err(|e| TranscodeError::rejected(e.status(), "malformed form body", e.body_text()))?;
        (None, body)
    } else if content_type.is_empty() {
        (None, TranscodeUrlRequest::default())
    } else {
        return Err(TranscodeError::InvalidInput(format!(
            "unsupported content type {content_type:?}, expected multipart/form-data, application/json or application/x-www-form-urlencoded"
        )));
    };

    body.validate()
        .map_err(|e| TranscodeError::InvalidInput(e.to_string()))?;

    Ok(TranscodeRequest::new(file, body.audio_url, body.file_name)?
        .with_format(body.format.or(query.format))
        .with_bitrate(body.bitrate.or(query.bitrate))
        .with_duration(body.duration.or(query.duration)))
}
