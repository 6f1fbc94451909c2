use crate::common::response::ErrorResponse;
use crate::modules::transcode::dto::{TranscodeResponse, TranscodeUrlRequest};
use crate::modules::transcode::model::AudioFormat;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::transcode::handler::transcode,
        crate::routes::health,
    ),
    components(
        schemas(
            TranscodeUrlRequest, TranscodeResponse, AudioFormat, ErrorResponse,
        )
    ),
    tags(
        (name = "Transcode", description = "Audio transcoding and publishing"),
        (name = "Health", description = "Liveness probes")
    )
)]
pub struct ApiDoc;
