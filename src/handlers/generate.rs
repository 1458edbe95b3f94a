use axum::{
    body::Bytes,
    extract::State,
    http::{header::ORIGIN, HeaderMap},
    Json,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    errors::GatewayRejection,
    handlers::AppState,
    models::{ClientIdentity, ErrorResponse, GenerateBody, GenerateResponse},
};

/// Generate a thumbnail for a video title
#[utoipa::path(
    post,
    path = "/api/generate",
    tag = "generation",
    request_body = GenerateBody,
    responses(
        (status = 200, description = "Thumbnail generated", body = GenerateResponse),
        (status = 400, description = "Invalid input or content policy rejection", body = ErrorResponse),
        (status = 403, description = "Origin not allowed", body = ErrorResponse),
        (status = 429, description = "Daily quota exhausted", body = ErrorResponse),
        (status = 500, description = "Server misconfiguration or empty provider response", body = ErrorResponse),
        (status = 502, description = "Image provider unavailable", body = ErrorResponse)
    )
)]
pub async fn generate(
    State(state): State<AppState>,
    identity: ClientIdentity,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GenerateResponse>, GatewayRejection> {
    let origin = headers
        .get(ORIGIN)
        .map(|value| value.to_str().unwrap_or_default());

    let span = tracing::info_span!("generate", request_id = %Uuid::new_v4(), %identity);
    let outcome = state
        .gateway
        .handle(&identity, origin, &body)
        .instrument(span)
        .await;

    match outcome {
        Ok(result) => {
            state.metrics.record_generation("success");
            tracing::info!(%identity, remaining = result.remaining_quota, "Thumbnail generated");
            Ok(Json(result.into()))
        }
        Err(rejection) => {
            state.metrics.record_generation(rejection.error.kind());
            Err(rejection)
        }
    }
}
