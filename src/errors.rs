use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("image provider credential is not configured")]
    ServiceMisconfigured,

    #[error("origin {0:?} is not allowed")]
    ForbiddenOrigin(String),

    #[error("daily quota of {limit} generations exhausted")]
    QuotaExceeded { limit: u32 },

    #[error("malformed request body: {0}")]
    MalformedRequest(#[from] serde_json::Error),

    #[error("video title is shorter than 3 characters")]
    TitleTooShort,

    #[error("video title is longer than 200 characters")]
    TitleTooLong,

    #[error("keywords are longer than 100 characters")]
    KeywordsTooLong,

    #[error("provider rejected the prompt under its content policy")]
    ContentPolicyRejected,

    #[error("image provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("image provider returned no image URL")]
    EmptyProviderResponse,

    #[error("provider call failed: {0}")]
    NetworkOrUnknown(#[from] reqwest::Error),

    #[error("quota store error: {0}")]
    QuotaStore(#[from] redis::RedisError),
}

impl GatewayError {
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::ServiceMisconfigured => "service_misconfigured",
            GatewayError::ForbiddenOrigin(_) => "forbidden_origin",
            GatewayError::QuotaExceeded { .. } => "quota_exceeded",
            GatewayError::MalformedRequest(_) => "malformed_request",
            GatewayError::TitleTooShort => "title_too_short",
            GatewayError::TitleTooLong => "title_too_long",
            GatewayError::KeywordsTooLong => "keywords_too_long",
            GatewayError::ContentPolicyRejected => "content_policy_rejected",
            GatewayError::ProviderUnavailable(_) => "provider_unavailable",
            GatewayError::EmptyProviderResponse => "empty_provider_response",
            GatewayError::NetworkOrUnknown(_) => "network_or_unknown",
            GatewayError::QuotaStore(_) => "quota_store",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::ServiceMisconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::ForbiddenOrigin(_) => StatusCode::FORBIDDEN,
            GatewayError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::MalformedRequest(_)
            | GatewayError::TitleTooShort
            | GatewayError::TitleTooLong
            | GatewayError::KeywordsTooLong
            | GatewayError::ContentPolicyRejected => StatusCode::BAD_REQUEST,
            GatewayError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
            GatewayError::EmptyProviderResponse
            | GatewayError::NetworkOrUnknown(_)
            | GatewayError::QuotaStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the end user. Internal detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::ServiceMisconfigured => {
                "The image generation service is not configured.".to_string()
            }
            GatewayError::ForbiddenOrigin(_) => {
                "Requests from this origin are not allowed.".to_string()
            }
            GatewayError::QuotaExceeded { limit } => {
                format!("You have used all {limit} free generations for today.")
            }
            GatewayError::MalformedRequest(_) => "The request format is invalid.".to_string(),
            GatewayError::TitleTooShort => {
                "Please enter a video title of at least 3 characters.".to_string()
            }
            GatewayError::TitleTooLong => {
                "The video title must be 200 characters or fewer.".to_string()
            }
            GatewayError::KeywordsTooLong => {
                "Keywords must be 100 characters or fewer.".to_string()
            }
            GatewayError::ContentPolicyRejected => {
                "This may violate the content policy. Please try different wording.".to_string()
            }
            GatewayError::ProviderUnavailable(_) => {
                "An error occurred while generating the image. Please try again later.".to_string()
            }
            GatewayError::EmptyProviderResponse => "Failed to generate the image.".to_string(),
            GatewayError::NetworkOrUnknown(_) | GatewayError::QuotaStore(_) => {
                "A server error occurred.".to_string()
            }
        }
    }
}

/// A failed generate call, with the caller's remaining quota when known.
#[derive(Debug)]
pub struct GatewayRejection {
    pub error: GatewayError,
    pub remaining: Option<u32>,
}

impl GatewayRejection {
    /// Rejection raised after the quota unit was already consumed.
    pub fn charged(error: GatewayError, remaining: u32) -> Self {
        Self {
            error,
            remaining: Some(remaining),
        }
    }
}

impl From<GatewayError> for GatewayRejection {
    fn from(error: GatewayError) -> Self {
        let remaining = match error {
            GatewayError::QuotaExceeded { .. } => Some(0),
            _ => None,
        };
        Self { error, remaining }
    }
}

impl IntoResponse for GatewayRejection {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.error.kind(), "Generate failed: {}", self.error);
        } else {
            tracing::warn!(kind = self.error.kind(), "Generate rejected: {}", self.error);
        }

        let body = Json(ErrorResponse {
            error: self.error.user_message(),
            remaining: self.remaining,
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
