use axum::{
    Json,
    extract::rejection::FormRejection,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::SEMFIND_STATUS_HEADER;
use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("match failed: {0}")]
    MatchFailed(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<FormRejection> for GatewayError {
    fn from(rejection: FormRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge(rejection.body_text())
        } else {
            GatewayError::InvalidRequest(rejection.body_text())
        }
    }
}

impl From<ServiceError> for GatewayError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => GatewayError::InvalidRequest(message),
            ServiceError::Match(e) => GatewayError::MatchFailed(e.to_string()),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, semfind_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::PayloadTooLarge(_) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large")
            }
            GatewayError::MatchFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "match_error"),
            GatewayError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            SEMFIND_STATUS_HEADER,
            HeaderValue::from_static(semfind_status),
        );

        let body = Json(ErrorResponse {
            status: "error",
            message: self.to_string(),
        });

        (status, headers, body).into_response()
    }
}
