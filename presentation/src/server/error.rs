//! Mapping of relay errors onto HTTP responses.

use super::types::ErrorBody;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use relay_application::{ErrorKind, RelayChatError};
use tracing::error;

/// A failed API request.
#[derive(Debug)]
pub struct ApiError(RelayChatError);

impl ApiError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self(RelayChatError::InvalidInput(message.into()))
    }

    pub fn kind(&self) -> ErrorKind {
        self.0.kind()
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::UpstreamError => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<RelayChatError> for ApiError {
    fn from(err: RelayChatError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = %self.kind(), "{}", self.0);
        }
        let body = ErrorBody {
            error: self.kind().as_str().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
