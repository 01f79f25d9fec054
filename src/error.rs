use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::translate::ErrorResponse;
use crate::upstream::UpstreamError;

/// Errors returned by the relay endpoint.
/// The display strings are the only text that reaches the client.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Invalid input text.")]
    InvalidInput,

    #[error("Failed to translate text.")]
    Upstream(#[source] UpstreamError),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::InvalidInput => StatusCode::BAD_REQUEST,
            RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UpstreamError> for RelayError {
    fn from(err: UpstreamError) -> Self {
        RelayError::Upstream(err)
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
