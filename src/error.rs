use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::dto::food::ErrorResponse;

/// Every failure a catalog request can end in.
///
/// Handlers never let an error escape; each variant renders as the uniform
/// `{success: false, message, error?}` envelope with its own status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required input missing or malformed
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Raised by the upload step before the handler runs
    #[error("{0}")]
    UploadRejected(String),

    /// Repository or filesystem failure; `source` is passed through to the caller
    #[error("{message}: {source}")]
    Storage {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound("Food item not found".to_string())
    }

    pub fn storage(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Storage {
            message,
            source: source.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UploadRejected(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            Self::Validation(message) | Self::NotFound(message) | Self::UploadRejected(message) => {
                ErrorResponse::new(message, None)
            }
            Self::Storage { message, source } => {
                tracing::error!("{}: {:#}", message, source);
                ErrorResponse::new(message.to_string(), Some(source.to_string()))
            }
        };

        (status, Json(body)).into_response()
    }
}
