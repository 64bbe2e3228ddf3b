use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use goto_core::{CoreError, RedirectError};
use thiserror::Error;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Key not found")]
    NotFound,
    #[error(transparent)]
    Redirect(#[from] RedirectError),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Redirect(RedirectError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Redirect(RedirectError::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Redirect(RedirectError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}
