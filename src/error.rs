use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{response::ErrorResponse, services::qr::QrEncodeError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("ticket id {0} already exists")]
    Conflict(String),

    #[error("ticket could not be saved")]
    SaveFailed(#[source] sea_orm::DbErr),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("QR code generation failed")]
    Encoding(#[from] QrEncodeError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_)
            | AppError::SaveFailed(_)
            | AppError::OrmError(_)
            | AppError::Encoding(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller. Server-side causes stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::NotFound(_) | AppError::BadRequest(_) => self.to_string(),
            AppError::Conflict(_) | AppError::SaveFailed(_) => "Error saving ticket".to_string(),
            AppError::OrmError(_) => "Database error".to_string(),
            AppError::Encoding(_) => "Error generating ticket".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }
        let body = ErrorResponse::new(self.public_message());
        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
