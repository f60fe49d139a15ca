use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::scheduling::BookingError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    Database(#[from] anyhow::Error),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error("{0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthorized")]
    Unauthorized,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Booking(e) => match e {
                BookingError::Invalid(_) => StatusCode::BAD_REQUEST,
                BookingError::BusinessNotFound(_)
                | BookingError::ServiceNotFound(_)
                | BookingError::BookingNotFound(_) => StatusCode::NOT_FOUND,
                BookingError::PastDate | BookingError::OutsideBusinessHours { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                BookingError::Conflict => StatusCode::CONFLICT,
                BookingError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    /// Machine-readable tag for booking rejections.
    fn kind(&self) -> Option<&'static str> {
        match self {
            AppError::Booking(e) => Some(match e {
                BookingError::Invalid(_) => "invalid_request",
                BookingError::BusinessNotFound(_)
                | BookingError::ServiceNotFound(_)
                | BookingError::BookingNotFound(_) => "not_found",
                BookingError::PastDate => "past_date",
                BookingError::OutsideBusinessHours { .. } => "outside_business_hours",
                BookingError::Conflict => "conflict",
                BookingError::Storage(_) => "storage",
            }),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "internal error".to_string()
        } else {
            self.to_string()
        };

        let body = match self.kind() {
            Some(kind) => serde_json::json!({ "error": message, "kind": kind }),
            None => serde_json::json!({ "error": message }),
        };
        (status, axum::Json(body)).into_response()
    }
}
