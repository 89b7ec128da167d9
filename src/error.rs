use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, TransactionError};
use thiserror::Error;

use crate::db::escrow::EscrowError;

/// Application-level error returned by route handlers.
///
/// Every variant maps to an HTTP status and serializes as
/// `{"success": false, "message": "..."}` so clients get a uniform error
/// shape regardless of where the failure happened.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{self}");
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "message": self.to_string(),
        }))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(format!("Validation failed: {errors}"))
    }
}

impl From<TransactionError<EscrowError>> for ApiError {
    fn from(err: TransactionError<EscrowError>) -> Self {
        match err {
            TransactionError::Connection(e) => ApiError::Database(e),
            TransactionError::Transaction(e) => e.into(),
        }
    }
}

impl From<EscrowError> for ApiError {
    fn from(err: EscrowError) -> Self {
        match err {
            EscrowError::JobNotFound | EscrowError::OfferNotFound | EscrowError::UserNotFound => {
                ApiError::NotFound(err.to_string())
            }
            EscrowError::NotOwner => ApiError::Forbidden(err.to_string()),
            EscrowError::JobNotOpen(_)
            | EscrowError::JobNotProcessing(_)
            | EscrowError::JobNotCancellable(_)
            | EscrowError::OfferAlreadyAccepted => ApiError::Conflict(err.to_string()),
            EscrowError::OfferJobMismatch | EscrowError::InsufficientPoints { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            EscrowError::MissingAssignment => ApiError::Internal(err.to_string()),
            EscrowError::Db(e) => ApiError::Database(e),
        }
    }
}
