use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use ts_rs::TS;

use crate::auth::AuthError;

/// Body of every failed request: `{"status": "error", "message": ...}`.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export, export_to = "ErrorResponse.ts")]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No token, or the token failed verification.
    #[error("Authentication required")]
    Unauthorized,
    /// Login with an unknown email or a wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// Authenticated, but the role is not allowed here.
    #[error("You do not have permission to access this resource")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    InternalServerError(String),
    #[error(transparent)]
    Generic(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::Generic(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn not_found(resource: &str) -> Self {
        AppError::NotFound(format!("{} not found", resource))
    }

    pub fn bad_request(msg: &str) -> Self {
        AppError::BadRequest(msg.to_string())
    }

    pub fn validation_error(field: &str, reason: &str) -> Self {
        AppError::BadRequest(format!("Field '{}': {}", field, reason))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("Internal error: {}", self);
            "Internal server error".to_string()
        } else {
            debug!("Request rejected with {}: {}", status, self);
            self.to_string()
        };

        let body = ErrorResponse {
            status: "error".to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        debug!("Token rejected: {}", err);
        AppError::Unauthorized
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AppError::Conflict("Resource already exists".to_string());
            }
        }
        AppError::InternalServerError(format!("Storage error: {}", err))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::InternalServerError(format!("Password hashing error: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
