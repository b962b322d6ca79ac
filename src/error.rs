use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::database::{
    ADDRESSES_USER_FKEY, CREDIT_CARDS_USER_FKEY, RepositoryError, USERS_CPF_KEY, USERS_EMAIL_KEY,
};
use crate::utils::FieldErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(FieldErrors),

    #[error("This email is already registered.")]
    DuplicateEmail,

    #[error("This CPF is already registered.")]
    DuplicateCpf,

    #[error("{0} not found.")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("Too many requests, retry in {0} seconds.")]
    RateLimited(u64),

    #[error("Database error: {0}")]
    Database(RepositoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Body of every non-field error: `{"error": "..."}`.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "User not found.")]
    pub error: String,
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

// 存储层约束是唯一性的最终来源，这里将其映射为与应用层检查相同的错误
impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match &err {
            RepositoryError::UniqueViolation(c) if c == USERS_EMAIL_KEY => AppError::DuplicateEmail,
            RepositoryError::UniqueViolation(c) if c == USERS_CPF_KEY => AppError::DuplicateCpf,
            RepositoryError::ForeignKeyViolation(c)
                if c == ADDRESSES_USER_FKEY || c == CREDIT_CARDS_USER_FKEY =>
            {
                AppError::Validation(FieldErrors::single(
                    "user_id",
                    "Invalid pk - user does not exist.",
                ))
            }
            _ => AppError::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_)
            | AppError::DuplicateEmail
            | AppError::DuplicateCpf
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match self {
            AppError::Validation(errors) => (status, Json(errors)).into_response(),
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(status = status.as_u16(), error = %self, "Request failed");
                // 不向客户端暴露内部错误细节
                let body = Json(ErrorResponse {
                    error: "Internal server error.".to_string(),
                });
                (status, body).into_response()
            }
            _ => {
                let body = Json(ErrorResponse {
                    error: self.to_string(),
                });
                (status, body).into_response()
            }
        }
    }
}
