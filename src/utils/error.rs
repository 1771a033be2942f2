use crate::database::DatabaseError;
use crate::services::user_repository::RepoError;
use crate::services::user_validator::ValidationError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

pub const USER_NOT_FOUND: &str = "User not found";
pub const USER_ALREADY_EXISTS: &str = "User already exists";
pub const EMAIL_ALREADY_EXISTS: &str = "Email already in use";

#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    NotFound,
    DuplicateName(String),
    DuplicateEmail(String),
    Storage(String),
}

/// `{"message": ...}` body shared by every error response
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(value_type = Object, example = "User not found")]
    pub message: serde_json::Value,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(err) => write!(f, "Invalid request: {}", err),
            AppError::NotFound => write!(f, "Not found: {}", USER_NOT_FOUND),
            AppError::DuplicateName(name) => write!(f, "Duplicate name: {}", name),
            AppError::DuplicateEmail(email) => write!(f, "Duplicate email: {}", email),
            AppError::Storage(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            // "already exists" keeps the historical 404 so existing clients don't break
            AppError::NotFound | AppError::DuplicateName(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail(_) => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Validation(err) => serde_json::json!(err.fields),
            AppError::NotFound => USER_NOT_FOUND.into(),
            AppError::DuplicateName(_) => USER_ALREADY_EXISTS.into(),
            AppError::DuplicateEmail(_) => EMAIL_ALREADY_EXISTS.into(),
            AppError::Storage(msg) => {
                log::error!("❌ {}", msg);
                "Internal Server Error".into()
            }
        };

        HttpResponse::build(self.status_code()).json(MessageResponse { message })
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::DuplicateName(name) => AppError::DuplicateName(name),
            RepoError::DuplicateEmail(email) => AppError::DuplicateEmail(email),
            RepoError::Sqlite(err) => AppError::Storage(err.to_string()),
        }
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Storage(err.to_string())
    }
}
