//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` that every request handler returns.
//! Domain errors from the auth, repository and file-store layers convert into it with
//! `From`, so handlers can use the `?` operator throughout.
//!
//! `AppError` implements `actix_web::error::ResponseError` and renders the uniform
//! envelope `{"success": false, "error": "..."}`. Server-side failures are logged with
//! their cause and reported to the client with a generic message only.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::AuthError;
use crate::files::FileError;
use crate::repository::RepoError;
use crate::store::StoreError;

/// Message sent to clients in place of any internal failure detail.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Represents all possible errors a handler can produce.
///
/// Each variant maps to one HTTP status code.
#[derive(Debug)]
pub enum AppError {
    /// Missing, invalid or expired credentials (HTTP 401).
    Unauthorized(String),
    /// Malformed body, invalid identifier or rejected value (HTTP 400).
    BadRequest(String),
    /// No record matched the owner-scoped lookup (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500). The message is only logged.
    InternalServerError(String),
    /// Failure reported by the document or blob store (HTTP 500). The message is only logged.
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Unauthorized(msg) | AppError::BadRequest(msg) | AppError::NotFound(msg) => {
                msg.as_str()
            }
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                INTERNAL_MESSAGE
            }
        };

        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": message
        }))
    }
}

/// Validation failures are client errors; the field messages are passed through.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::BadRequest(error.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        match error {
            AuthError::UsernameTaken => AppError::BadRequest(error.to_string()),
            AuthError::InvalidCredentials => AppError::Unauthorized(error.to_string()),
            AuthError::NoToken
            | AuthError::InvalidToken(_)
            | AuthError::Expired
            | AuthError::MalformedClaims => {
                log::debug!("rejecting credentials: {}", error);
                AppError::Unauthorized("Unauthorized".into())
            }
            AuthError::HashFailure(_) | AuthError::TokenIssue(_) => {
                AppError::InternalServerError(error.to_string())
            }
            AuthError::Store(inner) => inner.into(),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(error: RepoError) -> AppError {
        match error {
            RepoError::NotFound => AppError::NotFound(error.to_string()),
            RepoError::InvalidId(_) | RepoError::InvalidStatus(_) => {
                AppError::BadRequest(error.to_string())
            }
            RepoError::Store(inner) => inner.into(),
        }
    }
}

impl From<FileError> for AppError {
    fn from(error: FileError) -> AppError {
        match error {
            FileError::NotFound => AppError::NotFound(error.to_string()),
            FileError::InvalidId(_) | FileError::TooLarge(_) => {
                AppError::BadRequest(error.to_string())
            }
            FileError::Store(inner) => inner.into(),
        }
    }
}
