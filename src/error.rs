//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned to clients when the datastore is not usable. Internals stay in the logs.
pub const SUPPORT_MESSAGE: &str =
    "The service is temporarily unavailable. Please try again later or contact support.";

/// Errors raised by a [`crate::store::Datastore`]. Database errors are classified by SQLSTATE.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("undefined column: {0}")]
    UndefinedColumn(String),
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("database: {0}")]
    Db(sqlx::Error),
    #[error("datastore: {0}")]
    Other(String),
}

impl StoreError {
    pub fn is_undefined_column(&self) -> bool {
        matches!(self, StoreError::UndefinedColumn(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        let classified = e.as_database_error().and_then(|db| {
            let code = db.code()?;
            match code.as_ref() {
                "42703" => Some(StoreError::UndefinedColumn(db.message().to_string())),
                "23505" => Some(StoreError::UniqueViolation(
                    db.constraint().unwrap_or(db.message()).to_string(),
                )),
                _ => None,
            }
        });
        classified.unwrap_or(StoreError::Db(e))
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// One rejected field of a request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("configuration: {0}")]
    Configuration(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Internal detail is only exposed by debug builds.
fn debug_details(detail: String) -> Option<serde_json::Value> {
    cfg!(debug_assertions).then(|| serde_json::Value::String(detail))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Validation failed".to_string(),
                serde_json::to_value(fields).ok(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            AppError::Configuration(detail) => {
                tracing::error!(detail = %detail, "datastore misconfigured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "config_error",
                    SUPPORT_MESSAGE.to_string(),
                    debug_details(detail),
                )
            }
            AppError::Store(e) => {
                tracing::error!(error = ?e, "datastore request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database request failed".to_string(),
                    debug_details(e.to_string()),
                )
            }
        };
        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}
