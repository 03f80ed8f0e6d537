//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Field name to message map reported for validation failures.
pub type FieldErrors = BTreeMap<String, String>;

/// Application-wide error type.
///
/// Each variant maps to one HTTP status code.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Missing, invalid, expired or revoked tokens; bad credentials
/// - **Authorization Errors**: Caller does not own the addressed account
/// - **Resource Errors**: Requested resources not found
/// - **Business Logic Errors**: Uniqueness conflicts, insufficient funds
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// Unique-constraint violations never land here, see the `From<sqlx::Error>` impl.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Unexpected failure outside the database (hashing, token signing, ...).
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),

    /// Bearer token is missing, malformed, expired or revoked.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("{0}")]
    Unauthorized(&'static str),

    /// The authenticated user addressed an account that is not their own.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Access denied")]
    AccessDenied,

    /// Login with an unknown email or a wrong password.
    ///
    /// Returns HTTP 400 Bad Request, without telling which of the two was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Requested entity does not exist or belongs to another user.
    ///
    /// Returns HTTP 404 Not Found. The string is the client-facing message.
    #[error("{0}")]
    NotFound(&'static str),

    /// A uniqueness rule (email, DNI, alias, card number) would be violated.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("{0}")]
    Conflict(String),

    /// Source account balance is lower than the requested amount.
    ///
    /// Returns HTTP 410 Gone.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Request body or parameters are invalid as a whole.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("{0}")]
    InvalidRequest(String),

    /// One or more request fields failed validation.
    ///
    /// Returns HTTP 400 Bad Request with a field-message map.
    #[error("Validation failed")]
    Validation(FieldErrors),
}

impl AppError {
    /// Single-field validation failure.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), message.into());
        Self::Validation(fields)
    }

    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Database(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::AccessDenied => (StatusCode::FORBIDDEN, "access_denied"),
            AppError::InvalidCredentials => (StatusCode::BAD_REQUEST, "invalid_credentials"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::InsufficientFunds => (StatusCode::GONE, "insufficient_funds"),
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
        }
    }
}

/// SQLSTATE raised when a balance update leaves the `BIGINT` range.
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Translate database errors.
///
/// Unique-constraint violations become `Conflict` so that a race between an
/// existence check and the insert still surfaces as 409. Arithmetic overflow
/// becomes `InvalidRequest`.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::Conflict(conflict_message(db_err.constraint()).to_string());
            }
            if db_err.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE) {
                return AppError::InvalidRequest("Amount out of range".to_string());
            }
        }
        AppError::Database(err)
    }
}

/// Client-facing message for a violated unique constraint.
fn conflict_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_email_key") => "Email is already in use",
        Some("users_dni_key") => "DNI is already in use",
        Some("users_alias_key") => "Alias is already in use",
        Some("users_cvu_key") => "CVU is already in use",
        Some("cards_card_number_key") => "Card number already exists",
        _ => "Resource already exists",
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Validation errors additionally carry `"fields": {"<field>": "<message>"}`.
/// Server-side failures hide their details from the client and are logged instead.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = match self {
            AppError::Database(ref err) => {
                tracing::error!(error = %err, "database error");
                json!({ "error": { "code": code, "message": "An internal error occurred" } })
            }
            AppError::Internal(ref err) => {
                tracing::error!(error = ?err, "internal error");
                json!({ "error": { "code": code, "message": "An internal error occurred" } })
            }
            AppError::Validation(ref fields) => json!({
                "error": {
                    "code": code,
                    "message": self.to_string(),
                    "fields": fields,
                }
            }),
            _ => json!({ "error": { "code": code, "message": self.to_string() } }),
        };

        (status, Json(body)).into_response()
    }
}
