//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in KitabCart                              │
//! │                                                                         │
//! │  Handler Function                                                       │
//! │  Result<T, ApiError>                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Database Error? ─── DbError ──────────┐                               │
//! │         │                              │                               │
//! │         ▼                              ▼                               │
//! │  Validation Error? ── CoreError ───► ApiError ──► IntoResponse         │
//! │                                                       │                 │
//! │                                                       ▼                 │
//! │                    HTTP status + {"message": ..., "code": ...}         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal database failures are logged server-side with full detail and
//! returned to the client as a generic message: raw driver text is not a
//! client-facing contract.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use kitab_core::{CoreError, ValidationError};
use kitab_db::DbError;

/// API error returned from HTTP handlers.
///
/// ## Serialization
/// This is what the client receives when a request fails:
/// ```json
/// {
///   "message": "Order not found: o-123",
///   "code": "NOT_FOUND"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Wrong email/password pair at login (400, matching the original API)
    InvalidCredentials,

    /// Missing or invalid bearer token (401)
    AuthError,

    /// Valid token, insufficient role (403)
    Forbidden,

    /// Resource not found (404)
    NotFound,

    /// Duplicate resource, e.g. email already registered (400)
    Conflict,

    /// Business rule rejected the request (422)
    BusinessRule,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidCredentials => StatusCode::BAD_REQUEST,
            ErrorCode::AuthError => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::BAD_REQUEST,
            ErrorCode::BusinessRule => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Validation failure (400).
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Bad login credentials (400).
    pub fn invalid_credentials() -> Self {
        ApiError::new(ErrorCode::InvalidCredentials, "Invalid credentials")
    }

    /// Missing/invalid token (401).
    pub fn auth(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::AuthError, message)
    }

    /// Insufficient role (403).
    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    /// Missing resource (404).
    pub fn not_found(entity: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
    }

    /// Internal failure with a generic client message (500).
    pub fn internal() -> Self {
        ApiError::new(ErrorCode::Internal, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        let body = Json(json!({
            "message": self.message,
            "code": self.code,
        }));
        (status, body).into_response()
    }
}

/// Map core business errors onto API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::Validation(_) => ApiError::new(ErrorCode::ValidationError, err.to_string()),
            CoreError::BookNotFound(_) | CoreError::OrderNotFound(_) => {
                ApiError::new(ErrorCode::NotFound, err.to_string())
            }
            CoreError::InsufficientStock { .. }
            | CoreError::PriceMismatch { .. }
            | CoreError::InvalidStatusTransition { .. } => {
                ApiError::new(ErrorCode::BusinessRule, err.to_string())
            }
            CoreError::CartTooLarge { .. } | CoreError::QuantityTooLarge { .. } => {
                ApiError::new(ErrorCode::ValidationError, err.to_string())
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::new(ErrorCode::ValidationError, err.to_string())
    }
}

/// Map database errors onto API errors.
///
/// Anything that is not a recognizable client mistake collapses to a
/// generic 500; the detail goes to the server log only.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, .. } => {
                ApiError::new(ErrorCode::Conflict, format!("{} already in use", field))
            }
            DbError::ForeignKeyViolation { .. } => {
                ApiError::validation("Referenced record does not exist")
            }
            DbError::Business(core) => core.into(),
            other => {
                error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitab_core::OrderStatus;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::ValidationError.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::AuthError.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::BusinessRule.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_db_error_detail_is_not_leaked() {
        let db_err = DbError::QueryFailed("secret table layout details".to_string());
        let api: ApiError = db_err.into();
        assert_eq!(api.code, ErrorCode::DatabaseError);
        assert!(!api.message.contains("secret"));
    }

    #[test]
    fn test_business_errors_map_to_422() {
        let core = CoreError::InvalidStatusTransition {
            order_id: "o1".to_string(),
            from: OrderStatus::Delivered,
            to: OrderStatus::Cancelled,
        };
        let api: ApiError = DbError::Business(core).into();
        assert_eq!(api.code, ErrorCode::BusinessRule);
    }

    #[test]
    fn test_duplicate_email_maps_to_conflict() {
        let api: ApiError = DbError::duplicate("email", "a@b.com").into();
        assert_eq!(api.code, ErrorCode::Conflict);
        assert_eq!(api.code.status(), StatusCode::BAD_REQUEST);
    }
}
