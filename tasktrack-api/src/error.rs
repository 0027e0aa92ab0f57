/// Error handling for the API server
///
/// Every handler returns `ApiResult<T>`. Errors render as
/// `{"error": "<message>"}` with the matching status code.
///
/// | Variant | Status |
/// |---|---|
/// | `BadRequest` | 400 |
/// | `Unauthorized` | 401 |
/// | `NotFound` | 404 |
/// | `Conflict` | 409 |
/// | `InternalError` | 500 |
/// | `ServiceUnavailable` | 503 |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::{jwt::TokenError, password::PasswordError},
    db::pool::is_unavailable,
    models::task::TaskError,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed input (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Bad credentials or token (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource absent or not visible to the caller (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unexpected failure (500); details are logged, not returned
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Datastore unreachable or timed out (503)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Convert validation failures to a 400 carrying the first field message
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(_, errs)| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Validation failed".to_string());
        ApiError::BadRequest(message)
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if is_unavailable(&err) {
            return ApiError::ServiceUnavailable(format!("Database unavailable: {}", err));
        }

        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let message = match db_err.constraint() {
                    Some(c) if c.contains("username") => "Username already exists",
                    Some(c) if c.contains("mobile_no") => "Mobile number already exists",
                    _ => "Resource already exists",
                };
                ApiError::Conflict(message.to_string())
            }
            other => ApiError::InternalError(format!("Database error: {}", other)),
        }
    }
}

/// Convert task errors to API errors
impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::EmptyDescription => ApiError::BadRequest(err.to_string()),
            TaskError::NotFoundOrForbidden => ApiError::NotFound(err.to_string()),
            TaskError::AlreadyCompleted => ApiError::BadRequest(err.to_string()),
            TaskError::Database(e) => ApiError::from(e),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert token errors to API errors
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            TokenError::Revoked => ApiError::Unauthorized("Token revoked".to_string()),
            TokenError::Malformed(_) => ApiError::Unauthorized("Invalid token".to_string()),
            TokenError::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
            TokenError::CreateError(msg) => ApiError::InternalError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::Conflict("Username already exists".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Username already exists" }));
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::InternalError("connection string leaked".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "An internal error occurred");
    }

    #[test]
    fn test_task_error_mapping() {
        assert!(matches!(
            ApiError::from(TaskError::EmptyDescription),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(TaskError::AlreadyCompleted),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(TaskError::NotFoundOrForbidden),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn test_sqlx_error_mapping() {
        assert!(matches!(
            ApiError::from(sqlx::Error::PoolTimedOut),
            ApiError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            ApiError::from(sqlx::Error::RowNotFound),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn test_token_error_mapping() {
        assert!(matches!(ApiError::from(TokenError::Expired), ApiError::Unauthorized(_)));
        assert!(matches!(ApiError::from(TokenError::Revoked), ApiError::Unauthorized(_)));
        assert!(matches!(
            ApiError::from(TokenError::Unavailable("down".to_string())),
            ApiError::ServiceUnavailable(_)
        ));
    }
}
