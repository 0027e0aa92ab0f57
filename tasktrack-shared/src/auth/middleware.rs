/// Bearer-token authorization gate for Axum
///
/// [`require_bearer`] is the single enforcement point for protected routes. It
/// extracts `Authorization: Bearer <token>`, validates the token with the
/// [`TokenService`], and on success adds an [`AuthContext`] to the request
/// extensions. Any failure short-circuits with `401 {"error": ...}` and the
/// wrapped handler never runs.
///
/// Handlers must take the caller's identity from `AuthContext`, never from a
/// path or body parameter.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Extension, Router};
/// use tasktrack_shared::auth::middleware::{require_bearer, AuthContext};
/// use tasktrack_shared::auth::revocation::InMemoryRevocationStore;
/// use tasktrack_shared::auth::token_service::TokenService;
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     format!("user {}", auth.user_id)
/// }
///
/// let tokens = TokenService::new(
///     "a-secret-that-is-at-least-32-bytes-long",
///     Arc::new(InMemoryRevocationStore::new()),
/// );
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn_with_state(tokens, require_bearer));
/// ```

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use super::jwt::{TokenError, TokenType};
use super::token_service::TokenService;

/// Authenticated identity added to request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i64,

    /// Identifier of the presented access token
    pub token_id: Uuid,

    /// When the presented access token expires
    pub expires_at: DateTime<Utc>,
}

/// Error type for the authorization gate
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    InvalidFormat,

    /// Token failed validation
    InvalidToken(TokenError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing authorization header".to_string())
            }
            AuthError::InvalidFormat => {
                (StatusCode::UNAUTHORIZED, "Expected Bearer token".to_string())
            }
            AuthError::InvalidToken(TokenError::Unavailable(msg)) => {
                tracing::error!("Revocation store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable".to_string(),
                )
            }
            AuthError::InvalidToken(TokenError::Expired) => {
                (StatusCode::UNAUTHORIZED, "Token expired".to_string())
            }
            AuthError::InvalidToken(TokenError::Revoked) => {
                (StatusCode::UNAUTHORIZED, "Token revoked".to_string())
            }
            AuthError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Extracts the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidFormat)
}

/// Authorization gate middleware
///
/// Use with `axum::middleware::from_fn_with_state(token_service, require_bearer)`.
pub async fn require_bearer(
    State(tokens): State<TokenService>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers())?;

    let claims = tokens
        .validate_kind(token, TokenType::Access)
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AuthError::InvalidToken(e)
        })?;

    let auth_context = AuthContext {
        user_id: claims.sub,
        token_id: claims.jti,
        expires_at: claims.expires_at(),
    };
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));

        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_missing() {
        let headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert!(matches!(bearer_token(&headers), Err(AuthError::InvalidFormat)));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(matches!(bearer_token(&headers), Err(AuthError::InvalidFormat)));
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken(TokenError::Revoked).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response =
            AuthError::InvalidToken(TokenError::Unavailable("down".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
