/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Register, login, refresh, logout
/// - `users`: Profile picture update, user details, user list
/// - `companies`: Completed-task progress per company
/// - `tasks`: Ownership-scoped task CRUD

pub mod auth;
pub mod companies;
pub mod health;
pub mod tasks;
pub mod users;

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, PathRejection},
        multipart::MultipartRejection,
        Multipart, Path,
    },
    http::{header, HeaderMap},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::ApiError;

/// `{"message": ...}` response body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Unwraps a JSON body, turning extractor rejections into `400 {"error": ...}`
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Parses an optional JSON body
///
/// An empty body means "no body" and yields `T::default()`. Anything else must
/// be declared `application/json` and parse, or the request fails with 400.
pub(crate) fn optional_json_body<T>(headers: &HeaderMap, body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json") || ct.contains("+json"))
        .unwrap_or(false);
    if !is_json {
        return Err(ApiError::BadRequest(
            "Expected request with `Content-Type: application/json`".to_string(),
        ));
    }

    json_body(Json::<T>::from_bytes(body))
}

/// Unwraps a path parameter, turning extractor rejections into `400 {"error": ...}`
pub(crate) fn path_param<T>(path: Result<Path<T>, PathRejection>) -> Result<T, ApiError> {
    path.map(|Path(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Unwraps a multipart extractor, turning rejections into `400 {"error": ...}`
pub(crate) fn multipart_body(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Multipart, ApiError> {
    multipart.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Returns the trimmed value, or `None` if absent or blank
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    struct Body {
        #[serde(default)]
        token: Option<String>,
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        headers
    }

    #[test]
    fn test_optional_json_body_empty_is_default() {
        let body: Body = optional_json_body(&HeaderMap::new(), &Bytes::new()).unwrap();
        assert!(body.token.is_none());
    }

    #[test]
    fn test_optional_json_body_requires_content_type() {
        let bytes = Bytes::from_static(br#"{"token": "abc"}"#);
        let result: Result<Body, _> = optional_json_body(&HeaderMap::new(), &bytes);
        assert!(matches!(result, Err(ApiError::BadRequest(_))));

        let body: Body = optional_json_body(&json_headers(), &bytes).unwrap();
        assert_eq!(body.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_optional_json_body_rejects_bad_json() {
        let bytes = Bytes::from_static(b"{not json");
        let result: Result<Body, _> = optional_json_body(&json_headers(), &bytes);
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some(" alice ".to_string())), Some("alice".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
