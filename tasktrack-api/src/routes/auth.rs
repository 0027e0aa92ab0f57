/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
/// - Token refresh
/// - Logout
///
/// # Endpoints
///
/// - `POST /register` - Register new user (multipart form)
/// - `POST /login` - Login and get tokens
/// - `POST /refresh` - Exchange a refresh token for a new access token
/// - `POST /logout` - Revoke the presented tokens (bearer)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{json_body, multipart_body, non_blank, optional_json_body, MessageResponse},
    uploads::{multipart_error, Upload},
};
use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::{
        jwt::TokenType,
        middleware::AuthContext,
        password,
        token_service::TokenPair,
    },
    models::{
        company::Company,
        user::{CreateUser, User},
    },
};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid username or password";
const MISSING_FIELDS: &str = "Missing required fields";

/// Register request, assembled from the multipart form
#[derive(Debug, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 80, message = "Username must be at most 80 characters"))]
    pub username: String,

    #[validate(length(max = 15, message = "Mobile number must be at most 15 characters"))]
    pub mobile_no: String,

    pub password: String,

    #[validate(length(max = 100, message = "Company name must be at most 100 characters"))]
    pub company_name: String,

    pub profile_pic: Option<Upload>,
}

/// Raw multipart fields before presence checks
#[derive(Debug, Default)]
struct RegisterForm {
    username: Option<String>,
    mobile_no: Option<String>,
    password: Option<String>,
    company_name: Option<String>,
    profile_pic: Option<Upload>,
}

impl RegisterForm {
    async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "profile_pic" => form.profile_pic = Upload::from_field(field).await?,
                "username" | "mobile_no" | "password" | "company_name" => {
                    let value = field.text().await.map_err(multipart_error)?;
                    let slot = match name.as_str() {
                        "username" => &mut form.username,
                        "mobile_no" => &mut form.mobile_no,
                        "password" => &mut form.password,
                        _ => &mut form.company_name,
                    };
                    *slot = Some(value);
                }
                other => tracing::debug!(field = other, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    /// Fails with `400 Missing required fields` unless every text field is non-blank
    fn into_request(self) -> ApiResult<RegisterRequest> {
        match (
            non_blank(self.username),
            non_blank(self.mobile_no),
            self.password.filter(|p| !p.is_empty()),
            non_blank(self.company_name),
        ) {
            (Some(username), Some(mobile_no), Some(password), Some(company_name)) => {
                Ok(RegisterRequest {
                    username,
                    mobile_no,
                    password,
                    company_name,
                    profile_pic: self.profile_pic,
                })
            }
            _ => Err(ApiError::BadRequest(MISSING_FIELDS.to_string())),
        }
    }
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token
    pub access_token: String,
}

/// Logout request body (optional)
#[derive(Debug, Default, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token to revoke alongside the access token
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /register
/// Content-Type: multipart/form-data
///
/// username=alice, mobile_no=555-0100, password=pw, company_name=Acme,
/// profile_pic=<file, optional>
/// ```
///
/// # Response
///
/// `201 {"message": "User registered successfully!"}`
///
/// # Errors
///
/// - `400 Bad Request`: Not a multipart body, or a missing or over-long field
/// - `409 Conflict`: Username or mobile number already exists
/// - `500 Internal Server Error`: The profile picture could not be written;
///   no user or company is created
pub async fn register(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let req = RegisterForm::read(multipart_body(multipart)?)
        .await?
        .into_request()?;
    req.validate()?;

    // Argon2 is CPU-bound; keep it off the async workers
    let plaintext = req.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
        .await
        .map_err(|e| ApiError::InternalError(format!("Hashing task failed: {}", e)))??;

    let upload_dir = state.config.uploads.dir.as_str();
    let profile_pic = req.profile_pic.as_ref().map(|u| u.stored_path(upload_dir));

    let mut tx = state.db.begin().await?;
    let company = Company::get_or_create(&mut *tx, &req.company_name).await?;
    let user = User::create(
        &mut *tx,
        CreateUser {
            username: req.username,
            mobile_no: req.mobile_no,
            password_hash,
            profile_pic,
            company_id: Some(company.id),
        },
    )
    .await?;

    // Dropping the transaction on a failed write rolls the rows back
    if let Some(upload) = &req.profile_pic {
        upload.save(upload_dir).await?;
    }
    if let Err(e) = tx.commit().await {
        if let Some(upload) = &req.profile_pic {
            upload.remove(upload_dir).await;
        }
        return Err(e.into());
    }

    tracing::info!(user_id = user.id, company_id = company.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully!")),
    ))
}

/// Login with username and password
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/json
///
/// { "username": "alice", "password": "pw" }
/// ```
///
/// # Response
///
/// ```json
/// { "access_token": "eyJ...", "refresh_token": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields
/// - `401 Unauthorized`: Unknown user or wrong password (same message for both)
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<TokenPair>> {
    let req = json_body(payload)?;
    let (Some(username), Some(password)) = (non_blank(req.username), req.password) else {
        return Err(ApiError::BadRequest(MISSING_FIELDS.to_string()));
    };

    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::InternalError(format!("Verification task failed: {}", e)))?;

    if !verified {
        tracing::debug!(user_id = user.id, "Password mismatch");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let pair = state.tokens.issue_pair(user.id)?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(pair))
}

/// Exchange a refresh token for a new access token
///
/// ```text
/// POST /refresh
/// { "refresh_token": "eyJ..." }
/// ```
///
/// Returns `{"access_token": "..."}`. An access token, an expired token, or a
/// revoked refresh token is rejected with 401.
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<RefreshResponse>> {
    let req = json_body(payload)?;
    let access_token = state.tokens.refresh(&req.refresh_token).await?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Revoke the caller's access token, and the refresh token if one is supplied
///
/// ```text
/// POST /logout
/// Authorization: Bearer <access token>
/// { "refresh_token": "eyJ..." }   (optional)
/// ```
///
/// An empty body revokes only the access token. A non-empty body must be JSON
/// (400 otherwise). A supplied refresh token must be valid and belong to the
/// caller; otherwise nothing is revoked and the request fails with 401.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<MessageResponse>> {
    let req: LogoutRequest = optional_json_body(&headers, &body)?;

    if let Some(refresh_token) = req.refresh_token.as_deref() {
        let claims = state
            .tokens
            .validate_kind(refresh_token, TokenType::Refresh)
            .await?;
        if claims.sub != auth.user_id {
            return Err(ApiError::Unauthorized("Invalid token".to_string()));
        }
        state.tokens.revoke(claims.jti).await?;
    }

    state.tokens.revoke(auth.token_id).await?;
    tracing::info!(user_id = auth.user_id, "User logged out");

    Ok(Json(MessageResponse::new("Logged out successfully")))
}
