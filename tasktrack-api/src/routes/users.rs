/// User endpoints
///
/// - `PUT /profile/update` - Replace the caller's profile picture (multipart)
/// - `GET /user/:id` - User with company and tasks
/// - `GET /users` - All users with their company name

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{multipart_body, path_param},
    uploads::{multipart_error, Upload},
};
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::PathRejection,
        Multipart, Path, State,
    },
    Extension, Json,
};
use serde::Serialize;
use tasktrack_shared::{
    auth::middleware::AuthContext,
    models::user::{User, UserDetails, UserSummary},
};

/// Profile update response
#[derive(Debug, Serialize)]
pub struct ProfileUpdateResponse {
    pub message: String,
    pub profile_pic: String,
}

/// User list response
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

/// Replace the caller's profile picture
///
/// Expects a `profile_pic` file field. The row update and the file write
/// succeed or fail together: the update commits only after the file is on
/// disk, and the file is removed again if the commit fails.
///
/// # Errors
///
/// - `400 Bad Request`: Not a multipart body, or no file in the form
/// - `404 Not Found`: The caller's user row no longer exists
/// - `500 Internal Server Error`: The file could not be written; nothing changes
pub async fn update_profile_pic(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ProfileUpdateResponse>> {
    let mut multipart = multipart_body(multipart)?;
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("profile_pic") {
            upload = Upload::from_field(field).await?;
        }
    }
    let upload = upload.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;

    let upload_dir = state.config.uploads.dir.as_str();
    let path = upload.stored_path(upload_dir);

    let mut tx = state.db.begin().await?;
    User::update_profile_pic(&mut *tx, auth.user_id, &path)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    upload.save(upload_dir).await?;
    if let Err(e) = tx.commit().await {
        upload.remove(upload_dir).await;
        return Err(e.into());
    }
    tracing::info!(user_id = auth.user_id, profile_pic = %path, "Profile picture updated");

    Ok(Json(ProfileUpdateResponse {
        message: "Profile picture updated successfully".to_string(),
        profile_pic: path,
    }))
}

/// Get a user with their company and tasks
pub async fn get_user(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<UserDetails>> {
    let user_id = path_param(user_id)?;
    let details = User::details(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(details))
}

/// List all users with their company name
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UsersResponse>> {
    let users = User::list_with_company(&state.db).await?;
    Ok(Json(UsersResponse { users }))
}
