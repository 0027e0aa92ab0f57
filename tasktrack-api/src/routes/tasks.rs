/// Task endpoints
///
/// Every handler scopes its query to the authenticated caller. A task that
/// does not exist and a task owned by someone else are indistinguishable:
/// both return `404 {"error": "Task not found"}`.
///
/// # Endpoints
///
/// - `GET /tasks` - List the caller's tasks
/// - `POST /tasks` - Create a task
/// - `PUT /tasks/:id/complete` - Mark a task completed
/// - `DELETE /tasks/:id` - Delete a task

use crate::{
    app::AppState,
    error::ApiResult,
    routes::{json_body, path_param, MessageResponse},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::middleware::AuthContext,
    models::task::Task,
};

/// Create task request
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Missing is treated the same as empty
    #[serde(default)]
    pub description: String,
}

/// Task list response
#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

/// List the caller's tasks in creation order
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<TasksResponse>> {
    let tasks = Task::list_by_user(&state.db, auth.user_id).await?;
    Ok(Json(TasksResponse { tasks }))
}

/// Create a task owned by the caller
///
/// ```text
/// POST /tasks
/// { "description": "write report" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Description empty or whitespace
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let req = json_body(payload)?;
    let task = Task::create(&state.db, auth.user_id, &req.description).await?;
    tracing::info!(user_id = auth.user_id, task_id = task.id, "Task created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Task created successfully")),
    ))
}

/// Mark one of the caller's tasks completed
///
/// # Errors
///
/// - `400 Bad Request`: Task already completed
/// - `404 Not Found`: No such task for this caller
pub async fn complete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    task_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let task_id = path_param(task_id)?;
    Task::complete(&state.db, auth.user_id, task_id).await?;
    tracing::info!(user_id = auth.user_id, task_id, "Task completed");

    Ok(Json(MessageResponse::new("Task marked as completed")))
}

/// Delete one of the caller's tasks
///
/// # Errors
///
/// - `404 Not Found`: No such task for this caller
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    task_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let task_id = path_param(task_id)?;
    Task::delete(&state.db, auth.user_id, task_id).await?;
    tracing::info!(user_id = auth.user_id, task_id, "Task deleted");

    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
