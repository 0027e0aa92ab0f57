/// Task model and ownership-scoped database operations
///
/// Every query filters on both the task ID and the owning user's ID. A task
/// that does not exist and a task owned by someone else are indistinguishable
/// to the caller: both produce [`TaskError::NotFoundOrForbidden`].
///
/// Mutations are single conditional statements, so the ownership check and
/// the change happen atomically.
///
/// # State Machine
///
/// ```text
/// open (is_completed = false, completed_at = NULL)
///   → completed (is_completed = true, completed_at = time of completion)
/// ```
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     description TEXT NOT NULL,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     completed_at TIMESTAMPTZ,
///     CONSTRAINT tasks_completion_check CHECK (
///         (is_completed AND completed_at IS NOT NULL)
///         OR (NOT is_completed AND completed_at IS NULL)
///     )
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::models::task::Task;
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, user_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// let task = Task::create(&pool, user_id, "write report").await?;
/// let done = Task::complete(&pool, user_id, task.id).await?;
/// assert!(done.completed_at.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};

use super::timestamp;

const TASK_COLUMNS: &str = "id, user_id, description, is_completed, created_at, completed_at";

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Description is empty or whitespace
    #[error("Task description cannot be empty")]
    EmptyDescription,

    /// No task with this ID belongs to the caller
    #[error("Task not found")]
    NotFoundOrForbidden,

    /// Task was already completed
    #[error("Task is already completed")]
    AlreadyCompleted,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Personal task owned by a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// What needs doing
    pub description: String,

    /// Whether the task is done
    pub is_completed: bool,

    /// When the task was created
    #[serde(serialize_with = "timestamp::serialize")]
    pub created_at: DateTime<Utc>,

    /// When the task was completed; set iff `is_completed`
    #[serde(serialize_with = "timestamp::serialize_option")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Trims a description and rejects it if nothing is left
    pub fn validate_description(description: &str) -> Result<&str, TaskError> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(TaskError::EmptyDescription);
        }
        Ok(trimmed)
    }

    /// Creates an open task owned by `user_id`
    ///
    /// The description is validated before any database access.
    pub async fn create(pool: &PgPool, user_id: i64, description: &str) -> Result<Self, TaskError> {
        let description = Self::validate_description(description)?;

        let query = format!(
            "INSERT INTO tasks (user_id, description) VALUES ($1, $2) RETURNING {}",
            TASK_COLUMNS
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .bind(description)
            .fetch_one(pool)
            .await?;

        Ok(task)
    }

    /// Finds a task by ID, only if `user_id` owns it
    pub async fn find_owned<'e, E>(
        executor: E,
        user_id: i64,
        task_id: i64,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
            TASK_COLUMNS
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Marks a task completed, stamping `completed_at`
    ///
    /// # Errors
    ///
    /// - `NotFoundOrForbidden` if the task doesn't exist or isn't owned by `user_id`
    /// - `AlreadyCompleted` if it was completed before; `completed_at` is left unchanged
    pub async fn complete(pool: &PgPool, user_id: i64, task_id: i64) -> Result<Self, TaskError> {
        let query = format!(
            r#"
            UPDATE tasks
            SET is_completed = TRUE, completed_at = NOW()
            WHERE id = $1 AND user_id = $2 AND NOT is_completed
            RETURNING {}
            "#,
            TASK_COLUMNS
        );

        let updated = sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        if let Some(task) = updated {
            return Ok(task);
        }

        // Nothing matched: either it's already done or the caller can't see it
        match Self::find_owned(pool, user_id, task_id).await? {
            Some(_) => Err(TaskError::AlreadyCompleted),
            None => Err(TaskError::NotFoundOrForbidden),
        }
    }

    /// Deletes a task owned by `user_id`
    ///
    /// # Errors
    ///
    /// `NotFoundOrForbidden` if the task doesn't exist or isn't owned by `user_id`
    pub async fn delete(pool: &PgPool, user_id: i64, task_id: i64) -> Result<(), TaskError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskError::NotFoundOrForbidden);
        }

        Ok(())
    }

    /// Lists a user's tasks in creation order
    pub async fn list_by_user<'e, E>(executor: E, user_id: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at, id",
            TASK_COLUMNS
        );

        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .fetch_all(executor)
            .await
    }
}
