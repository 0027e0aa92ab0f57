/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username VARCHAR(80) NOT NULL,
///     mobile_no VARCHAR(15) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     profile_pic VARCHAR(255),
///     company_id BIGINT REFERENCES companies(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_username_key UNIQUE (username),
///     CONSTRAINT users_mobile_no_key UNIQUE (mobile_no)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::models::user::{CreateUser, User};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     mobile_no: "555-0100".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     profile_pic: None,
///     company_id: None,
/// }).await?;
///
/// let details = User::details(&pool, user.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use super::company::Company;
use super::task::Task;
use super::timestamp;

const USER_COLUMNS: &str =
    "id, username, mobile_no, password_hash, profile_pic, company_id, created_at";

/// User account
///
/// The password hash is never serialized.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Login name, unique across users
    pub username: String,

    /// Mobile number, unique across users
    pub mobile_no: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Relative path of the uploaded profile picture
    pub profile_pic: Option<String>,

    /// Company the user belongs to
    pub company_id: Option<i64>,

    /// When the account was created
    #[serde(serialize_with = "timestamp::serialize")]
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub mobile_no: String,
    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
    pub profile_pic: Option<String>,
    pub company_id: Option<i64>,
}

/// A user joined with their company and owned tasks
#[derive(Debug, Clone, Serialize)]
pub struct UserDetails {
    pub id: i64,
    pub username: String,
    pub mobile_no: String,
    pub profile_pic: Option<String>,
    pub company: Option<Company>,
    pub tasks: Vec<Task>,
}

/// A user joined with their company name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub mobile_no: String,
    pub profile_pic: Option<String>,
    pub company_name: Option<String>,
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Returns a unique-violation database error if the username or mobile
    /// number is taken; no row is created in that case.
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            INSERT INTO users (username, mobile_no, password_hash, profile_pic, company_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.username)
            .bind(data.mobile_no)
            .bind(data.password_hash)
            .bind(data.profile_pic)
            .bind(data.company_id)
            .fetch_one(executor)
            .await
    }

    /// Finds a user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Finds a user by username
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Sets the profile picture path
    ///
    /// Returns the updated user, or `None` if no user has this ID.
    pub async fn update_profile_pic<'e, E>(
        executor: E,
        id: i64,
        profile_pic: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE users SET profile_pic = $2 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(profile_pic)
            .fetch_optional(executor)
            .await
    }

    /// Loads a user together with their company and tasks
    ///
    /// Runs inside one read-only transaction so the three lookups see the same
    /// snapshot. Returns `None` if no user has this ID.
    pub async fn details(pool: &PgPool, id: i64) -> Result<Option<UserDetails>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let Some(user) = User::find_by_id(&mut *tx, id).await? else {
            return Ok(None);
        };

        let company = match user.company_id {
            Some(company_id) => Company::find_by_id(&mut *tx, company_id).await?,
            None => None,
        };

        let tasks = Task::list_by_user(&mut *tx, user.id).await?;
        tx.commit().await?;

        Ok(Some(UserDetails {
            id: user.id,
            username: user.username,
            mobile_no: user.mobile_no,
            profile_pic: user.profile_pic,
            company,
            tasks,
        }))
    }

    /// Lists every user with their company name, ordered by ID
    pub async fn list_with_company(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
        sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.username, u.mobile_no, u.profile_pic, c.name AS company_name
            FROM users u
            LEFT JOIN companies c ON c.id = u.company_id
            ORDER BY u.id
            "#,
        )
        .fetch_all(pool)
        .await
    }
}
