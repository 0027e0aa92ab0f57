/// Company model and database operations
///
/// Companies are created lazily the first time a registration names them and
/// are never deleted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE companies (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(100) NOT NULL,
///     CONSTRAINT companies_name_key UNIQUE (name)
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

/// Company model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    /// Unique company ID
    pub id: i64,

    /// Company name, unique across companies
    pub name: String,
}

/// Completed-task total for one company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanyProgress {
    /// Company ID
    pub id: i64,

    /// Company name
    pub name: String,

    /// Completed tasks across all users of the company
    pub total_completed_tasks: i64,
}

impl Company {
    /// Returns the company named `name`, inserting it if absent
    ///
    /// This is a single `INSERT ... ON CONFLICT DO UPDATE ... RETURNING`
    /// statement, so concurrent callers racing on a new name all receive the
    /// same row and exactly one row is created. Pass a transaction to make it
    /// part of a larger unit of work.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tasktrack_shared::models::company::Company;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let mut tx = pool.begin().await?;
    /// let company = Company::get_or_create(&mut *tx, "Acme").await?;
    /// tx.commit().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_or_create<'e, E>(executor: E, name: &str) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        // The no-op update makes RETURNING yield the existing row on conflict
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(executor)
        .await?;

        Ok(company)
    }

    /// Finds a company by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Company>("SELECT id, name FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Finds a company by its unique name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Company>("SELECT id, name FROM companies WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Completed-task totals for every company, ordered by company ID
    ///
    /// One grouped query; companies with no users or no completed tasks report 0.
    pub async fn progress(pool: &PgPool) -> Result<Vec<CompanyProgress>, sqlx::Error> {
        sqlx::query_as::<_, CompanyProgress>(
            r#"
            SELECT c.id,
                   c.name,
                   COUNT(t.id) FILTER (WHERE t.is_completed) AS total_completed_tasks
            FROM companies c
            LEFT JOIN users u ON u.company_id = c.id
            LEFT JOIN tasks t ON t.user_id = u.id
            GROUP BY c.id, c.name
            ORDER BY c.id
            "#,
        )
        .fetch_all(pool)
        .await
    }
}
