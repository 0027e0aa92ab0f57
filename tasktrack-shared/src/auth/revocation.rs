/// Revocation stores for invalidated tokens
///
/// The token service consults a [`RevocationStore`] after a token's signature
/// and expiry check out. The set only grows: entries are never evicted, since
/// a revoked token stops validating on its own once it expires.
///
/// # Implementations
///
/// - [`InMemoryRevocationStore`]: process-local set, empty at startup
/// - [`PgRevocationStore`]: durable `revoked_tokens` table, shared by all instances
///
/// # Schema
///
/// ```sql
/// CREATE TABLE revoked_tokens (
///     jti UUID PRIMARY KEY,
///     revoked_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Error type for revocation store operations
#[derive(Debug, thiserror::Error)]
pub enum RevocationError {
    /// Backing store failed
    #[error("Revocation store error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Storage for revoked token identifiers
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Adds a token identifier to the set. Revoking twice is a no-op.
    async fn revoke(&self, token_id: Uuid) -> Result<(), RevocationError>;

    /// Checks whether a token identifier has been revoked
    async fn is_revoked(&self, token_id: Uuid) -> Result<bool, RevocationError>;
}

/// Process-local revocation set
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    revoked: RwLock<HashSet<Uuid>>,
}

impl InMemoryRevocationStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of revoked identifiers held
    pub async fn len(&self) -> usize {
        self.revoked.read().await.len()
    }

    /// Whether no identifiers have been revoked yet
    pub async fn is_empty(&self) -> bool {
        self.revoked.read().await.is_empty()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn revoke(&self, token_id: Uuid) -> Result<(), RevocationError> {
        self.revoked.write().await.insert(token_id);
        Ok(())
    }

    async fn is_revoked(&self, token_id: Uuid) -> Result<bool, RevocationError> {
        Ok(self.revoked.read().await.contains(&token_id))
    }
}

/// PostgreSQL-backed revocation set
#[derive(Debug, Clone)]
pub struct PgRevocationStore {
    pool: PgPool,
}

impl PgRevocationStore {
    /// Creates a store over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevocationStore for PgRevocationStore {
    async fn revoke(&self, token_id: Uuid) -> Result<(), RevocationError> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (jti)
            VALUES ($1)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(token_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn is_revoked(&self, token_id: Uuid) -> Result<bool, RevocationError> {
        let revoked: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE jti = $1)")
                .bind(token_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(revoked)
    }
}
