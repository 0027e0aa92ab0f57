/// Access/refresh token lifecycle
///
/// [`TokenService`] owns the signing secret, the TTL for each token type, and
/// an injected [`RevocationStore`]. It is cheap to clone and is shared by the
/// router state and the authorization gate.
///
/// Validation order: signature and structure, expiry, token type, revocation.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasktrack_shared::auth::revocation::InMemoryRevocationStore;
/// use tasktrack_shared::auth::token_service::TokenService;
/// use tasktrack_shared::auth::jwt::TokenError;
///
/// # async fn example() -> Result<(), TokenError> {
/// let tokens = TokenService::new(
///     "a-secret-that-is-at-least-32-bytes-long",
///     Arc::new(InMemoryRevocationStore::new()),
/// );
///
/// let pair = tokens.issue_pair(1)?;
/// assert_eq!(tokens.validate(&pair.access_token).await?, 1);
///
/// tokens.revoke_token(&pair.access_token, tasktrack_shared::auth::jwt::TokenType::Access).await?;
/// assert!(matches!(tokens.validate(&pair.access_token).await, Err(TokenError::Revoked)));
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{create_token, decode_token, Claims, TokenError, TokenType};
use super::revocation::RevocationStore;

/// Default access token lifetime
pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 50;

/// Default refresh token lifetime
pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 30;

/// Access and refresh token issued together at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token
    pub access_token: String,

    /// Long-lived refresh token
    pub refresh_token: String,
}

/// Issues, validates, and revokes tokens
#[derive(Clone)]
pub struct TokenService {
    secret: Arc<str>,
    access_ttl: Duration,
    refresh_ttl: Duration,
    revocations: Arc<dyn RevocationStore>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a service with the default TTLs (50 minutes / 30 days)
    pub fn new(secret: impl Into<String>, revocations: Arc<dyn RevocationStore>) -> Self {
        Self::with_ttls(
            secret,
            Duration::minutes(DEFAULT_ACCESS_TTL_MINUTES),
            Duration::days(DEFAULT_REFRESH_TTL_DAYS),
            revocations,
        )
    }

    /// Creates a service with explicit TTLs
    pub fn with_ttls(
        secret: impl Into<String>,
        access_ttl: Duration,
        refresh_ttl: Duration,
        revocations: Arc<dyn RevocationStore>,
    ) -> Self {
        Self {
            secret: Arc::from(secret.into()),
            access_ttl,
            refresh_ttl,
            revocations,
        }
    }

    /// Lifetime configured for a token type
    pub fn ttl(&self, kind: TokenType) -> Duration {
        match kind {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        }
    }

    /// Issues a signed token of `kind` for `user_id`
    pub fn issue(&self, user_id: i64, kind: TokenType) -> Result<String, TokenError> {
        let claims = Claims::new(user_id, kind, self.ttl(kind));
        create_token(&claims, &self.secret)
    }

    /// Issues an access + refresh pair bound to `user_id`
    pub fn issue_pair(&self, user_id: i64) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue(user_id, TokenType::Access)?,
            refresh_token: self.issue(user_id, TokenType::Refresh)?,
        })
    }

    /// Validates an access token and returns its subject
    ///
    /// # Errors
    ///
    /// - `Expired` once the expiry has passed
    /// - `Malformed` for bad signature/structure, or if a refresh token is presented
    /// - `Revoked` if the token identifier has been revoked
    /// - `Unavailable` if the revocation store cannot be queried
    pub async fn validate(&self, token: &str) -> Result<i64, TokenError> {
        self.validate_kind(token, TokenType::Access)
            .await
            .map(|claims| claims.sub)
    }

    /// Validates a token of the expected type and returns its claims
    pub async fn validate_kind(&self, token: &str, kind: TokenType) -> Result<Claims, TokenError> {
        let claims = decode_token(token, &self.secret)?;

        if claims.token_type != kind {
            return Err(TokenError::Malformed(format!(
                "Expected {} token, got {} token",
                kind.as_str(),
                claims.token_type.as_str()
            )));
        }

        let revoked = self
            .revocations
            .is_revoked(claims.jti)
            .await
            .map_err(|e| TokenError::Unavailable(e.to_string()))?;
        if revoked {
            return Err(TokenError::Revoked);
        }

        Ok(claims)
    }

    /// Adds a token identifier to the revocation set (idempotent)
    pub async fn revoke(&self, token_id: Uuid) -> Result<(), TokenError> {
        self.revocations
            .revoke(token_id)
            .await
            .map_err(|e| TokenError::Unavailable(e.to_string()))?;

        tracing::debug!(token_id = %token_id, "Token revoked");
        Ok(())
    }

    /// Validates a presented token, then revokes it
    ///
    /// Returns the revoked token's claims.
    pub async fn revoke_token(&self, token: &str, kind: TokenType) -> Result<Claims, TokenError> {
        let claims = self.validate_kind(token, kind).await?;
        self.revoke(claims.jti).await?;
        Ok(claims)
    }

    /// Exchanges a valid refresh token for a new access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claims = self.validate_kind(refresh_token, TokenType::Refresh).await?;
        self.issue(claims.sub, TokenType::Access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::revocation::InMemoryRevocationStore;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn service() -> TokenService {
        TokenService::new(SECRET, Arc::new(InMemoryRevocationStore::new()))
    }

    #[test]
    fn test_default_ttls() {
        let tokens = service();
        assert_eq!(tokens.ttl(TokenType::Access), Duration::minutes(50));
        assert_eq!(tokens.ttl(TokenType::Refresh), Duration::days(30));
    }

    #[tokio::test]
    async fn test_issue_then_validate_returns_subject() {
        let tokens = service();
        let token = tokens.issue(17, TokenType::Access).unwrap();

        assert_eq!(tokens.validate(&token).await.unwrap(), 17);
    }

    #[tokio::test]
    async fn test_issued_tokens_carry_ttl() {
        let tokens = service();
        let pair = tokens.issue_pair(3).unwrap();

        let access = decode_token(&pair.access_token, SECRET).unwrap();
        let refresh = decode_token(&pair.refresh_token, SECRET).unwrap();

        assert_eq!(access.exp - access.iat, 50 * 60);
        assert_eq!(refresh.exp - refresh.iat, 30 * 24 * 60 * 60);
        assert_ne!(access.jti, refresh.jti);
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let tokens = TokenService::with_ttls(
            SECRET,
            Duration::seconds(-1),
            Duration::days(30),
            Arc::new(InMemoryRevocationStore::new()),
        );
        let token = tokens.issue(5, TokenType::Access).unwrap();

        assert!(matches!(tokens.validate(&token).await, Err(TokenError::Expired)));
    }

    #[tokio::test]
    async fn test_revoked_token_is_rejected() {
        let tokens = service();
        let token = tokens.issue(5, TokenType::Access).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();

        tokens.revoke(claims.jti).await.unwrap();
        tokens.revoke(claims.jti).await.unwrap();

        assert!(matches!(tokens.validate(&token).await, Err(TokenError::Revoked)));
    }

    #[tokio::test]
    async fn test_revocation_is_per_token() {
        let tokens = service();
        let first = tokens.issue(5, TokenType::Access).unwrap();
        let second = tokens.issue(5, TokenType::Access).unwrap();

        tokens.revoke_token(&first, TokenType::Access).await.unwrap();

        assert!(matches!(tokens.validate(&first).await, Err(TokenError::Revoked)));
        assert_eq!(tokens.validate(&second).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_a_bearer_credential() {
        let tokens = service();
        let pair = tokens.issue_pair(8).unwrap();

        assert!(matches!(
            tokens.validate(&pair.refresh_token).await,
            Err(TokenError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_malformed() {
        let tokens = service();
        let other = TokenService::new(
            "a-completely-different-secret-32-bytes!!",
            Arc::new(InMemoryRevocationStore::new()),
        );
        let token = other.issue(1, TokenType::Access).unwrap();

        assert!(matches!(tokens.validate(&token).await, Err(TokenError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_refresh_mints_access_token() {
        let tokens = service();
        let pair = tokens.issue_pair(21).unwrap();

        let access = tokens.refresh(&pair.refresh_token).await.unwrap();
        assert_eq!(tokens.validate(&access).await.unwrap(), 21);
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_and_revoked_tokens() {
        let tokens = service();
        let pair = tokens.issue_pair(21).unwrap();

        assert!(tokens.refresh(&pair.access_token).await.is_err());

        tokens
            .revoke_token(&pair.refresh_token, TokenType::Refresh)
            .await
            .unwrap();
        assert!(matches!(
            tokens.refresh(&pair.refresh_token).await,
            Err(TokenError::Revoked)
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", service());
        assert!(!debug.contains(SECRET));
    }
}
