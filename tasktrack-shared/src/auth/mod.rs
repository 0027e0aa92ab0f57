/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Signed claim encoding/decoding (HS256)
/// - [`revocation`]: Revocation stores for logged-out tokens
/// - [`token_service`]: Access/refresh token lifecycle
/// - [`middleware`]: Bearer-token gate for protected routes
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasktrack_shared::auth::password::{hash_password, verify_password};
/// use tasktrack_shared::auth::revocation::InMemoryRevocationStore;
/// use tasktrack_shared::auth::token_service::TokenService;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash));
///
/// let tokens = TokenService::new(
///     "a-secret-that-is-at-least-32-bytes-long",
///     Arc::new(InMemoryRevocationStore::new()),
/// );
/// let pair = tokens.issue_pair(42)?;
/// assert_eq!(tokens.validate(&pair.access_token).await?, 42);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod revocation;
pub mod token_service;
