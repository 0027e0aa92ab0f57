/// Signed token claims and HS256 encoding
///
/// Tokens carry the user id as subject, a unique token identifier (`jti`) used
/// for revocation, issue/expiry timestamps, and the token type. They are signed
/// with HMAC-SHA256 so any modification invalidates the signature.
///
/// # Token Types
///
/// - **Access Token**: Short-lived (50 minutes), presented on every protected request
/// - **Refresh Token**: Long-lived (30 days), only used to mint new access tokens
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use tasktrack_shared::auth::jwt::{create_token, decode_token, Claims, TokenType};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(7, TokenType::Access, Duration::minutes(50));
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let decoded = decode_token(&token, "your-secret-key")?;
/// assert_eq!(decoded.sub, 7);
/// assert_eq!(decoded.jti, claims.jti);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer embedded in every token
pub const ISSUER: &str = "tasktrack";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to sign a token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature, structure, issuer, or token type is invalid
    #[error("Invalid token: {0}")]
    Malformed(String),

    /// Token identifier is in the revocation set
    #[error("Token has been revoked")]
    Revoked,

    /// Revocation store could not be reached
    #[error("Token store unavailable: {0}")]
    Unavailable(String),
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token
    Access,

    /// Refresh token
    Refresh,
}

impl TokenType {
    /// Gets token type as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `jti`: Unique token identifier
/// - `iss`: Issuer (always "tasktrack")
/// - `iat`, `nbf`, `exp`: Unix timestamps
///
/// # Custom Claims
///
/// - `token_type`: Access or refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: i64,

    /// Token identifier, unique per issued token
    pub jti: Uuid,

    /// Issuer - Always "tasktrack"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token type (custom claim)
    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims for `user_id` that expire `expires_in` from now
    ///
    /// A fresh `jti` is generated for every call. A negative `expires_in`
    /// yields claims that are already expired.
    pub fn new(user_id: i64, token_type: TokenType, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            jti: Uuid::new_v4(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expiration.timestamp(),
            token_type,
        }
    }

    /// Checks if the expiry has passed
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Signs claims with HS256
///
/// # Errors
///
/// Returns `TokenError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| TokenError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies signature, issuer, and expiry, then returns the claims
///
/// Expiry is checked with zero leeway. This does not consult the revocation
/// set and does not check the token type; see
/// [`TokenService`](super::token_service::TokenService) for the full check.
///
/// # Errors
///
/// - `TokenError::Expired` if the expiry has passed
/// - `TokenError::Malformed` for any other decoding or signature failure
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(e.to_string()),
        })
}
