/// Configuration management for the API server
///
/// Configuration is read from environment variables; a `.env` file is loaded
/// first if present.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `DATABASE_ACQUIRE_TIMEOUT_SECS`: Pool acquire bound (default: 5)
/// - `DATABASE_STATEMENT_TIMEOUT_MS`: Per-statement bound (default: 5000)
/// - `JWT_SECRET`: Secret key for token signing (required, 32+ characters)
/// - `ACCESS_TOKEN_TTL_MINUTES`: Access token lifetime (default: 50)
/// - `REFRESH_TOKEN_TTL_DAYS`: Refresh token lifetime (default: 30)
/// - `REVOCATION_BACKEND`: `memory` or `postgres` (default: memory)
/// - `UPLOAD_DIR`: Where uploaded profile pictures are written (default: uploads)
/// - `RUST_LOG`: Log filter

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tasktrack_shared::auth::token_service::{DEFAULT_ACCESS_TTL_MINUTES, DEFAULT_REFRESH_TTL_DAYS};

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token configuration
    pub jwt: JwtConfig,

    /// Upload storage configuration
    pub uploads: UploadConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection
    pub acquire_timeout_seconds: u64,

    /// Milliseconds before the server cancels a statement
    pub statement_timeout_ms: u64,
}

/// Where revoked token identifiers are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationBackend {
    /// Process-local set, lost on restart
    Memory,

    /// `revoked_tokens` table, shared across instances
    Postgres,
}

impl FromStr for RevocationBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(RevocationBackend::Memory),
            "postgres" => Ok(RevocationBackend::Postgres),
            other => anyhow::bail!("Unknown REVOCATION_BACKEND: {}", other),
        }
    }
}

/// Token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for HS256 signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Access token lifetime in minutes
    pub access_ttl_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_ttl_days: i64,

    /// Revocation store backend
    pub revocation_backend: RevocationBackend,
}

/// Upload storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory for uploaded files, also the prefix of stored paths
    pub dir: String,
}

/// Longest accepted access token lifetime (one year)
const MAX_ACCESS_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Longest accepted refresh token lifetime (ten years)
const MAX_REFRESH_TTL_DAYS: i64 = 3650;

/// Rejects token lifetimes outside `1..=max`
fn check_ttl(key: &str, value: i64, max: i64) -> anyhow::Result<i64> {
    if !(1..=max).contains(&value) {
        anyhow::bail!("{} must be between 1 and {}, got {}", key, max, value);
    }
    Ok(value)
}

fn env_or<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a value can't be
    /// parsed, or `JWT_SECRET` is shorter than 32 characters
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env_or::<u16>("API_PORT", "8080")?;
        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let revocation_backend = env::var("REVOCATION_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .parse::<RevocationBackend>()?;

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseConfig {
                url,
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", "10")?,
                acquire_timeout_seconds: env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", "5")?,
                statement_timeout_ms: env_or("DATABASE_STATEMENT_TIMEOUT_MS", "5000")?,
            },
            jwt: JwtConfig {
                secret,
                access_ttl_minutes: check_ttl(
                    "ACCESS_TOKEN_TTL_MINUTES",
                    env_or("ACCESS_TOKEN_TTL_MINUTES", &DEFAULT_ACCESS_TTL_MINUTES.to_string())?,
                    MAX_ACCESS_TTL_MINUTES,
                )?,
                refresh_ttl_days: check_ttl(
                    "REFRESH_TOKEN_TTL_DAYS",
                    env_or("REFRESH_TOKEN_TTL_DAYS", &DEFAULT_REFRESH_TTL_DAYS.to_string())?,
                    MAX_REFRESH_TTL_DAYS,
                )?,
                revocation_backend,
            },
            uploads: UploadConfig {
                dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Pool settings for the shared database layer
    pub fn pool_config(&self) -> tasktrack_shared::db::pool::DatabaseConfig {
        tasktrack_shared::db::pool::DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            acquire_timeout_seconds: self.database.acquire_timeout_seconds,
            statement_timeout_ms: self.database.statement_timeout_ms,
            ..Default::default()
        }
    }
}
