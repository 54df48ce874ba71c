use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory uploaded post images are written to and served from.
    pub media_root: PathBuf,
    /// How long a rendered index page stays cached (default: `20`).
    pub index_cache_ttl_secs: u64,
    /// Minimum password length accepted at signup (default: `8`).
    pub password_min_length: usize,
    /// Mark the session cookie `Secure` (default: `false`).
    pub session_cookie_secure: bool,
    /// Existing accounts granted staff access at startup, parsed from the
    /// comma-separated `STAFF_USERNAMES` env var (default: none).
    pub staff_usernames: Vec<String>,
    /// JWT session token configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default    |
    /// |-------------------------|------------|
    /// | `HOST`                  | `0.0.0.0`  |
    /// | `PORT`                  | `8000`     |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`       |
    /// | `MEDIA_ROOT`            | `media`    |
    /// | `INDEX_CACHE_TTL_SECS`  | `20`       |
    /// | `PASSWORD_MIN_LENGTH`   | `8`        |
    /// | `SESSION_COOKIE_SECURE` | `false`    |
    /// | `STAFF_USERNAMES`       | (empty)    |
    ///
    /// # Panics
    ///
    /// Panics on a value that does not parse; misconfiguration should fail fast.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let media_root = PathBuf::from(std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".into()));

        let index_cache_ttl_secs: u64 = std::env::var("INDEX_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("INDEX_CACHE_TTL_SECS must be a valid u64");

        let password_min_length: usize = std::env::var("PASSWORD_MIN_LENGTH")
            .unwrap_or_else(|_| "8".into())
            .parse()
            .expect("PASSWORD_MIN_LENGTH must be a valid usize");

        let session_cookie_secure: bool = std::env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SESSION_COOKIE_SECURE must be true or false");

        let staff_usernames: Vec<String> = std::env::var("STAFF_USERNAMES")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            request_timeout_secs,
            media_root,
            index_cache_ttl_secs,
            password_min_length,
            session_cookie_secure,
            staff_usernames,
            jwt,
        }
    }
}
