// Process configuration
// Loaded once at startup and shared read-only with every handler

use thiserror::Error;

/// Default access token lifetime (15 minutes)
pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 15;

/// Default refresh token lifetime (7 days)
pub const DEFAULT_REFRESH_TOKEN_MINUTES: i64 = 7 * 24 * 60;

/// Longest accepted token lifetime (100 years)
pub const MAX_TOKEN_MINUTES: i64 = 100 * 366 * 24 * 60;

/// Default Argon2 iteration count
pub const DEFAULT_PASSWORD_HASH_COST: u32 = 2;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Token and hashing settings used by the auth core
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_minutes: i64,
    /// Argon2 time cost (iterations)
    pub password_hash_cost: u32,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_minutes: DEFAULT_ACCESS_TOKEN_MINUTES,
            refresh_token_minutes: DEFAULT_REFRESH_TOKEN_MINUTES,
            password_hash_cost: DEFAULT_PASSWORD_HASH_COST,
        }
    }
}

/// Client-facing response messages
///
/// Every outward message, including bearer rejections, is looked up here.
/// The binary serves the defaults; an embedding application rewords them by
/// passing its own catalog to `AppState::new`.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    pub account_created: String,
    pub login_ok: String,
    pub session_refreshed: String,
    pub bad_request: String,
    pub account_exists: String,
    pub invalid_credentials: String,
    pub unauthorized: String,
    pub internal_error: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            account_created: "Account has been created".to_string(),
            login_ok: "OK".to_string(),
            session_refreshed: "Session has been refreshed".to_string(),
            bad_request: "Bad request".to_string(),
            account_exists: "Account with this email already exists".to_string(),
            invalid_credentials: "Invalid email or password".to_string(),
            unauthorized: "Missing or invalid authentication token".to_string(),
            internal_error: "Internal server error".to_string(),
        }
    }
}

/// Where accounts and session records live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres { database_url: String },
    Memory,
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub auth: AuthConfig,
    pub messages: MessageCatalog,
}

impl AppConfig {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let storage = match lookup("STORAGE").as_deref() {
            Some("memory") => StorageBackend::Memory,
            None | Some("postgres") => StorageBackend::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE",
                    reason: format!("unknown backend '{}'", other),
                })
            }
        };

        let access_token_minutes = parse_or(
            &lookup,
            "ACCESS_TOKEN_EXPIRES_MINUTES",
            DEFAULT_ACCESS_TOKEN_MINUTES,
        )?;
        let refresh_token_minutes = parse_or(
            &lookup,
            "REFRESH_TOKEN_EXPIRES_MINUTES",
            DEFAULT_REFRESH_TOKEN_MINUTES,
        )?;
        for (name, minutes) in [
            ("ACCESS_TOKEN_EXPIRES_MINUTES", access_token_minutes),
            ("REFRESH_TOKEN_EXPIRES_MINUTES", refresh_token_minutes),
        ] {
            if !(0..=MAX_TOKEN_MINUTES).contains(&minutes) {
                return Err(ConfigError::Invalid {
                    name,
                    reason: format!("must be between 0 and {}", MAX_TOKEN_MINUTES),
                });
            }
        }

        let password_hash_cost = parse_or(&lookup, "PASSWORD_HASH_COST", DEFAULT_PASSWORD_HASH_COST)?;
        if password_hash_cost == 0 {
            return Err(ConfigError::Invalid {
                name: "PASSWORD_HASH_COST",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            storage,
            auth: AuthConfig {
                jwt_secret,
                access_token_minutes,
                refresh_token_minutes,
                password_hash_cost,
            },
            messages: MessageCatalog::default(),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
