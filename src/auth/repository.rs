// Account registry and session token store
// Traits the auth service depends on, plus their PostgreSQL implementations

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::auth::{
    error::AuthError,
    models::{Account, SessionTokenRecord, UserId},
};

/// Durable store of accounts keyed by unique email
#[async_trait]
pub trait AccountRegistry: Send + Sync {
    /// All accounts whose email matches exactly
    async fn find_by_email(&self, email: &str) -> Result<Vec<Account>, AuthError>;

    /// Insert an account, returning the stored row or `None` when nothing was inserted
    ///
    /// A uniqueness violation on email surfaces as `AuthError::AccountExists`.
    async fn insert(&self, email: &str, password_hash: &str) -> Result<Option<Account>, AuthError>;
}

/// Durable store of refresh token records, one per user
#[async_trait]
pub trait SessionTokenStore: Send + Sync {
    /// Create the record for a user. Returns rows inserted.
    async fn insert(&self, record: &SessionTokenRecord) -> Result<u64, AuthError>;

    /// Replace the token of an existing record keyed by user id. Returns rows affected.
    async fn update(&self, record: &SessionTokenRecord) -> Result<u64, AuthError>;

    /// Whether `refresh_token` is the live token recorded for `user_id`
    async fn matches(&self, user_id: UserId, refresh_token: &str) -> Result<bool, AuthError>;
}

/// PostgreSQL-backed account registry
#[derive(Clone)]
pub struct PgAccountRegistry {
    pool: PgPool,
}

impl PgAccountRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRegistry for PgAccountRegistry {
    async fn find_by_email(&self, email: &str) -> Result<Vec<Account>, AuthError> {
        let accounts = sqlx::query_as::<_, Account>(
            "SELECT id, email, password_hash, created_at FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<Option<Account>, AuthError> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (email, password_hash) VALUES ($1, $2) \
             RETURNING id, email, password_hash, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::AccountExists;
                }
            }
            AuthError::Storage(e.to_string())
        })
    }
}

/// PostgreSQL-backed session token store
///
/// Tokens are stored as SHA-256 digests so a database leak does not hand
/// out live refresh tokens.
#[derive(Clone)]
pub struct PgSessionTokenStore {
    pool: PgPool,
}

impl PgSessionTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Hash a token using SHA-256
    pub(crate) fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[async_trait]
impl SessionTokenStore for PgSessionTokenStore {
    async fn insert(&self, record: &SessionTokenRecord) -> Result<u64, AuthError> {
        let result = sqlx::query(
            "INSERT INTO session_tokens (user_id, token_hash) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(record.user_id)
        .bind(Self::hash_token(&record.refresh_token))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn update(&self, record: &SessionTokenRecord) -> Result<u64, AuthError> {
        let result = sqlx::query(
            "UPDATE session_tokens SET token_hash = $2, updated_at = NOW() WHERE user_id = $1",
        )
        .bind(record.user_id)
        .bind(Self::hash_token(&record.refresh_token))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn matches(&self, user_id: UserId, refresh_token: &str) -> Result<bool, AuthError> {
        let found = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM session_tokens WHERE user_id = $1 AND token_hash = $2)",
        )
        .bind(user_id)
        .bind(Self::hash_token(refresh_token))
        .fetch_one(&self.pool)
        .await?;

        Ok(found)
    }
}
