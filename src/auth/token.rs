// JWT token issuance and verification service

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{error::AuthError, models::UserId};
use crate::config::AuthConfig;

/// The only algorithm this service signs with or accepts
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Which credential a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
    pub jti: String,
    pub typ: TokenKind,
}

/// Token service for JWT operations
#[derive(Debug, Clone)]
pub struct TokenService {
    secret: String,
    access_token_minutes: i64,
    refresh_token_minutes: i64,
}

impl TokenService {
    /// Create a TokenService from the auth configuration
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            access_token_minutes: config.access_token_minutes,
            refresh_token_minutes: config.refresh_token_minutes,
        }
    }

    /// Issue a signed token for `user_id` that expires `lifetime_minutes` from now
    pub fn issue(
        &self,
        user_id: UserId,
        kind: TokenKind,
        lifetime_minutes: i64,
    ) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::Token("signing secret is not configured".to_string()));
        }

        let now = Utc::now().timestamp();
        let exp = lifetime_minutes
            .checked_mul(60)
            .and_then(|seconds| now.checked_add(seconds))
            .ok_or_else(|| {
                AuthError::Token(format!(
                    "token lifetime of {} minutes overflows the expiry timestamp",
                    lifetime_minutes
                ))
            })?;

        let claims = Claims {
            sub: user_id,
            iat: now,
            exp,
            jti: Uuid::new_v4().to_string(),
            typ: kind,
        };

        encode(
            &Header::new(SIGNING_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Token(e.to_string()))
    }

    /// Issue a short-lived access token
    pub fn issue_access(&self, user_id: UserId) -> Result<String, AuthError> {
        self.issue(user_id, TokenKind::Access, self.access_token_minutes)
    }

    /// Issue a long-lived refresh token
    pub fn issue_refresh(&self, user_id: UserId) -> Result<String, AuthError> {
        self.issue(user_id, TokenKind::Refresh, self.refresh_token_minutes)
    }

    /// Verify a token's signature and expiry and return its claims
    ///
    /// Only HS256 is accepted regardless of the token header. A token is
    /// expired once the current second reaches `exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }

    /// Verify a token and require it to be of `kind`
    pub fn verify_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, AuthError> {
        let claims = self.verify(token)?;
        if claims.typ != kind {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}
