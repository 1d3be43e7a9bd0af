// Bearer authentication for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::{
    error::AuthError,
    models::UserId,
    repository::SessionTokenStore,
    token::{TokenKind, TokenService},
};

/// Identity established from a verified access token in `Authorization: Bearer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Identity established from the live refresh token of a session
///
/// The bearer token must be a refresh token and must equal the one recorded
/// in the session store, so a rotated-out token no longer authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshingUser {
    pub user_id: UserId,
}

/// Pull the raw token out of the `Authorization` header
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!(
            "Authorization header missing 'Bearer ' prefix for endpoint: {}",
            parts.uri.path()
        );
        AuthError::InvalidToken
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let token_service = Arc::<TokenService>::from_ref(state);
        let claims = token_service.verify_kind(token, TokenKind::Access)?;

        debug!("Authenticated user_id={} for endpoint={}", claims.sub, parts.uri.path());
        Ok(AuthenticatedUser { user_id: claims.sub })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RefreshingUser
where
    Arc<TokenService>: FromRef<S>,
    Arc<dyn SessionTokenStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let token_service = Arc::<TokenService>::from_ref(state);
        let claims = token_service.verify_kind(token, TokenKind::Refresh)?;

        let sessions = Arc::<dyn SessionTokenStore>::from_ref(state);
        if !sessions.matches(claims.sub, token).await? {
            warn!(user_id = claims.sub, "Refresh token is not the live session token");
            return Err(AuthError::InvalidToken);
        }

        debug!("Refresh authorised for user_id={}", claims.sub);
        Ok(RefreshingUser { user_id: claims.sub })
    }
}
