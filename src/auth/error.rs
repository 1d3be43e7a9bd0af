// Authentication error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::responder;
use crate::config::MessageCatalog;

/// Errors produced by the authentication core and its HTTP adapters
///
/// Variants carrying a `String` hold internal diagnostics. That text is
/// logged but never sent to clients.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or invalid request input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An account with this email is already registered
    #[error("Account already exists")]
    AccountExists,

    /// Unknown email or wrong password (deliberately indistinguishable)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Registry or session store failure, including zero-row anomalies
    /// and stored credentials that fail integrity checks
    #[error("Storage error: {0}")]
    Storage(String),

    /// Token signing failure
    #[error("Token error: {0}")]
    Token(String),

    /// Password hashing failure
    #[error("Internal error: {0}")]
    Internal(String),

    // Bearer authentication errors
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::AccountExists => StatusCode::METHOD_NOT_ALLOWED,
            AuthError::InvalidCredentials => StatusCode::FORBIDDEN,
            AuthError::Storage(_) | AuthError::Token(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                StatusCode::UNAUTHORIZED
            }
        }
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::BadRequest(_) => "BAD_REQUEST",
            AuthError::AccountExists => "ACCOUNT_EXISTS",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Storage(_) => "STORAGE_ERROR",
            AuthError::Token(_) => "TOKEN_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                "UNAUTHORIZED"
            }
        }
    }

    /// Client-safe message for this error, taken from the catalog
    pub fn client_message<'a>(&self, messages: &'a MessageCatalog) -> &'a str {
        match self {
            AuthError::BadRequest(_) => &messages.bad_request,
            AuthError::AccountExists => &messages.account_exists,
            AuthError::InvalidCredentials => &messages.invalid_credentials,
            AuthError::Storage(_) | AuthError::Token(_) | AuthError::Internal(_) => {
                &messages.internal_error
            }
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::ExpiredToken => {
                &messages.unauthorized
            }
        }
    }

    /// Emit the internal diagnostics for this error at a level matching its severity
    pub fn log(&self) {
        match self {
            AuthError::Storage(msg) => error!("Storage error in auth: {}", msg),
            AuthError::Token(msg) => error!("Token signing error: {}", msg),
            AuthError::Internal(msg) => error!("Internal auth error: {}", msg),
            AuthError::InvalidCredentials => warn!("Rejected login with invalid credentials"),
            AuthError::AccountExists => warn!("Registration attempted for an existing account"),
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::ExpiredToken => warn!("Expired token attempt"),
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::BadRequest(msg) => debug!("Bad request: {}", msg),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        responder::failure(&MessageCatalog::default(), &self)
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::BadRequest(errors.to_string())
    }
}
