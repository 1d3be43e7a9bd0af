// Authentication service - business logic layer

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::auth::{
    error::AuthError,
    models::{AccessToken, LoginRequest, RegisterRequest, SessionTokenRecord, TokenPair, UserId},
    password::{HashError, PasswordService},
    repository::{AccountRegistry, SessionTokenStore},
    token::TokenService,
};

/// Authentication service coordinating registration, login and session refresh
///
/// Holds no mutable state; all persistence goes through the injected stores.
pub struct AuthService {
    accounts: Arc<dyn AccountRegistry>,
    sessions: Arc<dyn SessionTokenStore>,
    password_service: PasswordService,
    token_service: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        accounts: Arc<dyn AccountRegistry>,
        sessions: Arc<dyn SessionTokenStore>,
        password_service: PasswordService,
        token_service: TokenService,
    ) -> Self {
        Self {
            accounts,
            sessions,
            password_service,
            token_service,
        }
    }

    /// Register a new account and open its session
    ///
    /// This method:
    /// 1. Rejects emails that are already registered
    /// 2. Hashes the password, dropping the plaintext
    /// 3. Inserts the account
    /// 4. Issues an access and a refresh token
    /// 5. Stores the refresh token as the account's session record
    ///
    /// A failure in steps 4 or 5 leaves the account without a session record.
    /// That state is logged with `incomplete_registration = true` and is not
    /// rolled back.
    pub async fn register(&self, request: RegisterRequest) -> Result<TokenPair, AuthError> {
        let RegisterRequest { email, password } = request;

        // 1. Uniqueness check
        if !self.accounts.find_by_email(&email).await?.is_empty() {
            return Err(AuthError::AccountExists);
        }

        // 2. Hash; the plaintext does not outlive this statement
        let password_hash = self.password_service.hash_password(&password)?;
        drop(password);

        // 3. Insert
        let account = self
            .accounts
            .insert(&email, &password_hash)
            .await?
            .ok_or_else(|| AuthError::Storage("account insert affected no rows".to_string()))?;
        debug!("Inserted account {}", account.id);

        // 4. Tokens
        let tokens = self
            .issue_pair(account.id)
            .map_err(|e| incomplete_registration(account.id, e))?;

        // 5. Session record
        let record = SessionTokenRecord {
            user_id: account.id,
            refresh_token: tokens.refresh_token.clone(),
        };
        let inserted = self
            .sessions
            .insert(&record)
            .await
            .map_err(|e| incomplete_registration(account.id, e))?;
        if inserted == 0 {
            return Err(incomplete_registration(
                account.id,
                AuthError::Storage("session record insert affected no rows".to_string()),
            ));
        }

        info!("Registered account {}", account.id);
        Ok(tokens)
    }

    /// Verify credentials and issue an access token for `subject`
    ///
    /// `subject` is the identity established by the caller's bearer token,
    /// not the account looked up by email. The two are not reconciled here;
    /// a disagreement is logged.
    pub async fn login(
        &self,
        request: LoginRequest,
        subject: UserId,
    ) -> Result<AccessToken, AuthError> {
        let LoginRequest { email, password } = request;

        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .into_iter()
            .next()
            .ok_or(AuthError::InvalidCredentials)?;

        match self
            .password_service
            .verify_password(&account.password_hash, &password)
        {
            Ok(()) => {}
            Err(HashError::Mismatch) => return Err(AuthError::InvalidCredentials),
            Err(HashError::Malformed(reason)) => {
                return Err(AuthError::Storage(format!(
                    "stored hash for account {} failed integrity check: {}",
                    account.id, reason
                )))
            }
        }

        if account.id != subject {
            warn!(
                account_id = account.id,
                subject, "Login credentials belong to a different account than the token subject"
            );
        }

        let access_token = self.token_service.issue_access(subject)?;

        info!("Login succeeded for subject {}", subject);
        Ok(AccessToken { access_token })
    }

    /// Issue a fresh token pair and rotate the stored refresh token
    pub async fn refresh_session(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        let tokens = self.issue_pair(user_id)?;

        let record = SessionTokenRecord {
            user_id,
            refresh_token: tokens.refresh_token.clone(),
        };
        let updated = self.sessions.update(&record).await?;
        if updated == 0 {
            return Err(AuthError::Storage(format!(
                "no session record to rotate for user {}",
                user_id
            )));
        }

        info!("Rotated refresh token for user {}", user_id);
        Ok(tokens)
    }

    fn issue_pair(&self, user_id: UserId) -> Result<TokenPair, AuthError> {
        let access_token = self.token_service.issue_access(user_id)?;
        let refresh_token = self.token_service.issue_refresh(user_id)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

fn incomplete_registration(account_id: UserId, err: AuthError) -> AuthError {
    error!(
        account_id,
        incomplete_registration = true,
        "Account persisted without a session record: {}",
        err
    );
    err
}
