// Password hashing and verification service

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use thiserror::Error;

use crate::auth::error::AuthError;

/// Verification failures
///
/// `Mismatch` is an ordinary wrong password. `Malformed` means the stored
/// value was not produced by this hasher and points at a data problem.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HashError {
    #[error("password does not match")]
    Mismatch,

    #[error("stored password hash is malformed: {0}")]
    Malformed(String),
}

/// Password service for hashing and verification using Argon2id
#[derive(Debug, Clone)]
pub struct PasswordService {
    params: Params,
}

impl PasswordService {
    /// Create a PasswordService with the given Argon2 time cost
    pub fn new(work_factor: u32) -> Result<Self, AuthError> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            work_factor,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| AuthError::Internal(format!("invalid Argon2 parameters: {}", e)))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt, returning a PHC string
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {}", e)))
    }

    /// Verify a password against a stored hash
    ///
    /// The comparison runs in constant time inside the Argon2 verifier.
    pub fn verify_password(&self, hash: &str, password: &str) -> Result<(), HashError> {
        let parsed = PasswordHash::new(hash).map_err(|e| HashError::Malformed(e.to_string()))?;

        if parsed.algorithm != argon2::ARGON2ID_IDENT {
            return Err(HashError::Malformed(format!(
                "unexpected algorithm '{}'",
                parsed.algorithm
            )));
        }

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(password_hash::Error::Password) => Err(HashError::Mismatch),
            Err(e) => Err(HashError::Malformed(e.to_string())),
        }
    }
}
