//! Session authentication service.
//!
//! Registers accounts with unique emails, verifies Argon2id password hashes
//! and issues HS256 access and refresh tokens, rotating the single stored
//! refresh token per account on every session refresh.

pub mod app;
pub mod auth;
pub mod config;
pub mod db;

pub use app::{create_router, AppState};
pub use config::{AppConfig, AuthConfig, MessageCatalog, StorageBackend};

#[cfg(test)]
mod tests;
