// Authentication module
// Account registration, credential verification and session token rotation

pub mod error;
pub mod handlers;
pub mod memory;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod responder;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, refresh_handler, register_handler};
pub use memory::{InMemoryAccountRegistry, InMemorySessionTokenStore};
pub use middleware::{AuthenticatedUser, RefreshingUser};
pub use models::{
    AccessToken, Account, LoginRequest, RegisterRequest, SessionTokenRecord, TokenPair, UserId,
};
pub use password::{HashError, PasswordService};
pub use repository::{AccountRegistry, PgAccountRegistry, PgSessionTokenStore, SessionTokenStore};
pub use service::AuthService;
pub use token::{Claims, TokenKind, TokenService};
