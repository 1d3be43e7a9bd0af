// Application wiring: shared state, router and OpenAPI document

use axum::{extract::FromRef, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{
    self, AccountRegistry, AuthError, AuthService, PasswordService, SessionTokenStore,
    TokenService,
};
use crate::config::{AuthConfig, MessageCatalog};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::refresh_handler,
    ),
    components(
        schemas(auth::RegisterRequest, auth::LoginRequest, auth::TokenPair, auth::AccessToken)
    ),
    modifiers(&BearerSecurity),
    tags(
        (name = "auth", description = "Account registration, login and session refresh")
    ),
    info(
        title = "Session Auth API",
        version = "1.0.0",
        description = "Issues and renews session tokens for user accounts"
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
    pub sessions: Arc<dyn SessionTokenStore>,
    pub messages: Arc<MessageCatalog>,
}

impl AppState {
    /// Assemble the state from configuration and storage collaborators
    pub fn new(
        config: &AuthConfig,
        messages: MessageCatalog,
        accounts: Arc<dyn AccountRegistry>,
        sessions: Arc<dyn SessionTokenStore>,
    ) -> Result<Self, AuthError> {
        let password_service = PasswordService::new(config.password_hash_cost)?;
        let token_service = TokenService::new(config);
        let auth = AuthService::new(
            accounts,
            sessions.clone(),
            password_service,
            token_service.clone(),
        );

        Ok(Self {
            auth: Arc::new(auth),
            tokens: Arc::new(token_service),
            sessions,
            messages: Arc::new(messages),
        })
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<AppState> for Arc<dyn SessionTokenStore> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

/// Creates and configures the application router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/refresh", post(auth::refresh_handler))
        .layer(cors)
        .with_state(state)
}
