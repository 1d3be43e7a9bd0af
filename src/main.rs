use std::sync::Arc;

use session_auth::{
    auth::{
        AccountRegistry, InMemoryAccountRegistry, InMemorySessionTokenStore, PgAccountRegistry,
        PgSessionTokenStore, SessionTokenStore,
    },
    create_router, db, AppConfig, AppState, StorageBackend,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Session Auth API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");

    let (accounts, sessions) = open_storage(&config.storage).await;

    let state = AppState::new(&config.auth, config.messages.clone(), accounts, sessions)
        .expect("Failed to initialise auth service");
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Session Auth API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}

async fn open_storage(
    storage: &StorageBackend,
) -> (Arc<dyn AccountRegistry>, Arc<dyn SessionTokenStore>) {
    match storage {
        StorageBackend::Postgres { database_url } => {
            tracing::info!("Connecting to database...");
            let pool = db::create_pool(database_url)
                .await
                .expect("Failed to create database pool");
            db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");

            let accounts: Arc<dyn AccountRegistry> = Arc::new(PgAccountRegistry::new(pool.clone()));
            let sessions: Arc<dyn SessionTokenStore> = Arc::new(PgSessionTokenStore::new(pool));
            (accounts, sessions)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; accounts will not survive a restart");
            let accounts: Arc<dyn AccountRegistry> = Arc::new(InMemoryAccountRegistry::new());
            let sessions: Arc<dyn SessionTokenStore> = Arc::new(InMemorySessionTokenStore::new());
            (accounts, sessions)
        }
    }
}
