use dotenvy::dotenv;
use finverno::{
    api::{AppState, router},
    config::{AppConfig, database},
    errors::Result,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the main application configuration
    let app_config = AppConfig::from_env()?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database and ensure the schema exists
    let db = database::create_connection(&app_config.database_url).await?;
    database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 5. Serve the API
    let bind_addr = app_config.bind_addr.clone();
    let app = router(AppState::new(db, app_config));
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, "Listening for HTTP requests.");
    axum::serve(listener, app).await?;

    Ok(())
}
