//! LifeMon API server

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use lifemon::api::{self, AppState};
use lifemon::build_info;
use lifemon::config::Settings;
use lifemon::db::{self, Database};
use lifemon::outbound::{OpenFoodFactsClient, OpenRouterClient};

const DEFAULT_LOG_FILTER: &str = "lifemon=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    build_info::log_startup_banner();

    let settings = Settings::load()?;

    let db_path = settings.database_path();
    tracing::info!("Database path: {}", db_path.display());

    // Ensure data directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::create_dir_all(settings.uploads.dir.join("avatars"))?;

    let database = Database::new(&db_path)?;
    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        tracing::info!("Database schema version: {}", version);
        Ok(())
    })?;

    let food_facts = OpenFoodFactsClient::new(settings.integrations.food_facts_url.clone())?;
    let chat = OpenRouterClient::new(
        settings.integrations.openrouter_url.clone(),
        settings.integrations.openrouter_api_key.clone(),
    )?;
    if settings.integrations.openrouter_api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY not set; /api/chat will answer 500");
    }

    let address = settings.bind_address();
    let state = AppState::new(settings, database, Arc::new(food_facts), Arc::new(chat));
    let app = api::router(state);

    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Listening on http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
