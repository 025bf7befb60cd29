use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use spingo_checkout::catalog::BikeCatalog;
use spingo_checkout::config::Config;
use spingo_checkout::{app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("spingo_checkout=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let catalog = match (&config.database_url, &config.bikes_fixture) {
        (Some(url), _) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Using Postgres bike catalog");
            BikeCatalog::Postgres(pool)
        }
        (None, Some(path)) => BikeCatalog::from_file(path)?,
        (None, None) => {
            tracing::warn!("No DATABASE_URL or BIKES_FIXTURE set; bike catalog is empty");
            BikeCatalog::fixture(Vec::new())
        }
    };

    let addr = config.socket_addr()?;
    let state = AppState::new(config, catalog);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}
