use anyhow::Context;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub(crate) mod config;
pub(crate) mod debounce;
pub(crate) mod errors;
pub(crate) mod live_search;
pub(crate) mod models;
pub(crate) mod practice;
mod router;
mod routes;
pub(crate) mod search;
pub(crate) mod seed;
pub(crate) mod shuffle;
pub(crate) mod stats;
pub(crate) mod store;
mod templates;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("signcards=info,sqlx=warn")),
        )
        .init();

    let config = config::AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(config.database_url.expose_secret())
        .await
        .context("Failed to connect to the card store")?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let addr = config.bind_addr.clone();
    let router = router::init_router(pool, config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("🚀 Listening on {addr}");
    axum::serve(listener, router).await.context("Server error")?;
    Ok(())
}
