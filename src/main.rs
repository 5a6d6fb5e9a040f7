use anyhow::{Context, Result};
use estate_tracker::extraction::OpenAiExtractor;
use estate_tracker::feeds::RssFeedSource;
use estate_tracker::pipeline::{ConcurrencyLimiter, Crawler};
use estate_tracker::server::{build_router, AppState};
use estate_tracker::storage::PgEstateStore;
use estate_tracker::Config;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,estate_tracker=debug,sqlx=warn".into()),
        )
        .init();

    info!("🏠 Estate Tracker");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        feeds = config.feed_urls.len(),
        batch_size = config.batch_size,
        max_concurrency = config.max_concurrency,
        policy = %config.error_policy,
        "Configuration loaded"
    );

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations complete");

    let shutdown = CancellationToken::new();

    let feeds = RssFeedSource::new(config.http_timeout)?;
    let extractor = OpenAiExtractor::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        config.http_timeout,
    )?
    .with_base_url(config.openai_base_url.clone());
    let limiter = ConcurrencyLimiter::new(config.max_concurrency, shutdown.child_token());

    let crawler = Crawler::new(
        Arc::new(feeds),
        Arc::new(extractor),
        Arc::new(PgEstateStore::new(pool.clone())),
        limiter,
    )
    .with_batch_size(config.batch_size)
    .with_error_policy(config.error_policy);

    let app = build_router(AppState::new(crawler, config.feed_urls.clone()));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    info!("Server starting on {}", addr);

    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
            info!("Shutdown requested, cancelling pending batches");
            signal.cancel();
        })
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Database pool closed");

    Ok(())
}
