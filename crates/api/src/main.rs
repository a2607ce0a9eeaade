use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crewup_api::jobs::{JobScheduler, OfferExpiryJob, PoolMetricsJob, WebhookCleanupJob};
use crewup_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;
    middleware::logging::init_logging(&config.logging);

    info!("Starting CrewUp API v{}", env!("CARGO_PKG_VERSION"));

    // The Prometheus recorder must exist before any metric is touched.
    middleware::init_metrics();

    let pool = persistence::db::create_pool(&config.db_config()).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let mut scheduler = JobScheduler::new();
    scheduler.register(OfferExpiryJob::new(pool.clone()));
    scheduler.register(WebhookCleanupJob::new(pool.clone(), None));
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    scheduler.start();

    let addr = config.socket_addr()?;
    let app = app::create_app(config, pool)?;

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Jobs stop only after the listener has drained its connections.
    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
