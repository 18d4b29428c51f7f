use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recharge_tracker_backend::{config::Config, create_router, initialize_backend, jobs};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,recharge_tracker_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let app_state = initialize_backend(&config).await?;

    if config.rollover_scheduler {
        jobs::start_daily_rollover_job(
            app_state.rollover_service.clone(),
            Duration::from_secs(config.rollover_poll_secs),
        );
    }

    let app = create_router(app_state, &config);

    let addr = SocketAddr::new(config.bind_addr, config.port);
    info!("Starting server on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
