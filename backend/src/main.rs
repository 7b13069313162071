use std::{net::SocketAddr, str::FromStr, sync::Arc};

use backend::{config::Config, models::AppState, system};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("info".to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::from_str(&log_level)?)
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Log level: {log_level}");

    let config = Config::from_env()?;
    info!("DB url: {}", config.database_url);
    info!("Port: {}", config.port);

    let pool = system::connect(&config.database_url).await?;
    system::init_db(&pool, config.admin_bootstrap().as_ref()).await?;

    let state = Arc::new(AppState {
        pool: pool.clone(),
        tokens: config.token_settings()?,
        bcrypt_cost: config.bcrypt_cost,
    });
    let app = backend::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Storefront backend listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Closing database connections");
    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
