use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use tokio::signal;
use tracing::info;

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod query;
mod repository;
mod routes;
mod service;
mod types;
mod validation;

#[cfg(test)]
mod testing;

use crate::config::{configure_logger, Config};
use crate::repository::PgGameRepository;
use crate::routes::create_routes;
use crate::service::CatalogService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let config = Config::from_env()?;
    configure_logger(&config.logger);
    info!("starting catalog service");

    let pool = db::connect(&config.database).await?;
    db::run_migrations(&pool).await?;
    db::seed_reference_data(&pool).await?;

    let repo = Arc::new(PgGameRepository::new(pool));
    let service = CatalogService::new(repo);
    let app = create_routes(service, config.server.read_timeout, config.server.write_timeout);

    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    info!(%http_addr, "HTTP API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
