//! CollaboraNexio co-editing coordinator server.
//!
//! Wires configuration, database, services, and the scheduler together
//! and serves the HTTP API until a shutdown signal arrives.

use std::net::SocketAddr;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use coedit_api::{AppState, build_router};
use coedit_core::config::AppConfig;
use coedit_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("NEXIO_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting co-editing coordinator v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(&config.storage.upload_root)
        .await
        .map_err(|e| {
            AppError::storage(format!(
                "Failed to create upload root '{}': {e}",
                config.storage.upload_root
            ))
        })?;

    let db_pool = coedit_database::connection::create_pool(&config.database).await?;
    coedit_database::migration::run_migrations(&db_pool).await?;

    let state = AppState::new(config.clone(), db_pool);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let scheduler_handle = if config.worker.enabled {
        let mut scheduler =
            coedit_worker::CronScheduler::new(&config.worker, state.sessions.clone()).await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;

        Some(tokio::spawn(async move {
            let _ = shutdown_rx.changed().await;
            if let Err(e) = scheduler.shutdown().await {
                tracing::error!("Scheduler shutdown error: {e}");
            }
        }))
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Co-editing coordinator listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    })
    .await
    .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = scheduler_handle {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(10), handle).await;
    }

    tracing::info!("Co-editing coordinator shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
