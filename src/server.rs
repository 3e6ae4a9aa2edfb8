//! HTTP server initialization and runtime setup.
//!
//! Handles logging setup, storage backend selection and the Axum server lifecycle.

use crate::config::{Config, StorageType};
use crate::domain::repositories::Storage;
use crate::infrastructure::persistence::{FileStorage, PgStorage};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` drives the filter (falling back to `log_level`); `log_format`
/// selects human-readable or JSON lines.
pub fn init_tracing(log_level: &str, log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Opens the storage backend selected by the configuration.
///
/// For PostgreSQL this connects the pool and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable, migrations fail, or the
/// snapshot file cannot be read.
pub async fn build_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    match config.storage_type {
        StorageType::Db => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required when STORAGE_TYPE=db")?;

            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to migrate")?;
            tracing::info!("Migrations applied");

            Ok(Arc::new(PgStorage::new(Arc::new(pool))))
        }
        StorageType::File => {
            let storage = FileStorage::open(&config.file_storage_path)
                .await
                .with_context(|| format!("Failed to open {}", config.file_storage_path))?;
            Ok(Arc::new(storage))
        }
    }
}

/// Runs the HTTP server with the given configuration until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if:
/// - Storage initialization fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let storage = build_storage(&config).await?;

    let state = AppState::new(storage.clone());
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    storage
        .save()
        .await
        .context("Failed to flush storage on shutdown")?;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
