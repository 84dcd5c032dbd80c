//! HTTP server initialization and runtime setup.
//!
//! Handles database readiness, migrations, cache setup, the export worker
//! and the Axum server lifecycle.

use crate::api::middleware::metrics::install_recorder;
use crate::config::Config;
use crate::domain::export_worker::run_export_worker;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::database::{connect_with_retry, run_migrations};
use crate::routes::app_router;
use crate::state::{AppState, Repositories, StateOptions};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Connects Redis, falling back to [`NullCache`] when it is not configured
/// or unreachable.
pub async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to connect to Redis, using NullCache");
            Arc::new(NullCache::new())
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Prometheus recorder
/// - PostgreSQL pool, retried until the database accepts queries
/// - Migrations
/// - Redis cache (or NullCache fallback)
/// - Background export worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The database stays unreachable for `DB_CONNECT_RETRIES` attempts
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let metrics = install_recorder().context("Failed to install Prometheus recorder")?;

    let pool = connect_with_retry(&config).await?;
    run_migrations(&pool).await?;

    let cache = build_cache(&config).await;
    let repos = Repositories::postgres(Arc::new(pool));

    let (export_tx, export_rx) = mpsc::channel(config.export_queue_capacity);
    let worker = tokio::spawn(run_export_worker(
        export_rx,
        repos.patents.clone(),
        config.export_worker_concurrency,
    ));
    tracing::info!(
        capacity = config.export_queue_capacity,
        concurrency = config.export_worker_concurrency,
        "Export worker started"
    );

    let export_timeout = Duration::from_secs(config.export_timeout_seconds);
    let state = AppState::new(
        repos,
        cache,
        export_tx,
        metrics,
        StateOptions {
            cache_ttl_seconds: config.cache_ttl_seconds,
            export_timeout,
        },
    );

    let app = app_router(state, config.upload_max_bytes);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // the router held the last queue sender; the worker drains and exits
    if tokio::time::timeout(export_timeout, worker).await.is_err() {
        tracing::warn!("Export worker did not stop in time");
    }

    tracing::info!("Server stopped");
    Ok(())
}
