use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use goto_core::RedirectStore;
use goto_gateway::cli::{StorageBackendArg, CLI};
use goto_gateway::{App, AppState};
use goto_storage::{InMemoryRedirectStore, SqliteRedirectStore};
use goto_worker::{StoreWorker, WorkerConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    let _telemetry = goto_telemetry::init(config.telemetry_config())
        .context("failed to initialize telemetry")?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        database_path = %config.database_path.display(),
        queue_capacity = config.queue_capacity,
        request_timeout_ms = config.request_timeout_ms,
        log_format = %config.log_format,
        "starting goto gateway"
    );

    match config.storage {
        StorageBackendArg::Sqlite => {
            let store = SqliteRedirectStore::open(&config.database_path).with_context(|| {
                format!("failed to open {}", config.database_path.display())
            })?;
            run_server(config.listen_addr, store, config.worker_config()).await?;
        }
        StorageBackendArg::InMemory => {
            run_server(
                config.listen_addr,
                InMemoryRedirectStore::new(),
                config.worker_config(),
            )
            .await?;
        }
    }

    info!("goto gateway stopped");
    Ok(())
}

async fn run_server<S: RedirectStore + Send + 'static>(
    listen_addr: SocketAddr,
    store: S,
    worker_config: WorkerConfig,
) -> anyhow::Result<()> {
    let (worker, handle) =
        StoreWorker::new(store, worker_config).context("failed to initialize redirect store")?;
    let worker_thread = worker.spawn().context("failed to spawn store worker")?;

    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;

    let app = App::router(AppState::new(Arc::new(handle)));
    info!(listen_addr = %listener.local_addr()?, "serving http");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    // The router owned the last handle; the worker drains its queues and exits.
    tokio::task::spawn_blocking(move || worker_thread.join())
        .await?
        .map_err(|_| anyhow!("store worker panicked"))?;
    info!("store worker joined");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
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

    info!("shutdown signal received");
}
