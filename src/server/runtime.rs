//! Service Startup
//!
//! Brings the pieces up in order: load the index, launch the indexer as a detached
//! task, start the snapshot loop, then serve HTTP until shutdown and save the
//! index one last time.

use super::routes::build_router;
use crate::config::ServerConfig;
use crate::indexer::extract::FileNameExtractor;
use crate::indexer::scanner::{Indexer, IndexerOptions};
use crate::search::engine::{QueryResolver, ResolverConfig};
use crate::storage::memory::KeywordIndex;
use crate::storage::store::IndexStore;

use anyhow::{Context, Result};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A started service that has not begun accepting connections yet.
pub struct App {
    pub index: Arc<KeywordIndex>,
    pub router: Router,
    pub indexer: JoinHandle<()>,
    pub snapshots: JoinHandle<()>,
}

/// Opens the index and spawns the background tasks. Must run inside a Tokio runtime.
pub fn start(config: &ServerConfig) -> Result<App> {
    let root = config.root_dir();
    let root = std::fs::canonicalize(&root).unwrap_or(root);
    let db_file = config.db_file();

    let index = KeywordIndex::open(&db_file)
        .with_context(|| format!("Failed to open index {}", db_file.display()))?;
    let store: Arc<dyn IndexStore> = index.clone();

    let indexer = Indexer::new(
        root,
        store.clone(),
        Arc::new(FileNameExtractor),
        IndexerOptions {
            rescan_interval: config.rescan_interval(),
        },
    )
    .start();

    let snapshots = index.clone().spawn_snapshot_loop(config.snapshot_interval());

    let resolver = QueryResolver::new(
        store,
        ResolverConfig {
            case_insensitive: true,
            read_timeout: config.read_timeout(),
        },
    );

    Ok(App {
        index,
        router: build_router(resolver, &config.assets),
        indexer,
        snapshots,
    })
}

/// Serves `app` on `listener` until `shutdown` resolves, then persists the index.
pub async fn serve_until<F>(listener: TcpListener, app: App, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let App {
        index,
        router,
        indexer,
        snapshots,
    } = app;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    indexer.abort();
    snapshots.abort();

    match tokio::task::spawn_blocking(move || index.flush()).await {
        Ok(Ok(())) => tracing::info!("Index saved"),
        Ok(Err(e)) => tracing::error!("Failed to save index on shutdown: {:#}", e),
        Err(e) => tracing::error!("Final snapshot task panicked: {}", e),
    }

    Ok(())
}

pub async fn run(config: ServerConfig) -> Result<()> {
    let app = start(&config)?;

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Started server on {}", listener.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown");

    serve_until(listener, app, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
