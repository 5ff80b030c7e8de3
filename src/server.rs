//! The connection dispatcher and shared server context.
//!
//! [`ServerContext`] is built once, single-threaded, before any connection
//! is accepted, then shared by immutable reference across all sessions.
//! Nothing mutates it after build, which is what makes the lock-free
//! concurrent dispatcher safe.
//!
//! Two dispatch policies are supported: [`DispatchMode::Sequential`]
//! drives one session at a time to completion; [`DispatchMode::Concurrent`]
//! spawns one worker task per connection and reaps finished workers
//! without blocking new accepts.

use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinSet;

use crate::corpus::DocIdMap;
use crate::error::{CinedexError, Result};
use crate::index::MovieIndex;
use crate::ingest;
use crate::session;

/// The read-only state shared by every session: the built index and the
/// doc id map used to materialize result rows.
#[derive(Debug)]
pub struct ServerContext {
    pub index: MovieIndex,
    pub docs: DocIdMap,
}

impl ServerContext {
    /// Crawl the corpus and build the index.
    pub fn build(corpus_dir: &Path) -> Result<Self> {
        info!("crawling directory tree starting at: {}", corpus_dir.display());
        let mut docs = DocIdMap::new()?;
        docs.crawl(corpus_dir)?;
        info!("crawled {} files", docs.len());

        info!("parsing and indexing files...");
        let index = ingest::build_index(&docs)?;
        Ok(ServerContext { index, docs })
    }
}

/// How the dispatcher maps connections to sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// One session at a time; accept, serve to completion, accept again.
    Sequential,
    /// One isolated worker task per connection; the dispatcher loops
    /// immediately after spawning.
    Concurrent,
}

/// Bind the listening socket.
///
/// This is the only fatal failure in the server: callers are expected to
/// exit when it fails.
pub async fn bind(port: u16) -> Result<TcpListener> {
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|error| CinedexError::network(format!("failed to bind port {port}: {error}")))?;
    if let Ok(addr) = listener.local_addr() {
        info!("listening on {addr}");
    }
    Ok(listener)
}

/// Accept and serve connections until a termination signal arrives.
pub async fn serve(
    listener: TcpListener,
    context: Arc<ServerContext>,
    mode: DispatchMode,
) -> Result<()> {
    match mode {
        DispatchMode::Sequential => serve_sequential(listener, context).await,
        DispatchMode::Concurrent => serve_concurrent(listener, context).await,
    }
}

async fn serve_sequential(listener: TcpListener, context: Arc<ServerContext>) -> Result<()> {
    loop {
        info!("waiting for client connection...");
        tokio::select! {
            accepted = listener.accept() => {
                let (mut stream, peer) = match accepted {
                    Ok(connection) => connection,
                    Err(error) => {
                        warn!("accept failed: {error}");
                        continue;
                    }
                };
                info!("client connected: {peer}");
                if let Err(error) = session::run_session(&mut stream, &context).await {
                    warn!("session aborted: {error}");
                }
            }
            _ = signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }
    Ok(())
}

async fn serve_concurrent(listener: TcpListener, context: Arc<ServerContext>) -> Result<()> {
    let mut workers: JoinSet<()> = JoinSet::new();
    loop {
        info!("waiting for client connection...");
        tokio::select! {
            accepted = listener.accept() => {
                // Reap finished workers without blocking the accept loop.
                while workers.try_join_next().is_some() {}

                let (mut stream, peer) = match accepted {
                    Ok(connection) => connection,
                    Err(error) => {
                        warn!("accept failed: {error}");
                        continue;
                    }
                };
                info!("client connected: {peer}; spawning worker");
                let context = Arc::clone(&context);
                workers.spawn(async move {
                    if let Err(error) = session::run_session(&mut stream, &context).await {
                        warn!("session aborted: {error}");
                    }
                });
            }
            _ = signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    // Stop accepting, let in-flight sessions run to completion.
    drop(listener);
    if !workers.is_empty() {
        info!("waiting for {} active sessions to finish", workers.len());
    }
    while workers.join_next().await.is_some() {}
    Ok(())
}
