//! Server bootstrap and lifecycle.
//!
//! Opens the store, serves the router until Ctrl-C, then closes the store.

use crate::config::ServerConfig;
use crate::routes::router;
use crate::store::Store;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use yoga_core::db::DbError;

/// Failure that stops the server.
#[derive(Debug)]
pub enum ServerError {
    Store(DbError),
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
    Serve(std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "registration store unavailable: {err}"),
            Self::Bind { addr, source } => write!(f, "failed to bind {addr}: {source}"),
            Self::Serve(err) => write!(f, "server error: {err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Bind { source, .. } => Some(source),
            Self::Serve(err) => Some(err),
        }
    }
}

impl From<DbError> for ServerError {
    fn from(value: DbError) -> Self {
        Self::Store(value)
    }
}

/// Runs the registration server until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    run_until(config, shutdown_signal()).await
}

/// Runs the registration server until `shutdown` resolves.
///
/// The store is closed on every exit path once it has been opened.
pub async fn run_until(
    config: ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let store = Arc::new(Store::open(&config.db_path)?);
    info!(
        "event=server_start module=web status=start db_path={}",
        config.db_path.display()
    );

    let served = serve(&config, Arc::clone(&store), shutdown).await;
    let closed = close_store(store);
    served.and(closed)
}

async fn serve(
    config: &ServerConfig,
    store: Arc<Store>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.addr,
            source,
        })?;
    let addr = listener.local_addr().map_err(ServerError::Serve)?;

    println!("Server is running at http://{addr}");
    info!("event=server_start module=web status=ok addr={addr}");

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    info!("event=server_stop module=web status=ok");
    Ok(())
}

fn close_store(store: Arc<Store>) -> Result<(), ServerError> {
    match Arc::try_unwrap(store) {
        Ok(store) => store.close().map_err(ServerError::Store),
        Err(_) => {
            warn!("event=db_close module=web status=skipped reason=store_still_shared");
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=server_stop module=web status=error error_code=signal_failed error={err}");
        std::future::pending::<()>().await;
    }
    info!("event=server_stop module=web status=start reason=ctrl_c");
}
