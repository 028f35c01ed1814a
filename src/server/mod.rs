//! HTTP surface: routes, shared state and the serve loop.

mod error;
mod handlers;

pub use error::{ApiError, ErrorBody, ErrorDetail};

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::translation::Translator;

/// State shared by every request. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<Translator>,
}

impl AppState {
    pub fn new(translator: Translator) -> Self {
        Self {
            translator: Arc::new(translator),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/translate", post(handlers::translate))
        .route("/health", get(handlers::health))
        .route("/languages", get(handlers::languages))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(error::panic_response))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Binds `host:port` and serves until Ctrl-C or SIGTERM.
///
/// `host` may be an IP address or a hostname.
pub async fn serve(host: &str, port: u16, state: AppState) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    let addr = listener.local_addr().context("Failed to read bound address")?;

    info!("Translation service listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
