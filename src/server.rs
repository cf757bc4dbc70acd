//! HTTP surface: `/` liveness string and `/metrics` exposition.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use prometheus::core::Collector;
use prometheus::{Encoder, Registry, TEXT_FORMAT, TextEncoder};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::error::ExporterError;

type SharedRegistry = Arc<Registry>;

/// Creates a registry holding only `collector`.
///
/// The registry is owned by the caller; nothing is put in the process-wide
/// default registry.
pub fn registry_with(collector: impl Collector + 'static) -> Result<Registry, ExporterError> {
    let registry = Registry::new();
    registry.register(Box::new(collector))?;
    Ok(registry)
}

/// Gathers every registered collector and encodes the result in the text
/// exposition format.
pub fn encode(registry: &Registry) -> Result<Vec<u8>, ExporterError> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(buffer)
}

pub fn router(registry: SharedRegistry) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/metrics", get(handle_metrics))
        .with_state(registry)
}

async fn handle_root() -> &'static str {
    "ok"
}

async fn handle_metrics(State(registry): State<SharedRegistry>) -> Response {
    // Collection reads files and walks /proc; keep it off the async workers.
    match tokio::task::spawn_blocking(move || encode(&registry)).await {
        Ok(Ok(body)) => ([(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
        Err(e) => {
            error!(error = %e, "metrics collection task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Binds `addr` and serves until Ctrl-C or SIGTERM.
pub async fn serve(addr: SocketAddr, registry: SharedRegistry) -> Result<(), ExporterError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ExporterError::Bind { addr, source })?;
    info!(%addr, "listening");

    axum::serve(listener, router(registry))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ExporterError::Serve)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Received shutdown signal");
}
