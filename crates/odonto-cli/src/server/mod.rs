//! HTTP surface: `POST /process_pdf` turns an uploaded claim PDF into the
//! billing workbook.

mod error;
mod handlers;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use odonto_core::error::OdontoError;
use odonto_core::extraction::PdfExtractor;
use odonto_core::ProcessOptions;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

pub struct ServerConfig {
    pub bind: SocketAddr,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub options: ProcessOptions,
}

/// Read-only state shared by all requests.
pub struct ServerState {
    pub extractor: Arc<dyn PdfExtractor>,
    pub options: ProcessOptions,
    pub upload_dir: PathBuf,
}

pub fn router(state: Arc<ServerState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/process_pdf", post(handlers::process_pdf))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: ServerConfig, extractor: Arc<dyn PdfExtractor>) -> Result<(), OdontoError> {
    std::fs::create_dir_all(&config.upload_dir)?;

    let state = Arc::new(ServerState {
        extractor,
        options: config.options,
        upload_dir: config.upload_dir.clone(),
    });
    let app = router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(
        addr = %config.bind,
        upload_dir = %config.upload_dir.display(),
        mode = ?config.options.mode,
        allow_empty = config.options.allow_empty,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
}
