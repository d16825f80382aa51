use odonto_core::extraction::pdftotext::PdftotextExtractor;
use std::sync::Arc;

use crate::server::{self, ServerConfig};

pub fn run(config: ServerConfig) -> Result<(), odonto_core::error::OdontoError> {
    if !PdftotextExtractor::is_available() {
        tracing::warn!("pdftotext not found on PATH, every upload will fail to extract");
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(config, Arc::new(PdftotextExtractor::new())))
}
