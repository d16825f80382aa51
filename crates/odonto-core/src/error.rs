#[derive(Debug, thiserror::Error)]
pub enum OdontoError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("no billing records found in document")]
    NoRecords,

    #[error("failed to write spreadsheet: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OdontoError {
    /// True for failures raised while turning PDF bytes into text.
    pub fn is_extraction(&self) -> bool {
        matches!(
            self,
            OdontoError::Extraction(_)
                | OdontoError::PdftotextNotFound
                | OdontoError::PdftotextFailed { .. }
        )
    }
}
