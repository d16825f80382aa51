use crate::error::OdontoError;
use crate::extraction::{PageContent, PdfExtractor};
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Runs pdftotext in its default reading-order mode, which prints each text
/// block on its own line: a field label followed by its value on the next
/// line. `-layout` would merge columns onto one line and break that pairing.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, OdontoError> {
        // Write PDF bytes to a temp file
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| OdontoError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| OdontoError::Extraction(e.to_string()))?;

        run_pdftotext(tmpfile.path())
    }

    fn extract_file(&self, path: &Path) -> Result<Vec<PageContent>, OdontoError> {
        run_pdftotext(path)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

fn run_pdftotext(pdf_path: &Path) -> Result<Vec<PageContent>, OdontoError> {
    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-") // output to stdout
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OdontoError::PdftotextNotFound
            } else {
                OdontoError::Extraction(format!("pdftotext failed: {}", e))
            }
        })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(OdontoError::PdftotextFailed { code, stderr });
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let pages = split_pages(&text);
    tracing::debug!(pages = pages.len(), path = %pdf_path.display(), "pdftotext extracted text");

    Ok(pages)
}

/// Split pdftotext output into pages (form feed `\x0c` ends every page).
fn split_pages(text: &str) -> Vec<PageContent> {
    let mut chunks: Vec<&str> = text.split('\x0c').collect();

    // pdftotext terminates the last page with a form feed too
    if chunks.len() > 1 && chunks.last().is_some_and(|c| c.trim().is_empty()) {
        chunks.pop();
    }

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, page_text)| PageContent::from_text(i + 1, page_text))
        .collect()
}
