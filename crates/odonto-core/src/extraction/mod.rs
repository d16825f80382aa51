pub mod pdftotext;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::OdontoError;

/// Text extracted from a single page of a PDF.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<String>,
}

impl PageContent {
    pub fn from_text(page_number: usize, text: &str) -> Self {
        PageContent {
            page_number,
            lines: text.lines().map(|l| l.to_string()).collect(),
        }
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, OdontoError>;

    /// Extract text from a PDF already on disk.
    fn extract_file(&self, path: &Path) -> Result<Vec<PageContent>, OdontoError> {
        let bytes = std::fs::read(path).map_err(|e| {
            OdontoError::Extraction(format!("cannot read {}: {}", path.display(), e))
        })?;
        self.extract_pages(&bytes)
    }

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// How page texts are fed to the tokenizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    /// Join every page and scan the whole document once. A record may span a
    /// page break.
    #[default]
    Concatenated,
    /// Scan each page on its own. Fields must sit on the same page as their
    /// guide number.
    PerPage,
}

/// Join pages with a newline and drop whitespace-only lines.
pub fn concatenate_pages(pages: &[PageContent]) -> String {
    strip_blank_lines(pages.iter().flat_map(|p| p.lines.iter()))
}

/// Normalize one page the same way [`concatenate_pages`] does.
pub fn normalize_page(page: &PageContent) -> String {
    strip_blank_lines(page.lines.iter())
}

fn strip_blank_lines<'a>(lines: impl Iterator<Item = &'a String>) -> String {
    lines
        // a line may still carry embedded breaks if the backend built it by hand
        .flat_map(|l| l.lines())
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
