use odonto_core::extraction::pdftotext::PdftotextExtractor;
use odonto_core::ProcessOptions;
use std::path::PathBuf;

use crate::output;

pub fn run(
    pdf_file: PathBuf,
    output_format: &str,
    options: ProcessOptions,
) -> Result<(), odonto_core::error::OdontoError> {
    let extractor = PdftotextExtractor::new();
    let report = odonto_core::process_pdf_file(&pdf_file, &extractor, &options)?;

    match output_format {
        "json" => output::json::print(&report)?,
        _ => output::table::print(&report),
    }

    if !report.warnings.is_empty() {
        for w in &report.warnings {
            eprintln!("  warning: {}", w.detail);
        }
    }

    Ok(())
}
