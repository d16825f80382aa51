use odonto_core::extraction::pdftotext::PdftotextExtractor;
use odonto_core::report::{write_xlsx, ReportLayout};
use odonto_core::ProcessOptions;
use std::path::PathBuf;

pub fn run(
    pdf_file: PathBuf,
    out: PathBuf,
    layout: ReportLayout,
    options: ProcessOptions,
) -> Result<(), odonto_core::error::OdontoError> {
    let extractor = PdftotextExtractor::new();
    let report = odonto_core::process_pdf_file(&pdf_file, &extractor, &options)?;

    let bytes = write_xlsx(&report, layout)?;
    std::fs::write(&out, bytes)?;

    eprintln!(
        "{} record(s), {} guide(s), {} dentist(s), written to {}",
        report.records.len(),
        report.detailed.len(),
        report.summary.len(),
        out.display()
    );
    if !report.warnings.is_empty() {
        eprintln!("  {} warning(s) during parsing", report.warnings.len());
    }

    Ok(())
}
