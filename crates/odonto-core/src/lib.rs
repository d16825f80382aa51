pub mod aggregate;
pub mod error;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod report;

use serde::{Deserialize, Serialize};
use std::path::Path;

use aggregate::aggregate;
use error::OdontoError;
use extraction::{PageContent, PdfExtractor, TextMode};
use model::{BeneficiaryRecord, BillingReport, ExtractionWarning};
use parsing::ParsedRecords;

/// Options controlling how a document is read and how empty results are
/// treated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProcessOptions {
    pub mode: TextMode,
    /// When set, an unreadable document or one without records produces an
    /// empty report instead of an error.
    pub allow_empty: bool,
}

/// Main API entry point: extract billing records from a claim PDF and
/// aggregate them per guide and per dentist.
pub fn process_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    options: &ProcessOptions,
) -> Result<BillingReport, OdontoError> {
    let parsed = parse_pdf(pdf_bytes, extractor, options)?;
    finish(parsed, options)
}

/// Same as [`process_pdf`] for a PDF already on disk.
pub fn process_pdf_file(
    path: &Path,
    extractor: &dyn PdfExtractor,
    options: &ProcessOptions,
) -> Result<BillingReport, OdontoError> {
    let pages = recover_extraction(extractor.extract_file(path), extractor, options)?;
    let parsed = parsing::parse_pages(&pages, options.mode);
    finish(parsed, options)
}

/// Extract and parse records without aggregating.
///
/// Extraction failures are swallowed into an empty result only when
/// `options.allow_empty` is set.
pub fn parse_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    options: &ProcessOptions,
) -> Result<ParsedRecords, OdontoError> {
    let pages = recover_extraction(extractor.extract_pages(pdf_bytes), extractor, options)?;
    Ok(parsing::parse_pages(&pages, options.mode))
}

fn recover_extraction(
    result: Result<Vec<PageContent>, OdontoError>,
    extractor: &dyn PdfExtractor,
    options: &ProcessOptions,
) -> Result<Vec<PageContent>, OdontoError> {
    match result {
        Ok(pages) => Ok(pages),
        Err(e) if options.allow_empty && e.is_extraction() => {
            tracing::warn!(
                backend = extractor.backend_name(),
                error = %e,
                "extraction failed, continuing with an empty document"
            );
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

fn finish(parsed: ParsedRecords, options: &ProcessOptions) -> Result<BillingReport, OdontoError> {
    if parsed.records.is_empty() && !options.allow_empty {
        return Err(OdontoError::NoRecords);
    }

    Ok(build_report(parsed.records, parsed.warnings))
}

/// Aggregate assembled records into the full report.
pub fn build_report(
    records: Vec<BeneficiaryRecord>,
    mut warnings: Vec<ExtractionWarning>,
) -> BillingReport {
    let aggregation = aggregate(&records);
    warnings.extend(aggregation.warnings);
    tracing::info!(
        records = records.len(),
        guides = aggregation.detailed.len(),
        dentists = aggregation.summary.len(),
        total = %aggregation.grand_total.total_amount,
        "aggregated billing records"
    );

    BillingReport {
        records,
        detailed: aggregation.detailed,
        summary: aggregation.summary,
        grand_total: aggregation.grand_total,
        warnings,
    }
}
