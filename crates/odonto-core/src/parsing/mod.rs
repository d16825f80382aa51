pub mod amount;
pub mod assembler;
pub mod tokenizer;

use serde::{Deserialize, Serialize};

use crate::extraction::{concatenate_pages, normalize_page, PageContent, TextMode};
use crate::model::{BeneficiaryRecord, ExtractionWarning, Token, WarningKind};
use amount::parse_amount;
use assembler::assemble;
use tokenizer::tokenize;

/// Records assembled from a document plus the anomalies seen on the way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedRecords {
    pub records: Vec<BeneficiaryRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ExtractionWarning>,
}

/// Turn extracted page text into beneficiary records.
pub fn parse_pages(pages: &[PageContent], mode: TextMode) -> ParsedRecords {
    let mut parsed = ParsedRecords::default();

    match mode {
        TextMode::Concatenated => {
            let text = concatenate_pages(pages);
            parse_block(&text, None, &mut parsed);
        }
        TextMode::PerPage => {
            for page in pages {
                let text = normalize_page(page);
                parse_block(&text, Some(page.page_number), &mut parsed);
            }
        }
    }

    for record in &parsed.records {
        if let Some(raw) = record.guide_amount_raw.as_deref() {
            if parse_amount(raw).is_none() {
                tracing::warn!(
                    guide = record.guide_number.as_deref().unwrap_or(""),
                    amount = raw,
                    "unparsable guide amount, treating as absent"
                );
                parsed.warnings.push(ExtractionWarning {
                    kind: WarningKind::UnparsableAmount,
                    detail: format!(
                        "guide {}: amount '{}' is not a number",
                        record.guide_number.as_deref().unwrap_or("?"),
                        raw
                    ),
                });
            }
        }
    }

    tracing::debug!(
        records = parsed.records.len(),
        warnings = parsed.warnings.len(),
        ?mode,
        "parsed document text"
    );

    parsed
}

fn parse_block(text: &str, page: Option<usize>, parsed: &mut ParsedRecords) {
    let tokens = tokenize(text);
    let assembly = assemble(tokens);

    for token in &assembly.orphaned {
        parsed.warnings.push(orphan_warning(token, page));
    }

    parsed.records.extend(assembly.records);
}

fn orphan_warning(token: &Token, page: Option<usize>) -> ExtractionWarning {
    let location = match page {
        Some(n) => format!(" on page {n}"),
        None => String::new(),
    };
    tracing::warn!(%token, page, "field found before any guide number, dropped");
    ExtractionWarning {
        kind: WarningKind::OrphanedToken,
        detail: format!("{token}{location} appears before any guide number and was dropped"),
    }
}
