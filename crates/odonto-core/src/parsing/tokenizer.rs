use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::model::Token;

/// All four field markers in one alternation, in priority order. Each label
/// is a distinct literal, so at most one alternative can match at a position.
///
/// Free-text captures use `.`, which never matches `\n`, so a dentist or
/// beneficiary name stops at the end of its line.
static FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"71 - Nome Social do Beneficiário\r?\n(?P<guide_number>\d{9})",
        r"|9\d{8}-00\d{3}\r?\n(?P<dentist>.+)",
        r"|21 - Nome do Beneficiário\r?\n(?P<beneficiary_name>.+)",
        r"|40 - Valor Total Liberado Guia \(R\$\)\r?\n(?P<guide_amount>[\d.,]+)",
    ))
    .expect("field pattern is a valid regex")
});

/// Scan text for field markers and return the matched fields in document order.
///
/// Matching is a single left-to-right pass over non-overlapping matches.
/// Text that matches no marker is ignored.
pub fn tokenize(text: &str) -> Vec<Token> {
    FIELD_PATTERN
        .captures_iter(text)
        .filter_map(|caps| token_from_captures(&caps))
        .collect()
}

fn token_from_captures(caps: &Captures<'_>) -> Option<Token> {
    if let Some(m) = caps.name("guide_number") {
        return Some(Token::GuideNumber(m.as_str().to_string()));
    }
    if let Some(m) = caps.name("dentist") {
        return Some(Token::DentistIdentifier(free_text(m.as_str())));
    }
    if let Some(m) = caps.name("beneficiary_name") {
        return Some(Token::BeneficiaryName(free_text(m.as_str())));
    }
    caps.name("guide_amount")
        .map(|m| Token::GuideAmount(m.as_str().to_string()))
}

fn free_text(s: &str) -> String {
    s.trim_end_matches('\r').to_string()
}
