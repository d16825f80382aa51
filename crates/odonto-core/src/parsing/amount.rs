use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a guide amount printed in Brazilian notation.
///
/// `.` is the thousands separator and `,` the decimal separator:
/// - "1.234,56" -> Some(1234.56)
/// - "0,00" -> Some(0.00)
/// - "" -> None
/// - "12,3,4" -> None
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let normalized = s.replace('.', "").replace(',', ".");
    if !normalized.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(&normalized).ok()
}
