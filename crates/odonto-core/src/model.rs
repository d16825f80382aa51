use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of the synthetic row closing the per-dentist summary.
pub const GRAND_TOTAL_LABEL: &str = "TOTAL GERAL";

/// A labelled field recognized in the document text, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Token {
    /// Nine-digit guide number. Marks the start of a new record.
    GuideNumber(String),
    /// Dentist name printed under the dentist billing-code line.
    DentistIdentifier(String),
    BeneficiaryName(String),
    /// Amount exactly as printed, e.g. "1.500,00".
    GuideAmount(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::GuideNumber(v) => write!(f, "guide number {v}"),
            Token::DentistIdentifier(v) => write!(f, "dentist {v}"),
            Token::BeneficiaryName(v) => write!(f, "beneficiary {v}"),
            Token::GuideAmount(v) => write!(f, "amount {v}"),
        }
    }
}

/// One beneficiary entry as assembled from the token stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeneficiaryRecord {
    pub guide_number: Option<String>,
    pub dentist: Option<String>,
    pub beneficiary_name: Option<String>,
    pub guide_amount_raw: Option<String>,
}

impl BeneficiaryRecord {
    pub fn is_empty(&self) -> bool {
        self.guide_number.is_none()
            && self.dentist.is_none()
            && self.beneficiary_name.is_none()
            && self.guide_amount_raw.is_none()
    }
}

/// One row per distinct guide number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedRow {
    pub guide_number: Option<String>,
    pub dentist: Option<String>,
    pub beneficiary_name: Option<String>,
    pub guide_amount: Decimal,
}

/// One row per dentist. `dentist == None` groups guides with no dentist line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub dentist: Option<String>,
    pub guide_count: usize,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A field appeared before any guide number and was dropped.
    OrphanedToken,
    /// A guide amount could not be parsed and counts as absent.
    UnparsableAmount,
    /// Adding an amount to a total would overflow, so it was left out.
    AmountOverflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionWarning {
    pub kind: WarningKind,
    pub detail: String,
}

/// Everything produced for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingReport {
    pub records: Vec<BeneficiaryRecord>,
    pub detailed: Vec<DetailedRow>,
    pub summary: Vec<SummaryRow>,
    pub grand_total: SummaryRow,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ExtractionWarning>,
}

impl BillingReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
