use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::model::{
    BeneficiaryRecord, DetailedRow, ExtractionWarning, SummaryRow, WarningKind, GRAND_TOTAL_LABEL,
};
use crate::parsing::amount::parse_amount;

/// Per-guide rows, per-dentist rows and the grand total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub detailed: Vec<DetailedRow>,
    pub summary: Vec<SummaryRow>,
    pub grand_total: SummaryRow,
    /// Amounts left out of a sum because adding them would overflow.
    pub warnings: Vec<ExtractionWarning>,
}

/// Run both grouping stages and compute the grand total.
pub fn aggregate(records: &[BeneficiaryRecord]) -> Aggregation {
    let mut warnings = Vec::new();
    let detailed = group_by_guide(records, &mut warnings);
    let summary = group_by_dentist(&detailed, &mut warnings);
    let grand_total = grand_total(&summary, &mut warnings);
    Aggregation {
        detailed,
        summary,
        grand_total,
        warnings,
    }
}

/// Add `amount` to `total`, or leave `total` untouched and record a warning
/// when the sum does not fit in a `Decimal`.
fn add_amount(
    total: &mut Decimal,
    amount: Decimal,
    target: &str,
    warnings: &mut Vec<ExtractionWarning>,
) {
    match total.checked_add(amount) {
        Some(sum) => *total = sum,
        None => {
            tracing::warn!(target_row = target, %amount, "amount overflows total, left out");
            warnings.push(ExtractionWarning {
                kind: WarningKind::AmountOverflow,
                detail: format!("{target}: amount {amount} overflows the total and was left out"),
            });
        }
    }
}

fn label(value: Option<&str>) -> &str {
    value.unwrap_or("?")
}

/// Collapse records sharing a guide number into one row.
///
/// Groups keep first-appearance order. Dentist and beneficiary come from the
/// first record in the group that has them; amounts are summed, with
/// missing or unparsable amounts contributing nothing.
pub fn group_by_guide(
    records: &[BeneficiaryRecord],
    warnings: &mut Vec<ExtractionWarning>,
) -> Vec<DetailedRow> {
    let mut groups: IndexMap<Option<&str>, DetailedRow> = IndexMap::new();

    for record in records {
        let row = groups
            .entry(record.guide_number.as_deref())
            .or_insert_with(|| DetailedRow {
                guide_number: record.guide_number.clone(),
                dentist: None,
                beneficiary_name: None,
                guide_amount: Decimal::ZERO,
            });

        if row.dentist.is_none() {
            row.dentist = record.dentist.clone();
        }
        if row.beneficiary_name.is_none() {
            row.beneficiary_name = record.beneficiary_name.clone();
        }
        if let Some(amount) = record.guide_amount_raw.as_deref().and_then(parse_amount) {
            let target = format!("guide {}", label(record.guide_number.as_deref()));
            add_amount(&mut row.guide_amount, amount, &target, warnings);
        }
    }

    groups.into_values().collect()
}

/// Count guides and sum amounts per dentist. Guides without a dentist form
/// their own group.
pub fn group_by_dentist(
    detailed: &[DetailedRow],
    warnings: &mut Vec<ExtractionWarning>,
) -> Vec<SummaryRow> {
    let mut groups: IndexMap<Option<&str>, SummaryRow> = IndexMap::new();

    for row in detailed {
        let summary = groups
            .entry(row.dentist.as_deref())
            .or_insert_with(|| SummaryRow {
                dentist: row.dentist.clone(),
                guide_count: 0,
                total_amount: Decimal::ZERO,
            });
        summary.guide_count += 1;
        let target = format!("dentist {}", label(row.dentist.as_deref()));
        add_amount(&mut summary.total_amount, row.guide_amount, &target, warnings);
    }

    groups.into_values().collect()
}

pub fn grand_total(summary: &[SummaryRow], warnings: &mut Vec<ExtractionWarning>) -> SummaryRow {
    let mut total_amount = Decimal::ZERO;
    for row in summary {
        add_amount(&mut total_amount, row.total_amount, GRAND_TOTAL_LABEL, warnings);
    }
    SummaryRow {
        dentist: Some(GRAND_TOTAL_LABEL.to_string()),
        guide_count: summary.iter().map(|s| s.guide_count).sum(),
        total_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(
        guide: &str,
        dentist: Option<&str>,
        name: Option<&str>,
        amount: Option<&str>,
    ) -> BeneficiaryRecord {
        BeneficiaryRecord {
            guide_number: Some(guide.into()),
            dentist: dentist.map(Into::into),
            beneficiary_name: name.map(Into::into),
            guide_amount_raw: amount.map(Into::into),
        }
    }

    #[test]
    fn test_duplicate_guides_collapse_and_sum() {
        let records = vec![
            record("111111111", Some("Dr. Silva"), Some("Ana"), Some("100,00")),
            record("222222222", Some("Dra. Costa"), Some("Bruno"), Some("50,00")),
            record("111111111", Some("Dr. Outro"), Some("Outra"), Some("1.000,50")),
        ];
        let detailed = group_by_guide(&records, &mut Vec::new());
        assert_eq!(detailed.len(), 2);
        assert_eq!(detailed[0].guide_number.as_deref(), Some("111111111"));
        assert_eq!(detailed[0].dentist.as_deref(), Some("Dr. Silva"));
        assert_eq!(detailed[0].beneficiary_name.as_deref(), Some("Ana"));
        assert_eq!(detailed[0].guide_amount, dec!(1100.50));
        assert_eq!(detailed[1].guide_amount, dec!(50.00));
    }

    #[test]
    fn test_first_non_absent_fields_win() {
        let records = vec![
            record("111111111", None, None, Some("10,00")),
            record("111111111", Some("Dr. Silva"), Some("Ana"), None),
            record("111111111", Some("Dr. Late"), Some("Late"), None),
        ];
        let detailed = group_by_guide(&records, &mut Vec::new());
        assert_eq!(detailed.len(), 1);
        assert_eq!(detailed[0].dentist.as_deref(), Some("Dr. Silva"));
        assert_eq!(detailed[0].beneficiary_name.as_deref(), Some("Ana"));
        assert_eq!(detailed[0].guide_amount, dec!(10));
    }

    #[test]
    fn test_absent_and_malformed_amounts_contribute_nothing() {
        let records = vec![
            record("111111111", Some("Dr. Silva"), None, Some("12,3,4")),
            record("111111111", Some("Dr. Silva"), None, None),
            record("111111111", Some("Dr. Silva"), None, Some("2,50")),
            record("222222222", Some("Dr. Silva"), None, None),
        ];
        let detailed = group_by_guide(&records, &mut Vec::new());
        assert_eq!(detailed[0].guide_amount, dec!(2.50));
        assert_eq!(detailed[1].guide_amount, Decimal::ZERO);
    }

    #[test]
    fn test_group_order_is_first_appearance() {
        let records = vec![
            record("333333333", Some("Zé"), None, None),
            record("111111111", Some("Ana"), None, None),
            record("222222222", Some("Zé"), None, None),
        ];
        let agg = aggregate(&records);
        let guides: Vec<_> = agg
            .detailed
            .iter()
            .map(|r| r.guide_number.as_deref().unwrap())
            .collect();
        assert_eq!(guides, vec!["333333333", "111111111", "222222222"]);
        let dentists: Vec<_> = agg.summary.iter().map(|s| s.dentist.as_deref()).collect();
        assert_eq!(dentists, vec![Some("Zé"), Some("Ana")]);
    }

    #[test]
    fn test_absent_dentist_forms_own_group() {
        let records = vec![
            record("111111111", None, Some("Ana"), Some("10,00")),
            record("222222222", Some("Dr. Silva"), Some("Bruno"), Some("20,00")),
            record("333333333", None, Some("Carla"), Some("5,00")),
        ];
        let agg = aggregate(&records);
        assert_eq!(agg.summary.len(), 2);
        assert_eq!(agg.summary[0].dentist, None);
        assert_eq!(agg.summary[0].guide_count, 2);
        assert_eq!(agg.summary[0].total_amount, dec!(15.00));
        assert_eq!(agg.summary[1].dentist.as_deref(), Some("Dr. Silva"));
        assert_eq!(agg.summary[1].guide_count, 1);
    }

    #[test]
    fn test_grand_total_matches_detailed_rows() {
        let records = vec![
            record("111111111", Some("Dr. Silva"), None, Some("1.500,00")),
            record("111111111", Some("Dr. Silva"), None, Some("250,25")),
            record("222222222", Some("Dra. Costa"), None, Some("99,99")),
            record("333333333", None, None, None),
        ];
        let agg = aggregate(&records);
        assert_eq!(agg.grand_total.dentist.as_deref(), Some(GRAND_TOTAL_LABEL));
        assert_eq!(agg.grand_total.guide_count, agg.detailed.len());
        let detailed_sum: Decimal = agg.detailed.iter().map(|r| r.guide_amount).sum();
        assert_eq!(agg.grand_total.total_amount, detailed_sum);
        assert_eq!(agg.grand_total.total_amount, dec!(1850.24));
    }

    #[test]
    fn test_empty_input() {
        let agg = aggregate(&[]);
        assert!(agg.detailed.is_empty());
        assert!(agg.summary.is_empty());
        assert_eq!(agg.grand_total.guide_count, 0);
        assert_eq!(agg.grand_total.total_amount, Decimal::ZERO);
        assert!(agg.warnings.is_empty());
    }

    const HUGE: &str = "50.000.000.000.000.000.000.000.000.000,00";

    #[test]
    fn test_overflowing_guide_amount_is_left_out() {
        let records = vec![
            record("111111111", Some("Dr. Silva"), None, Some(HUGE)),
            record("111111111", Some("Dr. Silva"), None, Some(HUGE)),
        ];
        let agg = aggregate(&records);
        let huge = parse_amount(HUGE).unwrap();
        assert_eq!(agg.detailed[0].guide_amount, huge);
        assert_eq!(agg.grand_total.total_amount, huge);
        assert_eq!(agg.warnings.len(), 1);
        assert_eq!(agg.warnings[0].kind, WarningKind::AmountOverflow);
        assert!(agg.warnings[0].detail.contains("guide 111111111"));
    }

    #[test]
    fn test_overflowing_dentist_and_grand_totals_do_not_panic() {
        let records = vec![
            record("111111111", Some("Dr. Silva"), None, Some(HUGE)),
            record("222222222", Some("Dr. Silva"), None, Some(HUGE)),
            record("333333333", Some("Dra. Costa"), None, Some("10,00")),
            record("444444444", Some("Dra. Outra"), None, Some(HUGE)),
        ];
        let agg = aggregate(&records);
        let huge = parse_amount(HUGE).unwrap();

        assert_eq!(agg.detailed.len(), 4);
        assert_eq!(agg.summary[0].guide_count, 2);
        assert_eq!(agg.summary[0].total_amount, huge);
        assert_eq!(agg.summary[1].total_amount, dec!(10.00));
        assert_eq!(agg.grand_total.guide_count, 4);
        assert_eq!(agg.grand_total.total_amount, huge + dec!(10.00));

        let overflows: Vec<_> = agg
            .warnings
            .iter()
            .filter(|w| w.kind == WarningKind::AmountOverflow)
            .collect();
        assert_eq!(overflows.len(), 2);
        assert!(overflows[0].detail.contains("dentist Dr. Silva"));
        assert!(overflows[1].detail.contains(GRAND_TOTAL_LABEL));
    }
}
