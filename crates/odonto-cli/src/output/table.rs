use odonto_core::model::{BillingReport, SummaryRow};

pub fn print(report: &BillingReport) {
    print!("{}", format_report(report));
}

/// Render the per-guide and per-dentist tables as aligned plain text.
pub fn format_report(report: &BillingReport) -> String {
    let mut out = String::new();

    out.push_str("=== Detalhado ===\n\n");
    if report.detailed.is_empty() {
        out.push_str("  (no guides found)\n");
    } else {
        let dentist_w = width(report.detailed.iter().map(|r| r.dentist.as_deref()), "Dentista");
        let name_w = width(
            report.detailed.iter().map(|r| r.beneficiary_name.as_deref()),
            "Nome do Beneficiário",
        );

        out.push_str(&format!(
            "  {:<14}  {:<dentist_w$}  {:<name_w$}  {:>14}\n",
            "Número da Guia", "Dentista", "Nome do Beneficiário", "Valor da Guia",
        ));
        for row in &report.detailed {
            out.push_str(&format!(
                "  {:<14}  {:<dentist_w$}  {:<name_w$}  {:>14.2}\n",
                row.guide_number.as_deref().unwrap_or("-"),
                row.dentist.as_deref().unwrap_or("-"),
                row.beneficiary_name.as_deref().unwrap_or("-"),
                row.guide_amount,
            ));
        }
    }

    out.push_str("\n=== Resumo por Dentista ===\n\n");
    let rows: Vec<&SummaryRow> = report
        .summary
        .iter()
        .chain(std::iter::once(&report.grand_total))
        .collect();
    let dentist_w = width(rows.iter().map(|r| r.dentist.as_deref()), "Dentista");

    out.push_str(&format!(
        "  {:<dentist_w$}  {:>11}  {:>14}\n",
        "Dentista", "quant_guias", "total_guias",
    ));
    for row in rows {
        out.push_str(&format!(
            "  {:<dentist_w$}  {:>11}  {:>14.2}\n",
            row.dentist.as_deref().unwrap_or("-"),
            row.guide_count,
            row.total_amount,
        ));
    }

    out
}

fn width<'a>(values: impl Iterator<Item = Option<&'a str>>, header: &str) -> usize {
    values
        .map(|v| v.map(|s| s.chars().count()).unwrap_or(1))
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use odonto_core::model::BeneficiaryRecord;

    fn sample_report() -> BillingReport {
        odonto_core::build_report(
            vec![
                BeneficiaryRecord {
                    guide_number: Some("123456789".into()),
                    dentist: Some("Dr. Silva".into()),
                    beneficiary_name: Some("João Souza".into()),
                    guide_amount_raw: Some("1.500,00".into()),
                },
                BeneficiaryRecord {
                    guide_number: Some("987654321".into()),
                    dentist: None,
                    beneficiary_name: Some("Ana".into()),
                    guide_amount_raw: None,
                },
            ],
            vec![],
        )
    }

    #[test]
    fn test_format_report_lists_guides_and_total() {
        let text = format_report(&sample_report());
        assert!(text.contains("=== Detalhado ==="));
        assert!(text.contains("123456789"));
        assert!(text.contains("João Souza"));
        assert!(text.contains("1500.00"));
        assert!(text.contains("TOTAL GERAL"));
    }

    #[test]
    fn test_missing_values_shown_as_dash() {
        let text = format_report(&sample_report());
        let ana_line = text.lines().find(|l| l.contains("Ana")).unwrap();
        assert!(ana_line.contains(" - "));
        assert!(ana_line.trim_end().ends_with("0.00"));
    }

    #[test]
    fn test_empty_report() {
        let report = odonto_core::build_report(vec![], vec![]);
        let text = format_report(&report);
        assert!(text.contains("(no guides found)"));
        assert!(text.contains("TOTAL GERAL"));
    }
}
