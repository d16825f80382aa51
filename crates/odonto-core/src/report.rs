use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OdontoError;
use crate::model::{BillingReport, SummaryRow};
use crate::parsing::amount::parse_amount;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const REPORT_FILE_NAME: &str = "resultado.xlsx";

pub const DETAILED_SHEET: &str = "Detalhado";
pub const SUMMARY_SHEET: &str = "Resumo por Dentista";
pub const FLAT_SHEET: &str = "Beneficiários";

const RECORD_HEADERS: [&str; 4] = [
    "Número da Guia",
    "Dentista",
    "Nome do Beneficiário",
    "Valor da Guia",
];
const SUMMARY_HEADERS: [&str; 3] = ["Dentista", "quant_guias", "total_guias"];

const AMOUNT_FORMAT: &str = "#,##0.00";

/// Which sheets the workbook contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLayout {
    /// Per-guide sheet plus per-dentist summary sheet.
    #[default]
    Summary,
    /// One sheet, one row per assembled record.
    Flat,
}

impl FromStr for ReportLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" => Ok(ReportLayout::Summary),
            "flat" => Ok(ReportLayout::Flat),
            other => Err(format!("unknown report layout '{other}' (expected summary or flat)")),
        }
    }
}

impl fmt::Display for ReportLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLayout::Summary => write!(f, "summary"),
            ReportLayout::Flat => write!(f, "flat"),
        }
    }
}

/// Render a report as xlsx bytes.
pub fn write_xlsx(report: &BillingReport, layout: ReportLayout) -> Result<Vec<u8>, OdontoError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format(AMOUNT_FORMAT);

    match layout {
        ReportLayout::Summary => {
            write_detailed_sheet(workbook.add_worksheet(), report, &header, &money)?;
            write_summary_sheet(workbook.add_worksheet(), report, &header, &money)?;
        }
        ReportLayout::Flat => {
            write_flat_sheet(workbook.add_worksheet(), report, &header, &money)?;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    tracing::debug!(%layout, bytes = bytes.len(), "rendered xlsx report");
    Ok(bytes)
}

fn write_detailed_sheet(
    sheet: &mut Worksheet,
    report: &BillingReport,
    header: &Format,
    money: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name(DETAILED_SHEET)?;
    write_headers(sheet, &RECORD_HEADERS, header)?;

    for (i, row) in report.detailed.iter().enumerate() {
        let r = (i + 1) as u32;
        write_opt_string(sheet, r, 0, row.guide_number.as_deref())?;
        write_opt_string(sheet, r, 1, row.dentist.as_deref())?;
        write_opt_string(sheet, r, 2, row.beneficiary_name.as_deref())?;
        sheet.write_number_with_format(r, 3, to_f64(row.guide_amount), money)?;
    }

    sheet.set_column_width(0, 16)?;
    sheet.set_column_width(1, 40)?;
    sheet.set_column_width(2, 40)?;
    sheet.set_column_width(3, 14)?;
    Ok(())
}

fn write_summary_sheet(
    sheet: &mut Worksheet,
    report: &BillingReport,
    header: &Format,
    money: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name(SUMMARY_SHEET)?;
    write_headers(sheet, &SUMMARY_HEADERS, header)?;

    let rows = report
        .summary
        .iter()
        .chain(std::iter::once(&report.grand_total));
    for (i, row) in rows.enumerate() {
        write_summary_row(sheet, (i + 1) as u32, row, money)?;
    }

    sheet.set_column_width(0, 40)?;
    sheet.set_column_width(1, 12)?;
    sheet.set_column_width(2, 14)?;
    Ok(())
}

fn write_summary_row(
    sheet: &mut Worksheet,
    r: u32,
    row: &SummaryRow,
    money: &Format,
) -> Result<(), XlsxError> {
    write_opt_string(sheet, r, 0, row.dentist.as_deref())?;
    sheet.write_number(r, 1, row.guide_count as f64)?;
    sheet.write_number_with_format(r, 2, to_f64(row.total_amount), money)?;
    Ok(())
}

fn write_flat_sheet(
    sheet: &mut Worksheet,
    report: &BillingReport,
    header: &Format,
    money: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name(FLAT_SHEET)?;
    write_headers(sheet, &RECORD_HEADERS, header)?;

    for (i, record) in report.records.iter().enumerate() {
        let r = (i + 1) as u32;
        write_opt_string(sheet, r, 0, record.guide_number.as_deref())?;
        write_opt_string(sheet, r, 1, record.dentist.as_deref())?;
        write_opt_string(sheet, r, 2, record.beneficiary_name.as_deref())?;
        // unparsable amounts stay blank rather than showing as zero
        if let Some(amount) = record.guide_amount_raw.as_deref().and_then(parse_amount) {
            sheet.write_number_with_format(r, 3, to_f64(amount), money)?;
        }
    }

    sheet.set_column_width(0, 16)?;
    sheet.set_column_width(1, 40)?;
    sheet.set_column_width(2, 40)?;
    sheet.set_column_width(3, 14)?;
    Ok(())
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, format)?;
    }
    Ok(())
}

fn write_opt_string(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<&str>,
) -> Result<(), XlsxError> {
    if let Some(v) = value {
        sheet.write_string(row, col, v)?;
    }
    Ok(())
}

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or_default()
}
