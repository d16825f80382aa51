use odonto_core::error::OdontoError;
use odonto_core::model::BillingReport;

pub fn print(report: &BillingReport) -> Result<(), OdontoError> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}
