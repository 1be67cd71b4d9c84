use tombo_core::error::TomboError;
use tombo_core::model::ProcessReport;
use tombo_core::summary::Summary;

pub fn print_report(report: &ProcessReport, summary: &Summary) -> Result<(), TomboError> {
    let value = serde_json::json!({
        "summary": summary,
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub fn print_summary(summary: &Summary) -> Result<(), TomboError> {
    let json = serde_json::to_string_pretty(summary)?;
    println!("{json}");
    Ok(())
}
