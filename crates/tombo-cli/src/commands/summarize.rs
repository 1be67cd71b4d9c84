use tombo_core::error::TomboError;
use tombo_core::export::{import_records, ExportFormat};
use tombo_core::summary::Summary;
use std::path::PathBuf;

use crate::output;

pub fn run(input_file: PathBuf, output_format: &str, show_records: bool) -> Result<(), TomboError> {
    let format = ExportFormat::from_path(&input_file).ok_or_else(|| {
        TomboError::Import(format!(
            "{}: expected a .xlsx or .csv file",
            input_file.display()
        ))
    })?;
    let bytes = std::fs::read(&input_file)?;
    let records = import_records(&bytes, format)?;
    let summary = Summary::of(&records);

    match output_format {
        "json" => output::json::print_summary(&summary)?,
        _ => output::table::print_summary(&summary, show_records.then_some(&records[..])),
    }

    Ok(())
}
