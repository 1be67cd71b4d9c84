pub mod delimited;
pub mod spreadsheet;

use crate::error::TomboError;
use crate::model::{Field, Record, FIELD_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Base name of downloaded exports.
pub const EXPORT_STEM: &str = "dados_extraidos";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Office Open XML workbook.
    #[default]
    Xlsx,
    /// Comma-separated values.
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv",
        }
    }

    pub fn file_name(self) -> String {
        format!("{EXPORT_STEM}.{}", self.extension())
    }

    pub fn from_str_loose(s: &str) -> Option<ExportFormat> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" | "spreadsheet" => Some(ExportFormat::Xlsx),
            "csv" | "delimited-text" | "text" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<ExportFormat> {
        let ext = path.extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "xlsx" => Some(ExportFormat::Xlsx),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Xlsx => write!(f, "Excel"),
            ExportFormat::Csv => write!(f, "CSV"),
        }
    }
}

/// A serialized record set ready to be saved or served.
#[derive(Debug, Clone)]
pub struct Export {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl Export {
    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }

    pub fn file_name(&self) -> String {
        self.format.file_name()
    }
}

/// Serialize all records with the fixed header row and no index column.
pub fn export_records(records: &[Record], format: ExportFormat) -> Result<Export, TomboError> {
    let bytes = match format {
        ExportFormat::Xlsx => spreadsheet::write_records(records)?,
        ExportFormat::Csv => delimited::write_records(records)?,
    };
    Ok(Export { format, bytes })
}

/// Read records back from a file written by [`export_records`].
pub fn import_records(bytes: &[u8], format: ExportFormat) -> Result<Vec<Record>, TomboError> {
    match format {
        ExportFormat::Xlsx => spreadsheet::read_records(bytes),
        ExportFormat::Csv => delimited::read_records(bytes),
    }
}

/// Check that a header row carries the fixed labels in order.
fn check_header<S: AsRef<str>>(header: &[S]) -> Result<(), TomboError> {
    let found: Vec<&str> = header.iter().map(|h| h.as_ref().trim()).collect();
    if found != Field::labels() {
        return Err(TomboError::Import(format!(
            "unexpected header [{}], expected [{}]",
            found.join(", "),
            Field::labels().join(", ")
        )));
    }
    Ok(())
}

/// Build a record from one data row of an imported file.
fn record_from_row<S: AsRef<str>>(row_number: usize, row: &[S]) -> Result<Record, TomboError> {
    if row.len() > FIELD_COUNT {
        return Err(TomboError::Import(format!(
            "row {row_number} has {} columns, expected {FIELD_COUNT}",
            row.len()
        )));
    }
    let mut cells: [String; FIELD_COUNT] = Default::default();
    for (slot, value) in cells.iter_mut().zip(row) {
        *slot = value.as_ref().to_string();
    }
    Ok(Record::from_cells(cells))
}
