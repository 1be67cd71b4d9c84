pub mod error;
pub mod export;
pub mod extraction;
pub mod model;
pub mod parsing;
pub mod summary;

use error::TomboError;
use export::{Export, ExportFormat};
use extraction::{ExtractionOptions, TableSource};
use model::{ProcessReport, RawGrid, Stage};
use tracing::{debug, warn};

/// Main API entry point: extract the tables of a PDF and turn them into
/// inventory records.
///
/// Extraction failures are fatal. Malformed tables and an empty result are
/// reported as warnings in the returned [`ProcessReport`].
pub fn process_pdf(
    pdf_bytes: &[u8],
    source: &dyn TableSource,
    options: &ExtractionOptions,
) -> Result<ProcessReport, TomboError> {
    debug!(stage = %Stage::Idle, bytes = pdf_bytes.len(), "pipeline stage");
    debug!(stage = %Stage::Extracting, backend = source.backend_name(), "pipeline stage");
    let grids = source.extract_tables(pdf_bytes, options).inspect_err(|e| {
        warn!(stage = %Stage::Failed, error = %e, "table extraction failed");
    })?;
    debug!(tables = grids.len(), "tables detected");

    Ok(process_tables(&grids))
}

/// Process grids that were already extracted.
pub fn process_tables(grids: &[RawGrid]) -> ProcessReport {
    let report = parsing::process_tables(grids);
    if !report.records.is_empty() {
        debug!(stage = %Stage::ReadyForExport, "pipeline stage");
    }
    report
}

/// Serialize the records of a finished pass.
pub fn export_report(report: &ProcessReport, format: ExportFormat) -> Result<Export, TomboError> {
    let export = export::export_records(&report.records, format).inspect_err(|e| {
        warn!(stage = %Stage::Failed, error = %e, "export failed");
    })?;
    debug!(stage = %Stage::Exported, bytes = export.bytes.len(), "pipeline stage");
    Ok(export)
}
