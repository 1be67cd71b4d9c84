use tombo_core::error::TomboError;
use tombo_core::export::ExportFormat;
use tombo_core::extraction::camelot::CamelotSource;
use tombo_core::extraction::{ExtractionOptions, Flavor};
use tombo_core::summary::Summary;
use std::path::{Path, PathBuf};

use crate::output;

pub struct ExtractArgs {
    pub input_file: PathBuf,
    pub format: Option<String>,
    pub out: Option<PathBuf>,
    pub no_export: bool,
    pub output_format: String,
    pub show_records: bool,
    pub pages: String,
    pub flavor: String,
    pub line_scale: u32,
    pub split_text: bool,
    pub strip_linebreaks: bool,
    pub camelot: PathBuf,
}

pub fn run(args: ExtractArgs) -> Result<(), TomboError> {
    let pdf_bytes = std::fs::read(&args.input_file)?;

    let options = ExtractionOptions {
        pages: args.pages.clone(),
        flavor: match args.flavor.as_str() {
            "stream" => Flavor::Stream,
            _ => Flavor::Lattice,
        },
        split_text: args.split_text,
        strip_linebreaks: args.strip_linebreaks,
        line_scale: args.line_scale,
    };
    let source = CamelotSource::with_program(&args.camelot);
    let report = tombo_core::process_pdf(&pdf_bytes, &source, &options)?;

    eprintln!("{} table(s) detected", report.tables_detected);
    for w in &report.warnings {
        eprintln!("  warning: {w}");
    }
    if report.records.is_empty() {
        return Ok(());
    }

    let summary = Summary::of(&report.records);
    match args.output_format.as_str() {
        "json" => output::json::print_report(&report, &summary)?,
        _ => output::table::print_summary(&summary, args.show_records.then_some(&report.records[..])),
    }

    if args.no_export {
        return Ok(());
    }

    let format = resolve_format(args.format.as_deref(), args.out.as_deref());
    let export = tombo_core::export_report(&report, format)?;
    let path = resolve_out_path(args.out.as_deref(), &export.file_name());
    std::fs::write(&path, &export.bytes)?;
    eprintln!(
        "Exported {} record(s) as {} ({}), written to {}",
        report.records.len(),
        format,
        export.media_type(),
        path.display()
    );

    Ok(())
}

/// Explicit `--format` wins, then the extension of `--out`, then xlsx.
fn resolve_format(explicit: Option<&str>, out: Option<&Path>) -> ExportFormat {
    explicit
        .and_then(ExportFormat::from_str_loose)
        .or_else(|| out.and_then(ExportFormat::from_path))
        .unwrap_or_default()
}

fn resolve_out_path(out: Option<&Path>, file_name: &str) -> PathBuf {
    match out {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}
