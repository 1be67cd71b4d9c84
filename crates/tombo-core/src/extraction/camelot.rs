use crate::error::TomboError;
use crate::extraction::{ExtractionOptions, Flavor, TableSource};
use crate::model::RawGrid;
use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Stem camelot prefixes to each exported table file.
const OUTPUT_STEM: &str = "table";

/// Table source backed by the `camelot` command-line tool.
///
/// The PDF bytes are staged in a temporary file, camelot exports every
/// detected table as CSV into a temporary directory, and those files are
/// read back in page order. Both temporaries are removed on drop.
pub struct CamelotSource {
    program: PathBuf,
    staging_dir: Option<PathBuf>,
}

impl CamelotSource {
    pub fn new() -> Self {
        Self::with_program("camelot")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        CamelotSource {
            program: program.into(),
            staging_dir: None,
        }
    }

    /// Stage temporaries under `dir` instead of the system temp directory.
    pub fn staging_in(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    fn staging_root(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    fn build_args(pdf_path: &Path, output_path: &Path, options: &ExtractionOptions) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--pages".into(),
            options.pages.clone().into(),
            "--format".into(),
            "csv".into(),
            "--output".into(),
            output_path.into(),
        ];
        if options.split_text {
            args.push("--split_text".into());
        }
        if options.strip_linebreaks {
            args.push("--strip_text".into());
            args.push("\n".into());
        }
        args.push(options.flavor.to_string().into());
        if options.flavor == Flavor::Lattice {
            args.push("--line_scale".into());
            args.push(options.line_scale.to_string().into());
        }
        args.push(pdf_path.into());
        args
    }
}

impl Default for CamelotSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSource for CamelotSource {
    fn extract_tables(
        &self,
        pdf_bytes: &[u8],
        options: &ExtractionOptions,
    ) -> Result<Vec<RawGrid>, TomboError> {
        let root = self.staging_root();
        // camelot refuses input without a .pdf extension
        let mut staged = tempfile::Builder::new()
            .prefix("tombo-")
            .suffix(".pdf")
            .tempfile_in(&root)
            .map_err(|e| TomboError::Extraction(e.to_string()))?;
        staged
            .write_all(pdf_bytes)
            .and_then(|_| staged.flush())
            .map_err(|e| TomboError::Extraction(e.to_string()))?;

        let out_dir = tempfile::Builder::new()
            .prefix("tombo-")
            .tempdir_in(&root)
            .map_err(|e| TomboError::Extraction(e.to_string()))?;
        let output_path = out_dir.path().join(format!("{OUTPUT_STEM}.csv"));

        let args = Self::build_args(staged.path(), &output_path, options);
        debug!(program = %self.program.display(), ?args, "running camelot");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TomboError::CamelotNotFound
                } else {
                    TomboError::Extraction(format!("camelot failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(TomboError::CamelotFailed { code, stderr });
        }

        let mut files: Vec<((usize, usize), PathBuf)> = Vec::new();
        for entry in std::fs::read_dir(out_dir.path())? {
            let path = entry?.path();
            let position = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(parse_table_file_name);
            if let Some(position) = position {
                files.push((position, path));
            }
        }
        files.sort_by_key(|(position, _)| *position);
        debug!(tables = files.len(), "camelot exported tables");

        let mut grids = Vec::with_capacity(files.len());
        for (_, path) in &files {
            let file = std::fs::File::open(path)?;
            grids.push(read_grid(file)?);
        }

        Ok(grids)
    }

    fn backend_name(&self) -> &str {
        "camelot"
    }
}

/// Parse `table-page-<p>-table-<t>.csv` into `(p, t)`.
fn parse_table_file_name(name: &str) -> Option<(usize, usize)> {
    let rest = name.strip_prefix(OUTPUT_STEM)?.strip_prefix("-page-")?;
    let rest = rest.strip_suffix(".csv")?;
    let (page, table) = rest.split_once("-table-")?;
    Some((page.parse().ok()?, table.parse().ok()?))
}

/// Read one exported table. Empty cells become missing cells.
fn read_grid<R: Read>(reader: R) -> Result<RawGrid, TomboError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut grid = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        grid.push(
            row.iter()
                .map(|cell| {
                    if cell.is_empty() {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_file_name() {
        assert_eq!(parse_table_file_name("table-page-1-table-2.csv"), Some((1, 2)));
        assert_eq!(parse_table_file_name("table-page-12-table-1.csv"), Some((12, 1)));
        assert_eq!(parse_table_file_name("table.csv"), None);
        assert_eq!(parse_table_file_name("other-page-1-table-1.csv"), None);
        assert_eq!(parse_table_file_name("table-page-1-table-1.json"), None);
    }

    #[test]
    fn test_file_order_is_numeric() {
        let mut names = vec![
            "table-page-10-table-1.csv",
            "table-page-2-table-2.csv",
            "table-page-2-table-1.csv",
        ];
        names.sort_by_key(|n| parse_table_file_name(n));
        assert_eq!(
            names,
            vec![
                "table-page-2-table-1.csv",
                "table-page-2-table-2.csv",
                "table-page-10-table-1.csv",
            ]
        );
    }

    #[test]
    fn test_read_grid_marks_empty_cells_missing() {
        let data = "\"Nº\",\"Esp\"\n\"12\",\"\"\n";
        let grid = read_grid(data.as_bytes()).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0][0].as_deref(), Some("Nº"));
        assert_eq!(grid[1][1], None);
    }

    #[test]
    fn test_read_grid_keeps_quoted_newlines() {
        let data = "\"Mesa\nde madeira\",\"x\"\n";
        let grid = read_grid(data.as_bytes()).unwrap();
        assert_eq!(grid[0][0].as_deref(), Some("Mesa\nde madeira"));
    }

    #[test]
    fn test_build_args_lattice_defaults() {
        let args = CamelotSource::build_args(
            Path::new("/tmp/in.pdf"),
            Path::new("/tmp/out/table.csv"),
            &ExtractionOptions::default(),
        );
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "--pages",
                "all",
                "--format",
                "csv",
                "--output",
                "/tmp/out/table.csv",
                "--split_text",
                "--strip_text",
                "\n",
                "lattice",
                "--line_scale",
                "40",
                "/tmp/in.pdf",
            ]
        );
    }

    #[test]
    fn test_build_args_stream_has_no_line_scale() {
        let options = ExtractionOptions {
            flavor: Flavor::Stream,
            split_text: false,
            strip_linebreaks: false,
            ..Default::default()
        };
        let args = CamelotSource::build_args(Path::new("in.pdf"), Path::new("out.csv"), &options);
        assert!(args.iter().all(|a| a != "--line_scale"));
        assert!(args.iter().all(|a| a != "--split_text"));
        assert_eq!(args[args.len() - 2], "stream");
    }

    #[test]
    fn test_build_args_start_with_group_options() {
        let args = CamelotSource::build_args(
            Path::new("in.pdf"),
            Path::new("out.csv"),
            &ExtractionOptions::default(),
        );
        // --quiet takes a value in camelot's CLI and would swallow --pages
        assert!(args.iter().all(|a| a != "--quiet"));
        assert_eq!(args[0], "--pages");
    }

    fn staging_entries(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_missing_program_is_reported_and_cleaned_up() {
        let staging = tempfile::tempdir().unwrap();
        let source =
            CamelotSource::with_program("/nonexistent/tombo-camelot").staging_in(staging.path());
        let result = source.extract_tables(b"%PDF-1.4", &ExtractionOptions::default());
        assert!(matches!(result, Err(TomboError::CamelotNotFound)));
        assert!(staging_entries(staging.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_run_is_reported_and_cleaned_up() {
        let staging = tempfile::tempdir().unwrap();
        let source = CamelotSource::with_program("false").staging_in(staging.path());
        let result = source.extract_tables(b"%PDF-1.4", &ExtractionOptions::default());
        assert!(matches!(result, Err(TomboError::CamelotFailed { code: 1, .. })));
        assert!(staging_entries(staging.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_run_is_cleaned_up() {
        // `true` exits 0 without exporting anything
        let staging = tempfile::tempdir().unwrap();
        let source = CamelotSource::with_program("true").staging_in(staging.path());
        let grids = source
            .extract_tables(b"%PDF-1.4", &ExtractionOptions::default())
            .unwrap();
        assert!(grids.is_empty());
        assert!(staging_entries(staging.path()).is_empty());
    }
}
