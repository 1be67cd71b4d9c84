#[derive(Debug, thiserror::Error)]
pub enum TomboError {
    #[error("table extraction failed: {0}")]
    Extraction(String),

    #[error("camelot not found. Install it with: pip install \"camelot-py[base]\" (or set TOMBO_CAMELOT to its path)")]
    CamelotNotFound,

    #[error("camelot failed with exit code {code}: {stderr}")]
    CamelotFailed { code: i32, stderr: String },

    #[error("export failed: {0}")]
    Export(String),

    #[error("failed to read exported file: {0}")]
    Import(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
