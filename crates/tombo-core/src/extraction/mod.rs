pub mod camelot;

use crate::error::TomboError;
use crate::model::RawGrid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Table detection strategy of the extraction backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// Cells are delimited by visible ruling lines.
    #[default]
    Lattice,
    /// Cells are inferred from whitespace between words.
    Stream,
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flavor::Lattice => write!(f, "lattice"),
            Flavor::Stream => write!(f, "stream"),
        }
    }
}

/// Options forwarded to the table source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOptions {
    /// Page selection such as `all`, `1`, `1,3-5`.
    pub pages: String,
    pub flavor: Flavor,
    /// Split text spanning several cells into each cell.
    pub split_text: bool,
    /// Remove line breaks from cell text.
    pub strip_linebreaks: bool,
    /// Ruling-line sensitivity (lattice only).
    pub line_scale: u32,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        ExtractionOptions {
            pages: "all".into(),
            flavor: Flavor::Lattice,
            split_text: true,
            strip_linebreaks: true,
            line_scale: 40,
        }
    }
}

/// Trait for table detection backends.
pub trait TableSource: Send + Sync {
    /// Detect tables in PDF bytes, returning one grid per table in page order.
    fn extract_tables(
        &self,
        pdf_bytes: &[u8],
        options: &ExtractionOptions,
    ) -> Result<Vec<RawGrid>, TomboError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
