use serde::{Deserialize, Serialize};
use std::fmt;

/// Rows of optional cells for one detected table, as handed over by a
/// [`TableSource`](crate::extraction::TableSource).
///
/// `None` marks a missing cell; it resolves to the empty string during
/// normalization.
pub type RawGrid = Vec<Vec<Option<String>>>;

/// Number of columns in the fixed inventory schema.
pub const FIELD_COUNT: usize = 6;

/// The six inventory columns, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Identifier,
    Specification,
    Classification,
    Note,
    Responsible,
    Location,
}

impl Field {
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Identifier,
        Field::Specification,
        Field::Classification,
        Field::Note,
        Field::Responsible,
        Field::Location,
    ];

    /// Header label used in exported files.
    pub fn label(self) -> &'static str {
        match self {
            Field::Identifier => "identifier",
            Field::Specification => "specification",
            Field::Classification => "classification",
            Field::Note => "note",
            Field::Responsible => "responsible",
            Field::Location => "location",
        }
    }

    pub fn labels() -> [&'static str; FIELD_COUNT] {
        Field::ALL.map(Field::label)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One inventory row after relabelling. Only records whose identifier is
/// all ASCII digits make it into a [`RecordSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub identifier: String,
    pub specification: String,
    pub classification: String,
    pub note: String,
    pub responsible: String,
    pub location: String,
}

impl Record {
    pub fn from_cells(cells: [String; FIELD_COUNT]) -> Self {
        let [identifier, specification, classification, note, responsible, location] = cells;
        Record {
            identifier,
            specification,
            classification,
            note,
            responsible,
            location,
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Identifier => &self.identifier,
            Field::Specification => &self.specification,
            Field::Classification => &self.classification,
            Field::Note => &self.note,
            Field::Responsible => &self.responsible,
            Field::Location => &self.location,
        }
    }

    /// Cell values in export order.
    pub fn cells(&self) -> [&str; FIELD_COUNT] {
        Field::ALL.map(|f| self.get(f))
    }
}

/// Records accumulated across all tables of one document, in page order.
pub type RecordSet = Vec<Record>;

/// Why a table contributed nothing to the record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SkipReason {
    /// Fewer than two non-blank rows (header plus at least one data row).
    TooFewRows { rows: usize },
    /// Narrower than the fixed schema.
    TooFewColumns { columns: usize },
    /// Data rows do not have exactly six columns.
    ColumnMismatch { columns: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewRows { rows } => write!(f, "too few rows ({rows})"),
            SkipReason::TooFewColumns { columns } => {
                write!(f, "too few columns ({columns})")
            }
            SkipReason::ColumnMismatch { columns } => {
                write!(f, "invalid structure ({columns} columns)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum TableOutcome {
    Accepted { kept: usize, dropped: usize },
    Skipped { reason: SkipReason },
}

/// Per-table diagnostics for one processing pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    /// 1-based position in extraction order.
    pub table: usize,
    /// First row of the table with punctuation collapsed, if it had one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_header: Option<String>,
    pub outcome: TableOutcome,
}

/// A non-fatal condition the user should see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PipelineWarning {
    TableSkipped { table: usize, reason: SkipReason },
    NoRecords,
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::TableSkipped { table, reason } => {
                write!(f, "table {table}: {reason}")
            }
            PipelineWarning::NoRecords => {
                write!(f, "no valid records found after processing")
            }
        }
    }
}

/// Everything one pass over a document produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessReport {
    pub tables_detected: usize,
    pub tables: Vec<TableReport>,
    pub records: RecordSet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PipelineWarning>,
}

/// Pipeline progress for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Extracting,
    Processing { table: usize, of: usize },
    ReadyForExport,
    Exported,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => write!(f, "idle"),
            Stage::Extracting => write!(f, "extracting"),
            Stage::Processing { table, of } => write!(f, "processing table {table}/{of}"),
            Stage::ReadyForExport => write!(f, "ready for export"),
            Stage::Exported => write!(f, "exported"),
            Stage::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_in_export_order() {
        assert_eq!(
            Field::labels(),
            [
                "identifier",
                "specification",
                "classification",
                "note",
                "responsible",
                "location"
            ]
        );
    }

    #[test]
    fn test_record_cells_follow_field_order() {
        let record = Record::from_cells([
            "12".into(),
            "Chair".into(),
            "Furniture".into(),
            "".into(),
            "Alice".into(),
            "RoomA".into(),
        ]);
        assert_eq!(record.get(Field::Responsible), "Alice");
        assert_eq!(record.cells()[5], "RoomA");
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Idle.to_string(), "idle");
        assert_eq!(
            Stage::Processing { table: 2, of: 5 }.to_string(),
            "processing table 2/5"
        );
    }

    #[test]
    fn test_warning_names_table() {
        let w = PipelineWarning::TableSkipped {
            table: 3,
            reason: SkipReason::ColumnMismatch { columns: 7 },
        };
        assert_eq!(w.to_string(), "table 3: invalid structure (7 columns)");
    }
}
