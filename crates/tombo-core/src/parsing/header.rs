use crate::model::{Record, SkipReason, FIELD_COUNT};
use regex::Regex;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

/// Tidy a source header cell for display: every run of non-word characters
/// becomes one space.
pub fn clean_header_cell(raw: &str) -> String {
    NON_WORD.replace_all(raw, " ").trim().to_string()
}

/// Join the cleaned header cells of a table, skipping empty ones.
pub fn clean_header(row: &[String]) -> String {
    row.iter()
        .map(|c| clean_header_cell(c))
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Check the shape of a normalized table and relabel its data rows with the
/// fixed inventory schema.
///
/// The first row is the header candidate and is never emitted. Tables with
/// fewer than two rows or fewer than six columns are skipped; tables whose
/// data rows are not exactly six columns wide are rejected as malformed.
pub fn validate_table(rows: &[Vec<String>]) -> Result<Vec<Record>, SkipReason> {
    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);

    if rows.len() < 2 {
        return Err(SkipReason::TooFewRows { rows: rows.len() });
    }
    if columns < FIELD_COUNT {
        return Err(SkipReason::TooFewColumns { columns });
    }

    let data = &rows[1..];
    let data_columns = data.iter().map(|r| r.len()).max().unwrap_or(0);
    if data_columns != FIELD_COUNT {
        return Err(SkipReason::ColumnMismatch {
            columns: data_columns,
        });
    }

    Ok(data.iter().map(|row| relabel(row)).collect())
}

fn relabel(row: &[String]) -> Record {
    let mut cells: [String; FIELD_COUNT] = Default::default();
    for (slot, value) in cells.iter_mut().zip(row) {
        *slot = value.clone();
    }
    Record::from_cells(cells)
}
