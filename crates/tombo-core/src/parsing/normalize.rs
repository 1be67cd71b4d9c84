use crate::model::RawGrid;

/// Collapse every whitespace run (line breaks included) to one space and
/// trim both ends.
///
/// Idempotent: normalizing a normalized cell returns it unchanged.
pub fn normalize_cell(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve missing cells to the empty string and normalize the rest.
pub fn normalize_row(row: &[Option<String>]) -> Vec<String> {
    row.iter()
        .map(|cell| cell.as_deref().map(normalize_cell).unwrap_or_default())
        .collect()
}

/// A row is blank when every cell is missing or whitespace-only.
pub fn is_blank_row(row: &[Option<String>]) -> bool {
    row.iter()
        .all(|cell| cell.as_deref().map_or(true, |c| c.trim().is_empty()))
}

/// Normalize a whole grid, dropping blank rows and padding short rows to the
/// widest row so the result is rectangular.
pub fn normalize_grid(grid: &RawGrid) -> Vec<Vec<String>> {
    let width = grid.iter().map(|row| row.len()).max().unwrap_or(0);
    grid.iter()
        .filter(|row| !is_blank_row(row))
        .map(|row| {
            let mut cells = normalize_row(row);
            cells.resize(width, String::new());
            cells
        })
        .collect()
}
