pub mod header;
pub mod identifier;
pub mod normalize;

use crate::model::{
    PipelineWarning, ProcessReport, RawGrid, Record, SkipReason, Stage, TableOutcome, TableReport,
};
use header::{clean_header, validate_table};
use identifier::retain_valid;
use normalize::normalize_grid;
use tracing::{debug, info, warn};

/// Run every extracted table through normalization, validation and the
/// identifier filter, accumulating surviving records in table order.
///
/// Never fails: malformed tables become [`TableOutcome::Skipped`] plus a
/// warning, and an empty result is reported as [`PipelineWarning::NoRecords`].
pub fn process_tables(grids: &[RawGrid]) -> ProcessReport {
    let mut report = ProcessReport {
        tables_detected: grids.len(),
        ..Default::default()
    };

    for (idx, grid) in grids.iter().enumerate() {
        let table = idx + 1;
        let stage = Stage::Processing {
            table,
            of: grids.len(),
        };
        debug!(%stage, "pipeline stage");

        let (source_header, result) = process_table(grid);
        let outcome = match result {
            Ok(mut records) => {
                let dropped = retain_valid(&mut records);
                let kept = records.len();
                debug!(table, kept, dropped, "table accepted");
                report.records.extend(records);
                TableOutcome::Accepted { kept, dropped }
            }
            Err(reason) => {
                warn!(table, %reason, "table skipped");
                report.warnings.push(PipelineWarning::TableSkipped {
                    table,
                    reason: reason.clone(),
                });
                TableOutcome::Skipped { reason }
            }
        };

        report.tables.push(TableReport {
            table,
            source_header,
            outcome,
        });
    }

    if report.records.is_empty() {
        warn!("no valid records found after processing");
        report.warnings.push(PipelineWarning::NoRecords);
    } else {
        info!(records = report.records.len(), "processing finished");
    }

    report
}

fn process_table(grid: &RawGrid) -> (Option<String>, Result<Vec<Record>, SkipReason>) {
    let rows = normalize_grid(grid);
    let source_header = rows
        .first()
        .map(|h| clean_header(h))
        .filter(|h| !h.is_empty());
    (source_header, validate_table(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> RawGrid {
        rows.iter()
            .map(|r| r.iter().map(|c| Some(c.to_string())).collect())
            .collect()
    }

    #[test]
    fn test_scenario_drops_non_numeric_identifier() {
        let grids = vec![grid(&[
            &["Nº", "Esp", "Cls", "Obs", "Resp", "Loc"],
            &["12", "Chair", "Furniture", "", "Alice", "RoomA"],
            &["x", "Bad", "Row", "", "Bob", "RoomB"],
        ])];
        let report = process_tables(&grids);

        assert_eq!(report.records.len(), 1);
        let r = &report.records[0];
        assert_eq!(
            r.cells(),
            ["12", "Chair", "Furniture", "", "Alice", "RoomA"]
        );
        assert_eq!(
            report.tables[0].outcome,
            TableOutcome::Accepted { kept: 1, dropped: 1 }
        );
        // filtered rows are not surfaced as warnings
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_five_column_table_warns_and_contributes_nothing() {
        let grids = vec![grid(&[
            &["Nº", "Esp", "Cls", "Resp", "Loc"],
            &["1", "Mesa", "Móvel", "Ana", "Sala 1"],
        ])];
        let report = process_tables(&grids);

        assert!(report.records.is_empty());
        assert_eq!(
            report.warnings,
            vec![
                PipelineWarning::TableSkipped {
                    table: 1,
                    reason: SkipReason::TooFewColumns { columns: 5 },
                },
                PipelineWarning::NoRecords,
            ]
        );
    }

    #[test]
    fn test_records_concatenate_in_table_order() {
        let grids = vec![
            grid(&[
                &["Nº", "Esp", "Cls", "Obs", "Resp", "Loc"],
                &["2", "Mesa", "Móvel", "", "Ana", "Sala 1"],
            ]),
            grid(&[&["only header", "", "", "", "", ""]]),
            grid(&[
                &["Nº", "Esp", "Cls", "Obs", "Resp", "Loc"],
                &["1", "Cadeira", "Móvel", "", "Bruno", "Sala 2"],
            ]),
        ];
        let report = process_tables(&grids);

        assert_eq!(report.tables_detected, 3);
        let ids: Vec<&str> = report.records.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert_eq!(
            report.tables[1].outcome,
            TableOutcome::Skipped {
                reason: SkipReason::TooFewRows { rows: 1 }
            }
        );
    }

    #[test]
    fn test_multiline_cells_normalized_before_filter() {
        let raw: RawGrid = vec![
            ["Nº\nTOMB.", "ESPECIFICAÇÃO", "CLASSIFICAÇÃO", "OBSERVAÇÃO", "RESPONSÁVEL", "LOCALIZAÇÃO"]
                .iter()
                .map(|c| Some(c.to_string()))
                .collect(),
            vec![None, None, None, None, None, None],
            vec![
                Some(" 0042 ".into()),
                Some("Mesa\nde madeira".into()),
                Some("Móvel".into()),
                None,
                Some("Ana  Lima".into()),
                Some("Sala\n3".into()),
            ],
        ];
        let report = process_tables(&[raw]);

        assert_eq!(report.records.len(), 1);
        let r = &report.records[0];
        assert_eq!(r.identifier, "0042");
        assert_eq!(r.specification, "Mesa de madeira");
        assert_eq!(r.note, "");
        assert_eq!(r.responsible, "Ana Lima");
        assert_eq!(r.location, "Sala 3");
        assert_eq!(
            report.tables[0].source_header.as_deref(),
            Some("Nº TOMB | ESPECIFICAÇÃO | CLASSIFICAÇÃO | OBSERVAÇÃO | RESPONSÁVEL | LOCALIZAÇÃO")
        );
    }

    #[test]
    fn test_no_tables_reports_no_records() {
        let report = process_tables(&[]);
        assert_eq!(report.tables_detected, 0);
        assert_eq!(report.warnings, vec![PipelineWarning::NoRecords]);
    }
}
