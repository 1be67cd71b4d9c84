use tombo_core::model::{Field, Record};
use tombo_core::summary::{Summary, ValueCount};

pub fn print_summary(summary: &Summary, records: Option<&[Record]>) {
    println!("=== Extracted data summary ===\n");
    println!("  Total records:            {}", summary.total_records);
    println!(
        "  Distinct classifications: {}",
        na_if_zero(summary.distinct_classifications)
    );
    println!(
        "  Distinct responsible:     {}",
        na_if_zero(summary.distinct_responsible)
    );
    // a single responsible party needs no ranking
    if summary.distinct_responsible > 1 {
        println!("    Main: {}", summary.top_responsible.join(", "));
    }
    println!();

    print_counts("Most frequent classifications", &summary.top_classifications);
    print_counts("Most common locations", &summary.top_locations);

    if let Some(records) = records {
        print_records(records);
    }
}

fn na_if_zero(n: usize) -> String {
    if n == 0 {
        "N/A".to_string()
    } else {
        n.to_string()
    }
}

fn print_counts(title: &str, counts: &[ValueCount]) {
    if counts.is_empty() {
        return;
    }
    println!("{title}:");
    let width = counts
        .iter()
        .map(|vc| display_value(&vc.value).chars().count())
        .max()
        .unwrap_or(10);
    for vc in counts {
        println!(
            "  {:<width$}  {}",
            display_value(&vc.value),
            vc.count,
            width = width
        );
    }
    println!();
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(empty)"
    } else {
        value
    }
}

fn print_records(records: &[Record]) {
    let mut widths = Field::labels().map(|l| l.chars().count());
    for record in records {
        for (w, cell) in widths.iter_mut().zip(record.cells()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    println!("{}", format_row(&Field::labels(), &widths));
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
    );
    for record in records {
        println!("{}", format_row(&record.cells(), &widths));
    }
    println!();
}

fn format_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
