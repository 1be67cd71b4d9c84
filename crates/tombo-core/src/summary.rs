use crate::model::{Field, Record};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const TOP_RESPONSIBLE: usize = 3;
pub const TOP_VALUES: usize = 10;

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Summary statistics over a record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_records: usize,
    pub distinct_classifications: usize,
    pub distinct_responsible: usize,
    pub top_responsible: Vec<String>,
    pub top_classifications: Vec<ValueCount>,
    pub top_locations: Vec<ValueCount>,
}

impl Summary {
    pub fn of(records: &[Record]) -> Self {
        let responsible = value_counts(records, Field::Responsible);
        let classifications = value_counts(records, Field::Classification);
        let locations = value_counts(records, Field::Location);

        Summary {
            total_records: records.len(),
            distinct_classifications: classifications.len(),
            distinct_responsible: responsible.len(),
            top_responsible: responsible
                .into_iter()
                .take(TOP_RESPONSIBLE)
                .map(|vc| vc.value)
                .collect(),
            top_classifications: classifications.into_iter().take(TOP_VALUES).collect(),
            top_locations: locations.into_iter().take(TOP_VALUES).collect(),
        }
    }
}

/// Count occurrences of each value of `field`, most frequent first.
///
/// Values with equal counts keep the order in which they first appear.
pub fn value_counts(records: &[Record], field: Field) -> Vec<ValueCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ValueCount> = Vec::new();

    for record in records {
        let value = record.get(field);
        match index.get(value) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(value, counts.len());
                counts.push(ValueCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    // stable sort keeps first-seen order among ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
