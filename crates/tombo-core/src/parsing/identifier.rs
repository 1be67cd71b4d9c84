use crate::model::Record;

/// True when the identifier is one or more ASCII digits.
pub fn is_valid_identifier(identifier: &str) -> bool {
    !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit())
}

/// Keep only records with a valid identifier. Returns how many were dropped.
pub fn retain_valid(records: &mut Vec<Record>) -> usize {
    let before = records.len();
    records.retain(|r| is_valid_identifier(&r.identifier));
    before - records.len()
}
