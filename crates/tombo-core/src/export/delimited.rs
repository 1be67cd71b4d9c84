use crate::error::TomboError;
use crate::export::{check_header, record_from_row};
use crate::model::{Field, Record};

pub fn write_records(records: &[Record]) -> Result<Vec<u8>, TomboError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(Field::labels())?;
    for record in records {
        writer.write_record(record.cells())?;
    }
    writer
        .into_inner()
        .map_err(|e| TomboError::Export(e.error().to_string()))
}

pub fn read_records(bytes: &[u8]) -> Result<Vec<Record>, TomboError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    check_header(&header)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row?;
        let cells: Vec<&str> = row.iter().collect();
        // row 1 is the header
        records.push(record_from_row(i + 2, &cells)?);
    }
    Ok(records)
}
