use std::fmt::Display;
use std::io::{Cursor, Write};

use calamine::{Data, Reader, Xlsx};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::TomboError;
use crate::export::{check_header, record_from_row};
use crate::model::{Field, Record};

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs></styleSheet>"#;

/// Write a single-sheet workbook: fixed header row, then one row per record.
///
/// Every cell is an inline string, so identifiers such as `0042` keep their
/// leading zeros.
pub fn write_records(records: &[Record]) -> Result<Vec<u8>, TomboError> {
    let sheet = sheet_xml(records)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", ROOT_RELS.as_bytes()),
        ("xl/workbook.xml", WORKBOOK.as_bytes()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
        ("xl/styles.xml", STYLES.as_bytes()),
        ("xl/worksheets/sheet1.xml", &sheet),
    ];
    for (name, body) in parts {
        zip.start_file(name, options).map_err(export_err)?;
        zip.write_all(body).map_err(export_err)?;
    }

    let cursor = zip.finish().map_err(export_err)?;
    Ok(cursor.into_inner())
}

fn sheet_xml(records: &[Record]) -> Result<Vec<u8>, TomboError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(export_err)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("worksheet").with_attributes([("xmlns", NS_MAIN)]),
        ))
        .map_err(export_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("sheetData")))
        .map_err(export_err)?;

    write_row(&mut writer, 1, &Field::labels())?;
    for (i, record) in records.iter().enumerate() {
        write_row(&mut writer, i + 2, &record.cells())?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("sheetData")))
        .map_err(export_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("worksheet")))
        .map_err(export_err)?;

    Ok(writer.into_inner().into_inner())
}

fn write_row<W: Write>(
    writer: &mut Writer<W>,
    row_number: usize,
    cells: &[&str],
) -> Result<(), TomboError> {
    let r = row_number.to_string();
    writer
        .write_event(Event::Start(
            BytesStart::new("row").with_attributes([("r", r.as_str())]),
        ))
        .map_err(export_err)?;

    for (col, value) in cells.iter().enumerate() {
        // absent cells read back as empty
        if value.is_empty() {
            continue;
        }
        let reference = format!("{}{}", column_letter(col), row_number);
        if let Some(c) = value.chars().find(|c| !is_xml_char(*c)) {
            return Err(TomboError::Export(format!(
                "cell {reference} contains a character not allowed in a workbook (U+{:04X})",
                c as u32
            )));
        }
        writer
            .write_event(Event::Start(BytesStart::new("c").with_attributes([
                ("r", reference.as_str()),
                ("t", "inlineStr"),
            ])))
            .map_err(export_err)?;
        writer
            .write_event(Event::Start(BytesStart::new("is")))
            .map_err(export_err)?;
        writer
            .write_event(Event::Start(
                BytesStart::new("t").with_attributes([("xml:space", "preserve")]),
            ))
            .map_err(export_err)?;
        writer
            .write_event(Event::Text(BytesText::new(value)))
            .map_err(export_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("t")))
            .map_err(export_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("is")))
            .map_err(export_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("c")))
            .map_err(export_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("row")))
        .map_err(export_err)?;
    Ok(())
}

/// Characters permitted in XML 1.0 documents.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Spreadsheet column name for a zero-based index (`0` -> `A`, `26` -> `AA`).
fn column_letter(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

fn export_err(e: impl Display) -> TomboError {
    TomboError::Export(e.to_string())
}

/// Read the first sheet of a workbook written by [`write_records`].
pub fn read_records(bytes: &[u8]) -> Result<Vec<Record>, TomboError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| TomboError::Import(format!("failed to open xlsx: {e}")))?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TomboError::Import("workbook has no sheets".into()))?
        .map_err(|e| TomboError::Import(format!("failed to read sheet: {e}")))?;

    let mut rows = sheet.rows();
    let header: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(cell_as_string).collect(),
        None => return Err(TomboError::Import("sheet is empty".into())),
    };
    check_header(&header)?;

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        let cells: Vec<String> = row.iter().map(cell_as_string).collect();
        records.push(record_from_row(i + 2, &cells)?);
    }
    Ok(records)
}

fn cell_as_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        Data::Int(i) => i.to_string(),
        _ => format!("{cell}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        vec![
            Record {
                identifier: "0042".into(),
                specification: "Mesa <grande> & larga".into(),
                classification: "Móvel".into(),
                note: "".into(),
                responsible: "Ana".into(),
                location: "Sala 1".into(),
            },
            Record {
                identifier: "43".into(),
                specification: "Cadeira".into(),
                classification: "Móvel".into(),
                note: "usada".into(),
                responsible: "Bruno".into(),
                location: "".into(),
            },
        ]
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(5), "F");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }

    #[test]
    fn test_workbook_is_a_zip_package() {
        let bytes = write_records(&sample()).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_sheet_xml_escapes_text() {
        let xml = String::from_utf8(sheet_xml(&sample()).unwrap()).unwrap();
        assert!(xml.contains(r#"<c r="A1" t="inlineStr">"#));
        assert!(xml.contains("Mesa &lt;grande&gt; &amp; larga"));
        // empty note of the first record is not written
        assert!(!xml.contains(r#"r="D2""#));
    }

    #[test]
    fn test_calamine_reads_back_records() {
        let records = sample();
        let bytes = write_records(&records).unwrap();
        assert_eq!(read_records(&bytes).unwrap(), records);
    }

    #[test]
    fn test_control_character_fails_export() {
        let mut records = sample();
        records[1].specification = "Mesa\u{2}grande".into();
        match write_records(&records) {
            Err(TomboError::Export(msg)) => {
                assert!(msg.contains("B3"));
                assert!(msg.contains("U+0002"));
            }
            other => panic!("expected export error, got {other:?}"),
        }
    }

    #[test]
    fn test_xml_char_ranges() {
        assert!(is_xml_char('\t'));
        assert!(is_xml_char('ç'));
        assert!(is_xml_char('\u{1F600}'));
        assert!(!is_xml_char('\u{0}'));
        assert!(!is_xml_char('\u{B}'));
        assert!(!is_xml_char('\u{1F}'));
        assert!(!is_xml_char('\u{FFFE}'));
    }

    #[test]
    fn test_header_only_workbook() {
        let bytes = write_records(&[]).unwrap();
        assert!(read_records(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_is_import_error() {
        assert!(matches!(
            read_records(b"not a workbook"),
            Err(TomboError::Import(_))
        ));
    }
}
