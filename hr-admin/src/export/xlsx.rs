//! XLSX export
//!
//! Minimal SpreadsheetML package: one sheet ("Empleados"), bold header row,
//! inline strings, numeric ID column. [`read_rows`] reads back what
//! [`write`] produces.

use super::{ExportError, ExportResult};
use crate::employees::schema::{ActiveLabel, COLUMNS, ColumnKey, row_cells};
use regex::Regex;
use shared::models::Employee;
use std::io::{Cursor, Read, Write};
use std::sync::LazyLock;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

pub const SHEET_NAME: &str = "Empleados";
const SHEET_PATH: &str = "xl/worksheets/sheet1.xml";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

// style 0: default, style 1: bold header on light grey
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FFE3F2FD"/></patternFill></fill></fills><borders count="1"><border/></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="2" borderId="0" xfId="0" applyFont="1" applyFill="1"/></cellXfs></styleSheet>"#;

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        SHEET_NAME
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// 0 -> A, 25 -> Z, 26 -> AA
fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

fn column_index(letters: &str) -> usize {
    letters
        .bytes()
        .filter(u8::is_ascii_uppercase)
        .fold(0, |acc, b| acc * 26 + (b - b'A') as usize + 1)
        .saturating_sub(1)
}

fn string_cell(out: &mut String, reference: &str, text: &str, style: u8) {
    out.push_str(&format!(
        r#"<c r="{}" s="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        reference,
        style,
        escape(text)
    ));
}

fn sheet_xml(rows: &[Employee]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cols>"#,
    );
    for (i, col) in COLUMNS.iter().enumerate() {
        xml.push_str(&format!(
            r#"<col min="{n}" max="{n}" width="{w}" customWidth="1"/>"#,
            n = i + 1,
            w = col.width + 2
        ));
    }
    xml.push_str("</cols><sheetData>");

    xml.push_str(r#"<row r="1">"#);
    for (i, col) in COLUMNS.iter().enumerate() {
        string_cell(&mut xml, &format!("{}1", column_letter(i)), col.header, 1);
    }
    xml.push_str("</row>");

    for (r, employee) in rows.iter().enumerate() {
        let row_num = r + 2;
        xml.push_str(&format!(r#"<row r="{}">"#, row_num));
        for (i, (col, value)) in COLUMNS
            .iter()
            .zip(row_cells(employee, ActiveLabel::YesNo))
            .enumerate()
        {
            let reference = format!("{}{}", column_letter(i), row_num);
            if col.key == ColumnKey::Id {
                xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value));
            } else {
                string_cell(&mut xml, &reference, &value, 0);
            }
        }
        xml.push_str("</row>");
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Build the workbook bytes
pub fn write(rows: &[Employee]) -> ExportResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buf);
        let options: FileOptions<()> =
            FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", ROOT_RELS.to_string()),
            ("xl/workbook.xml", workbook_xml()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
            ("xl/styles.xml", STYLES.to_string()),
            (SHEET_PATH, sheet_xml(rows)),
        ];
        for (name, content) in parts {
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
        }
        zip.finish()?;
    }
    Ok(buf.into_inner())
}

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<row[^>]*>(.*?)</row>").expect("valid row regex"));
static CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<c r="([A-Z]+)\d+"[^>]*?(?:/>|>(.*?)</c>)"#).expect("valid cell regex")
});
static VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<(?:t|v)[^>]*>(.*?)</(?:t|v)>").expect("valid value regex"));

/// Read the first sheet back as text rows, header included
pub fn read_rows(bytes: &[u8]) -> ExportResult<Vec<Vec<String>>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name(SHEET_PATH)
        .map_err(|_| ExportError::InvalidWorkbook(format!("missing {}", SHEET_PATH)))?
        .read_to_string(&mut xml)?;

    let rows = ROW_RE
        .captures_iter(&xml)
        .map(|row| {
            let mut cells: Vec<String> = Vec::new();
            for cell in CELL_RE.captures_iter(&row[1]) {
                let index = column_index(&cell[1]);
                let value = cell
                    .get(2)
                    .and_then(|inner| VALUE_RE.captures(inner.as_str()))
                    .map(|v| unescape(&v[1]))
                    .unwrap_or_default();
                if cells.len() <= index {
                    cells.resize(index + 1, String::new());
                }
                cells[index] = value;
            }
            cells
        })
        .collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(6), "G");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_index("A"), 0);
        assert_eq!(column_index("G"), 6);
        assert_eq!(column_index("AA"), 26);
    }

    #[test]
    fn test_round_trip() {
        let mut rows = fixtures::roster(4);
        rows[0].nombres = "Ana & <Co>".into();
        rows[2].email = None;

        let bytes = write(&rows).unwrap();
        let read = read_rows(&bytes).unwrap();

        assert_eq!(read.len(), rows.len() + 1);
        assert_eq!(read[0], COLUMNS.iter().map(|c| c.header).collect::<Vec<_>>());
        assert_eq!(read[1][2], "Ana & <Co> García");
        assert_eq!(read[3][0], "3");
        assert_eq!(read[3][4], "");
        assert_eq!(read[3][6], "No");
        for (employee, row) in rows.iter().zip(&read[1..]) {
            assert_eq!(row, &row_cells(employee, ActiveLabel::YesNo));
        }
    }

    #[test]
    fn test_package_parts() {
        let bytes = write(&fixtures::roster(1)).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        for name in ["[Content_Types].xml", "xl/workbook.xml", "xl/styles.xml", SHEET_PATH] {
            assert!(archive.by_name(name).is_ok(), "missing {name}");
        }
        assert!(matches!(
            read_rows(b"not a zip"),
            Err(ExportError::Zip(_))
        ));
    }
}
