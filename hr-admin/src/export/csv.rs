//! CSV export
//!
//! `;` separated, every field quoted, CRLF line ends. A UTF-8 BOM goes
//! first so spreadsheet apps pick the right encoding for accents.

use crate::employees::schema::{ActiveLabel, COLUMNS, row_cells};
use shared::models::Employee;

const BOM: &str = "\u{FEFF}";
const SEPARATOR: &str = ";";
const LINE_END: &str = "\r\n";

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn line(out: &mut String, fields: impl IntoIterator<Item = impl AsRef<str>>) {
    let quoted: Vec<String> = fields.into_iter().map(|f| quote(f.as_ref())).collect();
    out.push_str(&quoted.join(SEPARATOR));
    out.push_str(LINE_END);
}

pub fn write(rows: &[Employee]) -> Vec<u8> {
    let mut out = String::from(BOM);
    line(&mut out, COLUMNS.iter().map(|c| c.header));
    for employee in rows {
        line(&mut out, row_cells(employee, ActiveLabel::YesNo));
    }
    out.into_bytes()
}
