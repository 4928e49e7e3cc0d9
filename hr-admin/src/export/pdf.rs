//! PDF export
//!
//! Hand-built PDF 1.4: A4 landscape, the two standard Helvetica faces with
//! WinAnsi encoding, uncompressed content streams. Text goes through
//! WINDOWS-1252; characters outside it print as `?`.

use super::ExportOptions;
use crate::employees::schema::{ActiveLabel, COLUMNS, ColumnKey, row_cells};
use chrono::NaiveDateTime;
use shared::models::{Employee, EmployeeStats};

pub const PAGE_WIDTH: f32 = 842.0;
pub const PAGE_HEIGHT: f32 = 595.0;
const MARGIN: f32 = 36.0;
const HEADER_BAND: f32 = 78.0;
const FIRST_TABLE_TOP: f32 = 490.0;
const NEXT_TABLE_TOP: f32 = PAGE_HEIGHT - MARGIN;
const TABLE_BOTTOM: f32 = 50.0;
const HEADER_ROW: f32 = 20.0;
const BODY_ROW: f32 = 18.0;
const CELL_PAD: f32 = 4.0;

const BRAND: (u8, u8, u8) = (25, 118, 210);
const STRIPE: (u8, u8, u8) = (245, 245, 245);
const TEXT: (u8, u8, u8) = (33, 33, 33);
const MUTED: (u8, u8, u8) = (117, 117, 117);
const WHITE: (u8, u8, u8) = (255, 255, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    fn base_font(&self) -> &'static str {
        match self {
            Font::Regular => "Helvetica",
            Font::Bold => "Helvetica-Bold",
        }
    }
}

// Helvetica advance widths for 0x20..=0x7E, in 1/1000 em
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Encode one char to WINDOWS-1252, `?` when unmappable
fn encode_char(c: char) -> u8 {
    let mut buf = [0u8; 4];
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut buf));
    if had_errors || bytes.len() != 1 {
        b'?'
    } else {
        bytes[0]
    }
}

pub fn encode_win1252(s: &str) -> Vec<u8> {
    s.chars().map(encode_char).collect()
}

fn char_width(c: char, font: Font) -> u16 {
    let byte = encode_char(c);
    let table = match font {
        Font::Regular => &HELVETICA,
        Font::Bold => &HELVETICA_BOLD,
    };
    match byte {
        0x20..=0x7E => table[(byte - 0x20) as usize],
        0xB7 => 278,
        // accented Latin letters: close enough to their base glyph
        _ if c.is_uppercase() => 722,
        _ => 556,
    }
}

/// Rendered width in points
pub fn text_width(s: &str, font: Font, size: f32) -> f32 {
    s.chars().map(|c| char_width(c, font) as f32).sum::<f32>() * size / 1000.0
}

/// Cut `s` so it fits in `max` points, ending in "..." when shortened
pub fn truncate_to_width(s: &str, font: Font, size: f32, max: f32) -> String {
    if text_width(s, font, size) <= max {
        return s.to_string();
    }
    let ellipsis = text_width("...", font, size);
    let mut width = 0.0;
    let mut out = String::new();
    for c in s.chars() {
        let w = char_width(c, font) as f32 * size / 1000.0;
        if width + w + ellipsis > max {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push_str("...");
    out
}

fn escape_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7E => out.push(b as char),
            _ => out.push_str(&format!("\\{:03o}", b)),
        }
    }
    out
}

fn rgb(color: (u8, u8, u8)) -> String {
    format!(
        "{:.3} {:.3} {:.3}",
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0
    )
}

/// Page-oriented PDF command builder
///
/// Coordinates are PDF points with the origin at the bottom-left corner.
pub struct PdfBuilder {
    width: f32,
    height: f32,
    pages: Vec<String>,
    font: Font,
    size: f32,
}

impl PdfBuilder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pages: Vec::new(),
            font: Font::Regular,
            size: 10.0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn ops(&mut self) -> &mut String {
        if self.pages.is_empty() {
            self.pages.push(String::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn op(&mut self, op: String) -> &mut Self {
        let ops = self.ops();
        ops.push_str(&op);
        ops.push('\n');
        self
    }

    pub fn new_page(&mut self) -> &mut Self {
        self.pages.push(String::new());
        self
    }

    // === Graphics state ===

    pub fn fill_color(&mut self, color: (u8, u8, u8)) -> &mut Self {
        self.op(format!("{} rg", rgb(color)))
    }

    pub fn stroke_color(&mut self, color: (u8, u8, u8)) -> &mut Self {
        self.op(format!("{} RG", rgb(color)))
    }

    pub fn font(&mut self, font: Font, size: f32) -> &mut Self {
        self.font = font;
        self.size = size;
        self
    }

    // === Shapes ===

    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> &mut Self {
        self.op(format!("{:.2} {:.2} {:.2} {:.2} re f", x, y, w, h))
    }

    pub fn hline(&mut self, x1: f32, x2: f32, y: f32) -> &mut Self {
        self.op(format!("0.5 w {:.2} {:.2} m {:.2} {:.2} l S", x1, y, x2, y))
    }

    // === Text ===

    pub fn text(&mut self, x: f32, y: f32, s: &str) -> &mut Self {
        let encoded = escape_string(&encode_win1252(s));
        let (font, size) = (self.font, self.size);
        self.op(format!(
            "BT /{} {:.1} Tf {:.2} {:.2} Td ({}) Tj ET",
            font.resource(),
            size,
            x,
            y,
            encoded
        ))
    }

    pub fn text_right(&mut self, right: f32, y: f32, s: &str) -> &mut Self {
        let w = text_width(s, self.font, self.size);
        self.text(right - w, y, s)
    }

    pub fn text_center(&mut self, center: f32, y: f32, s: &str) -> &mut Self {
        let w = text_width(s, self.font, self.size);
        self.text(center - w / 2.0, y, s)
    }

    /// Serialize the document
    pub fn finish(&self) -> Vec<u8> {
        let mut pages = self.pages.clone();
        if pages.is_empty() {
            pages.push(String::new());
        }

        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let mut object = |out: &mut Vec<u8>, body: String| {
            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", offsets.len()).as_bytes());
            out.extend_from_slice(body.as_bytes());
            out.extend_from_slice(b"\nendobj\n");
        };

        // 1 catalog, 2 page tree, 3-4 fonts, then (page, content) pairs
        let first_page = 5;
        let kids: Vec<String> = (0..pages.len())
            .map(|i| format!("{} 0 R", first_page + 2 * i))
            .collect();

        object(&mut out, "<< /Type /Catalog /Pages 2 0 R >>".to_string());
        object(
            &mut out,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                pages.len()
            ),
        );
        for font in [Font::Regular, Font::Bold] {
            object(
                &mut out,
                format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    font.base_font()
                ),
            );
        }
        for (i, content) in pages.iter().enumerate() {
            object(
                &mut out,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    self.width,
                    self.height,
                    first_page + 2 * i + 1
                ),
            );
            object(
                &mut out,
                format!(
                    "<< /Length {} >>\nstream\n{}endstream",
                    content.len(),
                    content
                ),
            );
        }

        let xref_at = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
        for offset in &offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            xref_at
        ));
        out.extend_from_slice(xref.as_bytes());
        out
    }
}

// ========== Employee table ==========

struct Layout {
    x: Vec<f32>,
    widths: Vec<f32>,
}

impl Layout {
    fn new() -> Self {
        let usable = PAGE_WIDTH - 2.0 * MARGIN;
        let total: usize = COLUMNS.iter().map(|c| c.width).sum();
        let widths: Vec<f32> = COLUMNS
            .iter()
            .map(|c| usable * c.width as f32 / total as f32)
            .collect();
        let mut x = Vec::with_capacity(widths.len());
        let mut cursor = MARGIN;
        for w in &widths {
            x.push(cursor);
            cursor += w;
        }
        Self { x, widths }
    }
}

/// Row ranges per page
fn paginate(rows: usize) -> Vec<std::ops::Range<usize>> {
    let per_page = |top: f32| ((top - HEADER_ROW - TABLE_BOTTOM) / BODY_ROW).floor() as usize;
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut capacity = per_page(FIRST_TABLE_TOP);
    loop {
        let end = (start + capacity).min(rows);
        ranges.push(start..end);
        if end >= rows {
            break;
        }
        start = end;
        capacity = per_page(NEXT_TABLE_TOP);
    }
    ranges
}

fn title_block(pdf: &mut PdfBuilder, options: &ExportOptions, now: NaiveDateTime) {
    let top = PAGE_HEIGHT;
    pdf.fill_color(BRAND)
        .rect(0.0, top - HEADER_BAND, PAGE_WIDTH, HEADER_BAND)
        .fill_color(WHITE)
        .font(Font::Bold, 16.0)
        .text(MARGIN, top - 34.0, "GV · Recursos Humanos")
        .font(Font::Regular, 12.0)
        .text(MARGIN, top - 58.0, &options.title)
        .font(Font::Regular, 9.0)
        .text_right(
            PAGE_WIDTH - MARGIN,
            top - 58.0,
            &format!("Generado: {}", now.format("%d/%m/%Y %H:%M")),
        );

    if let Some(summary) = &options.filter_summary {
        pdf.fill_color(MUTED)
            .font(Font::Regular, 9.0)
            .text(MARGIN, top - HEADER_BAND - 18.0, summary);
    }
    pdf.stroke_color(MUTED)
        .hline(MARGIN, PAGE_WIDTH - MARGIN, FIRST_TABLE_TOP + 8.0);
}

fn table_header(pdf: &mut PdfBuilder, layout: &Layout, top: f32) {
    pdf.fill_color(BRAND)
        .rect(MARGIN, top - HEADER_ROW, PAGE_WIDTH - 2.0 * MARGIN, HEADER_ROW)
        .fill_color(WHITE)
        .font(Font::Bold, 9.0);
    for (i, col) in COLUMNS.iter().enumerate() {
        pdf.text(layout.x[i] + CELL_PAD, top - HEADER_ROW + 6.5, col.short_header);
    }
}

fn table_row(pdf: &mut PdfBuilder, layout: &Layout, y: f32, stripe: bool, cells: &[String]) {
    if stripe {
        pdf.fill_color(STRIPE)
            .rect(MARGIN, y - BODY_ROW, PAGE_WIDTH - 2.0 * MARGIN, BODY_ROW);
    }
    pdf.fill_color(TEXT).font(Font::Regular, 8.5);
    for (i, (col, cell)) in COLUMNS.iter().zip(cells).enumerate() {
        let max = layout.widths[i] - 2.0 * CELL_PAD;
        let text = truncate_to_width(cell, Font::Regular, 8.5, max);
        if col.key == ColumnKey::Id {
            pdf.text_right(layout.x[i] + layout.widths[i] - CELL_PAD, y - 12.5, &text);
        } else {
            pdf.text(layout.x[i] + CELL_PAD, y - 12.5, &text);
        }
    }
}

fn footer(pdf: &mut PdfBuilder, stats: &EmployeeStats, page: usize, pages: usize) {
    pdf.stroke_color(MUTED)
        .hline(MARGIN, PAGE_WIDTH - MARGIN, 34.0)
        .fill_color(MUTED)
        .font(Font::Regular, 8.0)
        .text(MARGIN, 20.0, "GV-RH · Gestión de Recursos Humanos")
        .font(Font::Bold, 8.0)
        .text_center(
            PAGE_WIDTH / 2.0,
            20.0,
            &format!(
                "Total: {}   Activos: {}   Inactivos: {}",
                stats.total, stats.active, stats.inactive
            ),
        )
        .font(Font::Regular, 8.0)
        .text_right(
            PAGE_WIDTH - MARGIN,
            20.0,
            &format!("Página {} de {}", page, pages),
        );
}

/// Render the roster table
pub fn render(rows: &[Employee], options: &ExportOptions, now: NaiveDateTime) -> Vec<u8> {
    let layout = Layout::new();
    let stats = EmployeeStats::from_rows(rows);
    let ranges = paginate(rows.len());
    let total_pages = ranges.len();

    let mut pdf = PdfBuilder::new(PAGE_WIDTH, PAGE_HEIGHT);
    for (page, range) in ranges.into_iter().enumerate() {
        pdf.new_page();
        let top = if page == 0 {
            title_block(&mut pdf, options, now);
            FIRST_TABLE_TOP
        } else {
            NEXT_TABLE_TOP
        };
        table_header(&mut pdf, &layout, top);

        let mut y = top - HEADER_ROW;
        for (n, employee) in rows[range].iter().enumerate() {
            let cells = row_cells(employee, ActiveLabel::Status);
            table_row(&mut pdf, &layout, y, n % 2 == 1, &cells);
            y -= BODY_ROW;
        }
        footer(&mut pdf, &stats, page + 1, total_pages);
    }

    tracing::debug!(rows = rows.len(), pages = total_pages, "PDF rendered");
    pdf.finish()
}
