use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::{Exporter, REPORT_TITLE};
use crate::data::model::Table;
use crate::error::ExportResult;

// ---------------------------------------------------------------------------
// Page geometry (points, origin bottom-left)
// ---------------------------------------------------------------------------

const MM: f32 = 72.0 / 25.4;
const PAGE_WIDTH: f32 = 210.0 * MM;
const PAGE_HEIGHT: f32 = 297.0 * MM;
const MARGIN: f32 = 10.0 * MM;
/// Rows may not extend below this line; the next row goes on a new page.
const BREAK_LINE: f32 = 20.0 * MM;
const TITLE_HEIGHT: f32 = 10.0 * MM;
const ROW_HEIGHT: f32 = 8.0 * MM;
const CELL_PADDING: f32 = 1.0 * MM;
const LINE_WIDTH: f32 = 0.2 * MM;
const TITLE_SIZE: f32 = 10.0;
const GRID_SIZE: f32 = 8.0;
const HEADER_GRAY: f32 = 220.0 / 255.0;

/// Helvetica advance widths for ' '..='~', in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Paginated grid report: a centred title, a grey bordered header row and one
/// bordered row per record. Column width is the usable page width divided by
/// the column count; a row that would cross the bottom margin starts a new
/// page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExporter;

impl Exporter for PdfExporter {
    fn export(&self, table: &Table) -> ExportResult<Vec<u8>> {
        table.check_shape()?;

        let columns = table.columns();
        let col_width = (PAGE_WIDTH - 2.0 * MARGIN) / columns.len().max(1) as f32;
        let mut canvas = Canvas::new();

        let title_width = text_width(REPORT_TITLE, TITLE_SIZE);
        canvas.text(
            (PAGE_WIDTH - title_width) / 2.0,
            baseline(canvas.y, TITLE_HEIGHT, TITLE_SIZE),
            TITLE_SIZE,
            REPORT_TITLE,
        );
        canvas.y -= TITLE_HEIGHT;

        canvas.break_if_needed(ROW_HEIGHT);
        for (i, name) in columns.iter().enumerate() {
            canvas.cell(MARGIN + i as f32 * col_width, col_width, name, true);
        }
        canvas.y -= ROW_HEIGHT;

        for record in table.records() {
            canvas.break_if_needed(ROW_HEIGHT);
            for (i, cell) in table.row_cells(record).enumerate() {
                canvas.cell(MARGIN + i as f32 * col_width, col_width, &cell.to_string(), false);
            }
            canvas.y -= ROW_HEIGHT;
        }

        canvas.into_pdf()
    }
}

// ---------------------------------------------------------------------------
// Canvas – content operations per page plus a vertical cursor
// ---------------------------------------------------------------------------

struct Canvas {
    pages: Vec<Vec<Operation>>,
    /// Top edge of the next thing drawn on the current page.
    y: f32,
}

impl Canvas {
    fn new() -> Self {
        Canvas {
            pages: vec![page_prelude()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        // `pages` starts with one entry and only grows
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn break_if_needed(&mut self, height: f32) {
        if self.y - height < BREAK_LINE {
            self.pages.push(page_prelude());
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn text(&mut self, x: f32, baseline: f32, size: f32, text: &str) {
        let ops = self.ops();
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), baseline.into()]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]));
        ops.push(Operation::new("ET", vec![]));
    }

    /// One bordered grid cell whose top edge is the cursor.
    fn cell(&mut self, x: f32, width: f32, text: &str, header: bool) {
        let bottom = self.y - ROW_HEIGHT;
        let ops = self.ops();
        let rect = vec![x.into(), bottom.into(), width.into(), ROW_HEIGHT.into()];
        if header {
            ops.push(Operation::new("g", vec![HEADER_GRAY.into()]));
            ops.push(Operation::new("re", rect));
            ops.push(Operation::new("B", vec![]));
            ops.push(Operation::new("g", vec![0.0f32.into()]));
        } else {
            ops.push(Operation::new("re", rect));
            ops.push(Operation::new("S", vec![]));
        }
        let y = self.y;
        self.text(x + CELL_PADDING, baseline(y, ROW_HEIGHT, GRID_SIZE), GRID_SIZE, text);
    }

    fn into_pdf(self) -> ExportResult<Vec<u8>> {
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<ObjectId> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            kids.push(doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            }));
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids.into_iter().map(Object::from).collect::<Vec<Object>>(),
            "Resources" => resources_id,
            "MediaBox" => vec![0.0f32.into(), 0.0f32.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

fn page_prelude() -> Vec<Operation> {
    vec![Operation::new("w", vec![LINE_WIDTH.into()])]
}

/// Baseline that vertically centres a line of `size` text in a box of
/// `height` whose top edge is `top`.
fn baseline(top: f32, height: f32, size: f32) -> f32 {
    top - height / 2.0 - 0.3 * size
}

fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c {
            ' '..='~' => u32::from(HELVETICA_WIDTHS[c as usize - 32]),
            _ => 556,
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Encode for the WinAnsi standard font encoding. Characters outside
/// Latin-1 become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_cover_printable_ascii() {
        assert_eq!(HELVETICA_WIDTHS[('A' as usize) - 32], 667);
        assert_eq!(HELVETICA_WIDTHS[('~' as usize) - 32], 584);
        assert!((text_width("ii", 10.0) - 4.44).abs() < 1e-4);
    }

    #[test]
    fn non_latin_text_is_replaced() {
        assert_eq!(win_ansi("Café ✓"), vec![b'C', b'a', b'f', 0xE9, b' ', b'?']);
    }
}
