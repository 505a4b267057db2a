use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run, Style, StyleType, TableCell, TableRow};

use super::{Exporter, REPORT_TITLE};
use crate::data::model::Table;
use crate::error::{ExportError, ExportResult};

const TITLE_STYLE: &str = "Title";

/// Word document with a title paragraph followed by one table: the header
/// row first, then one row per record with every cell as display text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExporter;

impl Exporter for DocxExporter {
    fn export(&self, table: &Table) -> ExportResult<Vec<u8>> {
        table.check_shape()?;

        let mut rows = Vec::with_capacity(table.len() + 1);
        rows.push(TableRow::new(
            table
                .columns()
                .iter()
                .map(|name| text_cell(name, true))
                .collect(),
        ));
        for record in table.records() {
            rows.push(TableRow::new(
                table
                    .row_cells(record)
                    .map(|cell| text_cell(&cell.to_string(), false))
                    .collect(),
            ));
        }

        let title_style = Style::new(TITLE_STYLE, StyleType::Paragraph)
            .name(TITLE_STYLE)
            .size(56)
            .bold();
        let title = Paragraph::new()
            .add_run(Run::new().add_text(REPORT_TITLE))
            .style(TITLE_STYLE);

        let mut buffer = Cursor::new(Vec::new());
        Docx::new()
            .add_style(title_style)
            .add_paragraph(title)
            .add_table(docx_rs::Table::new(rows))
            .build()
            .pack(&mut buffer)
            .map_err(|e| ExportError::Docx(Box::new(e)))?;
        Ok(buffer.into_inner())
    }
}

fn text_cell(text: &str, header: bool) -> TableCell {
    let run = Run::new().add_text(text);
    let run = if header { run.bold() } else { run };
    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
}
