use chrono::NaiveDate;
use rust_xlsxwriter::{Color, DocProperties, ExcelDateTime, Format, FormatBorder, Workbook};

use super::Exporter;
use crate::data::model::{CellValue, Table};
use crate::error::ExportResult;

pub const SHEET_NAME: &str = "Sales Data";

/// Single-sheet workbook. Numbers are written as numeric cells and dates as
/// date serials with a `yyyy-mm-dd` number format.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxExporter;

impl Exporter for XlsxExporter {
    fn export(&self, table: &Table) -> ExportResult<Vec<u8>> {
        table.check_shape()?;

        let mut workbook = Workbook::new();
        // Pin the document timestamp so identical tables give identical files.
        let properties =
            DocProperties::new().set_creation_datetime(&ExcelDateTime::from_ymd(2000, 1, 1)?);
        workbook.set_properties(&properties);

        let header_format = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0xDCDCDC))
            .set_border(FormatBorder::Thin);
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col_idx, header) in table.columns().iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
        }

        for (row_idx, record) in table.records().iter().enumerate() {
            let row = (row_idx + 1) as u32;
            for (col_idx, cell) in table.row_cells(record).enumerate() {
                let col = col_idx as u16;
                match cell {
                    CellValue::Integer(_) | CellValue::Float(_) => {
                        worksheet.write_number(row, col, cell.as_f64().unwrap_or_default())?;
                    }
                    CellValue::Date(d) => {
                        worksheet.write_number_with_format(row, col, excel_serial(d), &date_format)?;
                    }
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(row, col, b)?;
                    }
                    CellValue::Text(s) => {
                        worksheet.write_string(row, col, s)?;
                    }
                    CellValue::Null => {
                        worksheet.write_string(row, col, "")?;
                    }
                }
            }
        }

        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofit();

        Ok(workbook.save_to_buffer()?)
    }
}

/// Days since the 1900 date system epoch as Excel counts them.
fn excel_serial(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default();
    (date - epoch).num_days() as f64
}
