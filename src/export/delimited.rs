use super::Exporter;
use crate::data::model::Table;
use crate::error::{ExportError, ExportResult};

/// Comma separated text, header line first. Fields holding a comma, quote
/// or line break are quoted with doubled inner quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn export(&self, table: &Table) -> ExportResult<Vec<u8>> {
        table.check_shape()?;

        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(Vec::new());

        writer.write_record(table.columns())?;
        for record in table.records() {
            writer.write_record(table.row_cells(record).map(|cell| cell.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::{CellValue, Record, Schema};

    #[test]
    fn header_then_rows_with_escaping() {
        let schema =
            Schema::from_headers(&["Date", "Region", "Product", "Sales", "Quantity", "Note"])
                .unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let table = Table::new(
            schema,
            vec![
                Record::new(date, "East, Upper", "Widget", 100.0, 2.0)
                    .with_extra(vec![CellValue::Text("say \"hi\"".into())]),
                Record::new(date, "West", "Gadget", 12.25, 1.0).with_extra(vec![CellValue::Null]),
            ],
        );
        let text = String::from_utf8(CsvExporter.export(&table).unwrap()).unwrap();
        assert_eq!(
            text,
            "Date,Region,Product,Sales,Quantity,Note\n\
             2024-01-01,\"East, Upper\",Widget,100,2,\"say \"\"hi\"\"\"\n\
             2024-01-01,West,Gadget,12.25,1,\n"
        );
    }

    #[test]
    fn empty_table_is_header_only() {
        let table = Table::new(Schema::standard(), Vec::new());
        let text = String::from_utf8(CsvExporter.export(&table).unwrap()).unwrap();
        assert_eq!(text, "Date,Region,Product,Sales,Quantity\n");
    }
}
