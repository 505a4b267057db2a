//! Export layer: one converter per downloadable format.
//!
//! Every exporter takes a filtered [`Table`] and returns the complete file
//! as bytes, with every row and every column in table order. A ragged table
//! is rejected up front; an empty table yields a header-only document.

pub mod delimited;
pub mod docx;
pub mod pdf;
pub mod xlsx;

use std::fmt;

use log::info;

use crate::data::model::Table;
use crate::error::ExportResult;

/// Title used by the document formats.
pub const REPORT_TITLE: &str = "Filtered Sales Report";

/// Converts a table into one file format.
pub trait Exporter {
    fn export(&self, table: &Table) -> ExportResult<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
    Docx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Csv,
        ExportFormat::Xlsx,
        ExportFormat::Pdf,
        ExportFormat::Docx,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    /// Human readable name for menus and dialogs.
    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
            ExportFormat::Pdf => "PDF",
            ExportFormat::Docx => "Word",
        }
    }

    /// Suggested download name, e.g. `filtered_data.xlsx`.
    pub fn file_name(self) -> String {
        format!("filtered_data.{}", self.extension())
    }

    pub fn exporter(self) -> &'static dyn Exporter {
        match self {
            ExportFormat::Csv => &delimited::CsvExporter,
            ExportFormat::Xlsx => &xlsx::XlsxExporter,
            ExportFormat::Pdf => &pdf::PdfExporter,
            ExportFormat::Docx => &docx::DocxExporter,
        }
    }

    /// Run the exporter for this format.
    pub fn export(self, table: &Table) -> ExportResult<Vec<u8>> {
        let bytes = self.exporter().export(table)?;
        info!(
            "Exported {} rows as {} ({} bytes)",
            table.len(),
            self.label(),
            bytes.len()
        );
        Ok(bytes)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_metadata() {
        assert_eq!(ExportFormat::Csv.file_name(), "filtered_data.csv");
        assert_eq!(ExportFormat::Pdf.media_type(), "application/pdf");
        assert!(ExportFormat::Docx.media_type().ends_with("wordprocessingml.document"));
        assert_eq!(ExportFormat::Xlsx.to_string(), "xlsx");
    }
}
