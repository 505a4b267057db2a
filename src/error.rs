use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort loading the source table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Raised when the user points at a file that does not exist.
    #[error("input file not found: {0}")]
    NotFound(PathBuf),

    /// Wrapper for I/O failures while opening or reading the file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raised when the delimited reader cannot make sense of the input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Raised for file extensions we have no reader for.
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    /// Raised when the header lacks one of Date, Region, Product, Sales, Quantity.
    #[error("missing required column '{0}'")]
    MissingColumn(String),
}

/// Why a single input row was left out of the table.
///
/// These never leave the loader; they are counted and logged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("row has no value for column '{0}'")]
    MissingField(&'static str),

    #[error("'{0}' is not a recognisable date")]
    InvalidDate(String),

    #[error("'{value}' in column {column} is not a number")]
    InvalidNumber { column: &'static str, value: String },

    #[error("row has {found} cells but the header has {expected}")]
    ExtraCells { expected: usize, found: usize },
}

/// Failures that abort a single export action.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Raised when a row does not have one cell per column.
    #[error("row {row} has {found} cells but the table has {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the PDF object writer.
    #[error("PDF write error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Raised when the Word package cannot be zipped.
    #[error("Word write error: {0}")]
    Docx(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient alias for export results.
pub type ExportResult<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn word_error_keeps_its_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = ExportError::Docx(Box::new(cause));
        assert_eq!(err.to_string(), "Word write error: disk full");
        let source = err.source().expect("cause attached");
        assert_eq!(source.to_string(), "disk full");
    }
}
