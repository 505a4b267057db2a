//! Core of the sales dashboard: load a sales table, filter it, aggregate it
//! and export the filtered rows. The desktop UI in the binary is a thin layer
//! over these functions.

pub mod data;
pub mod error;
pub mod export;

pub use data::aggregate::{format_currency, group_sum, summarize, GroupKey, GroupValue, Summary};
pub use data::filter::{apply, Criteria, DateRange};
pub use data::loader::{load_file, load_reader, load_str, LoadReport, Loaded};
pub use data::model::{CellValue, Field, Record, Schema, Table};
pub use error::{ExportError, LoadError, RowError};
pub use export::{ExportFormat, Exporter};
