use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::{debug, info};

use super::model::{CellValue, Field, Record, Schema, Table};
use crate::error::{LoadError, RowError};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// What happened to the input rows while building the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows read after the header, including the ones skipped.
    pub rows_read: usize,
    /// Copies of the header found mid-file.
    pub repeated_headers: usize,
    /// Rows left out because a required value could not be coerced.
    pub dropped: usize,
}

/// A freshly loaded table plus its [`LoadReport`].
#[derive(Debug, Clone)]
pub struct Loaded {
    pub table: Table,
    pub report: LoadReport,
}

/// Load a sales table from a delimited text file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma separated
/// * `.tsv` / `.tab` – tab separated
pub fn load_file(path: &Path) -> Result<Loaded, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let delimiter = match ext.as_str() {
        "csv" | "txt" => b',',
        "tsv" | "tab" => b'\t',
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = load_reader(file, delimiter)?;

    info!(
        "Loaded {} rows from {} ({} repeated headers, {} dropped), columns {:?}",
        loaded.table.len(),
        path.display(),
        loaded.report.repeated_headers,
        loaded.report.dropped,
        loaded.table.columns()
    );
    Ok(loaded)
}

/// Build a table from any reader of delimited text with a header row.
///
/// Rows whose Date, Sales or Quantity cannot be coerced are dropped whole.
pub fn load_reader<R: Read>(reader: R, delimiter: u8) -> Result<Loaded, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let schema = Schema::from_headers(&headers)?;

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        report.rows_read += 1;

        if is_repeated_header(&row, &headers, &schema) {
            debug!("row {row_no}: skipping repeated header");
            report.repeated_headers += 1;
            continue;
        }

        match parse_record(&row, &schema) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!("row {row_no}: dropped, {e}");
                report.dropped += 1;
            }
        }
    }

    Ok(Loaded {
        table: Table::new(schema, records),
        report,
    })
}

/// Convenience for in-memory comma separated text.
pub fn load_str(text: &str) -> Result<Loaded, LoadError> {
    load_reader(text.as_bytes(), b',')
}

// ---------------------------------------------------------------------------
// Row coercion
// ---------------------------------------------------------------------------

fn is_repeated_header(row: &csv::StringRecord, headers: &[String], schema: &Schema) -> bool {
    let all_equal = row.len() == headers.len()
        && row
            .iter()
            .zip(headers)
            .all(|(cell, header)| cell.trim() == header.trim());
    if all_equal {
        return true;
    }
    schema
        .fields()
        .iter()
        .position(|f| *f == Field::Date)
        .and_then(|idx| row.get(idx))
        .is_some_and(|cell| cell.trim() == "Date")
}

fn parse_record(row: &csv::StringRecord, schema: &Schema) -> Result<Record, RowError> {
    if row.len() > schema.len() {
        return Err(RowError::ExtraCells {
            expected: schema.len(),
            found: row.len(),
        });
    }

    let mut date = None;
    let mut region = None;
    let mut product = None;
    let mut sales = None;
    let mut quantity = None;
    let mut extra = vec![CellValue::Null; schema.extra_count()];

    for (idx, field) in schema.fields().iter().enumerate() {
        let raw = row.get(idx);
        match field {
            Field::Date => {
                let raw = raw.ok_or(RowError::MissingField("Date"))?;
                date = Some(parse_date(raw).ok_or_else(|| RowError::InvalidDate(raw.to_string()))?);
            }
            Field::Region => region = raw.map(str::to_string),
            Field::Product => product = raw.map(str::to_string),
            Field::Sales => sales = Some(parse_number(raw, "Sales")?),
            Field::Quantity => quantity = Some(parse_number(raw, "Quantity")?),
            Field::Extra(i) => {
                if let Some(raw) = raw {
                    extra[*i] = guess_cell_type(raw);
                }
            }
        }
    }

    Ok(Record {
        date: date.ok_or(RowError::MissingField("Date"))?,
        region: region.ok_or(RowError::MissingField("Region"))?,
        product: product.ok_or(RowError::MissingField("Product"))?,
        sales: sales.ok_or(RowError::MissingField("Sales"))?,
        quantity: quantity.ok_or(RowError::MissingField("Quantity"))?,
        extra,
    })
}

fn parse_number(raw: Option<&str>, column: &'static str) -> Result<f64, RowError> {
    let raw = raw.ok_or(RowError::MissingField(column))?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RowError::InvalidNumber {
            column,
            value: raw.to_string(),
        })
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d", "%b %d, %Y", "%B %d, %Y",
    "%d %b %Y", "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a calendar date from the common spellings found in exported
/// spreadsheets. Time-of-day parts are truncated.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Type a pass-through cell from its text.
fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Region,Product,Sales,Quantity\n";

    #[test]
    fn loads_typed_records() {
        let text = format!("{HEADER}2024-01-01,East,Widget,100,2\n2024-01-02,West,Gadget,50.5,1\n");
        let loaded = load_str(&text).unwrap();
        let records = loaded.table.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(records[1].region, "West");
        assert_eq!(records[1].sales, 50.5);
        assert_eq!(loaded.report, LoadReport { rows_read: 2, repeated_headers: 0, dropped: 0 });
    }

    #[test]
    fn drops_rows_that_fail_coercion() {
        let text = format!(
            "{HEADER}2024-01-01,East,Widget,100,2\n\
             not a date,East,Widget,100,2\n\
             2024-01-03,East,Widget,abc,2\n\
             2024-01-04,East,Widget,10,\n\
             2024-01-05,East,Widget,NaN,1\n\
             2024-01-06,East\n"
        );
        let loaded = load_str(&text).unwrap();
        assert_eq!(loaded.table.len(), 1);
        assert_eq!(loaded.report.dropped, 5);
    }

    #[test]
    fn rows_longer_than_the_header_are_dropped() {
        let text = format!(
            "{HEADER}2024-01-01,East,Widget,100,2\n\
             2024-01-02,West,Gadget,50,1,surplus\n"
        );
        let loaded = load_str(&text).unwrap();
        assert_eq!(loaded.table.len(), 1);
        assert_eq!(loaded.table.records()[0].region, "East");
        assert_eq!(loaded.report.dropped, 1);
    }

    #[test]
    fn row_errors_name_the_missing_field() {
        let schema = Schema::standard();
        let row = csv::StringRecord::from(vec!["2024-01-01", "East"]);
        assert_eq!(
            parse_record(&row, &schema).unwrap_err(),
            RowError::MissingField("Product")
        );
        let row = csv::StringRecord::from(vec!["2024-01-01", "East", "Widget", "1", "2", "x"]);
        assert_eq!(
            parse_record(&row, &schema).unwrap_err(),
            RowError::ExtraCells { expected: 5, found: 6 }
        );
    }

    #[test]
    fn skips_repeated_header_mid_file() {
        let text = format!("{HEADER}2024-01-01,East,Widget,100,2\n{HEADER}2024-01-02,West,Gadget,50,1\n");
        let loaded = load_str(&text).unwrap();
        assert_eq!(loaded.table.len(), 2);
        assert_eq!(loaded.report.repeated_headers, 1);
        assert_eq!(loaded.report.dropped, 0);
    }

    #[test]
    fn pass_through_columns_are_kept_and_typed() {
        let text = "Date,Region,Rep,Product,Sales,Quantity,Discount\n\
                    2024-01-01,East,Ann,Widget,100,2,0.1\n\
                    2024-01-02,West,,Gadget,50,1\n";
        let loaded = load_str(text).unwrap();
        let table = &loaded.table;
        assert_eq!(
            table.columns(),
            &["Date", "Region", "Rep", "Product", "Sales", "Quantity", "Discount"]
        );
        let first = &table.records()[0];
        assert_eq!(
            first.extra,
            vec![CellValue::Text("Ann".into()), CellValue::Float(0.1)]
        );
        let second = &table.records()[1];
        assert_eq!(second.extra, vec![CellValue::Null, CellValue::Null]);
        assert!(table.check_shape().is_ok());
    }

    #[test]
    fn missing_required_column_fails() {
        let err = load_str("Date,Region,Sales,Quantity\n2024-01-01,East,1,1\n").unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == "Product"));
    }

    #[test]
    fn missing_file_fails() {
        let err = load_file(Path::new("/definitely/not/here/sales.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn flexible_date_spellings() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 7);
        for raw in [
            "2024-03-07",
            "2024/03/07",
            "03/07/2024",
            "07.03.2024",
            "20240307",
            "2024-03-07 13:45:00",
            "2024-03-07T13:45:00.250",
            "2024-03-07T13:45:00+02:00",
            "Mar 07, 2024",
            "7 March 2024",
        ] {
            assert_eq!(parse_date(raw), expected, "{raw}");
        }
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-13-01"), None);
    }
}
