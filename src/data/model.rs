use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{ExportError, LoadError};

/// Display / export format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// CellValue – a single cell as it appears in an export
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::Null => {}
        }
    }
}

/// The display string every exporter writes for a cell.
/// Null renders as an empty cell.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell, for writers that store typed numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Schema – ordered columns and which record field each one holds
// ---------------------------------------------------------------------------

/// Where the value of a column lives inside a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Region,
    Product,
    Sales,
    Quantity,
    /// The n-th pass-through column, in source order.
    Extra(usize),
}

/// Required header names and the field each maps to.
pub const REQUIRED_COLUMNS: [(&str, Field); 5] = [
    ("Date", Field::Date),
    ("Region", Field::Region),
    ("Product", Field::Product),
    ("Sales", Field::Sales),
    ("Quantity", Field::Quantity),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<String>,
    fields: Vec<Field>,
    extra_count: usize,
}

impl Schema {
    /// Resolve a header row. Names are matched after trimming; when a required
    /// name repeats, the first occurrence wins and the rest pass through.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self, LoadError> {
        let mut fields = Vec::with_capacity(headers.len());
        let mut seen: Vec<Field> = Vec::new();
        let mut extra_count = 0;

        for header in headers {
            let name = header.as_ref().trim();
            let required = REQUIRED_COLUMNS
                .iter()
                .find(|(col, field)| *col == name && !seen.contains(field))
                .map(|(_, field)| *field);
            match required {
                Some(field) => {
                    seen.push(field);
                    fields.push(field);
                }
                None => {
                    fields.push(Field::Extra(extra_count));
                    extra_count += 1;
                }
            }
        }

        if let Some((missing, _)) = REQUIRED_COLUMNS
            .iter()
            .find(|(_, field)| !seen.contains(field))
        {
            return Err(LoadError::MissingColumn((*missing).to_string()));
        }

        Ok(Schema {
            columns: headers.iter().map(|h| h.as_ref().trim().to_string()).collect(),
            fields,
            extra_count,
        })
    }

    /// The five required columns in their canonical order, nothing else.
    pub fn standard() -> Self {
        Schema {
            columns: REQUIRED_COLUMNS.iter().map(|(c, _)| c.to_string()).collect(),
            fields: REQUIRED_COLUMNS.iter().map(|(_, f)| *f).collect(),
            extra_count: 0,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of pass-through columns every record must carry.
    pub fn extra_count(&self) -> usize {
        self.extra_count
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Record – one sales transaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub region: String,
    pub product: String,
    pub sales: f64,
    pub quantity: f64,
    /// Pass-through cells, in the order of the schema's extra columns.
    pub extra: Vec<CellValue>,
}

impl Record {
    pub fn new(
        date: NaiveDate,
        region: impl Into<String>,
        product: impl Into<String>,
        sales: f64,
        quantity: f64,
    ) -> Self {
        Record {
            date,
            region: region.into(),
            product: product.into(),
            sales,
            quantity,
            extra: Vec::new(),
        }
    }

    pub fn with_extra(mut self, extra: Vec<CellValue>) -> Self {
        self.extra = extra;
        self
    }

    /// The cell for one column. Quantities that are whole numbers come back
    /// as integers so they display without a fraction.
    pub fn cell(&self, field: Field) -> CellValue {
        match field {
            Field::Date => CellValue::Date(self.date),
            Field::Region => CellValue::Text(self.region.clone()),
            Field::Product => CellValue::Text(self.product.clone()),
            Field::Sales => CellValue::Float(self.sales),
            Field::Quantity => whole_or_float(self.quantity),
            Field::Extra(i) => self.extra.get(i).cloned().unwrap_or(CellValue::Null),
        }
    }
}

fn whole_or_float(v: f64) -> CellValue {
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        CellValue::Integer(v as i64)
    } else {
        CellValue::Float(v)
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded (or filtered) dataset
// ---------------------------------------------------------------------------

/// Ordered records sharing one schema. Filtering produces a new `Table`
/// that shares the schema of its source.
#[derive(Debug, Clone)]
pub struct Table {
    schema: Arc<Schema>,
    records: Vec<Record>,
}

impl Table {
    pub fn new(schema: Schema, records: Vec<Record>) -> Self {
        Table {
            schema: Arc::new(schema),
            records,
        }
    }

    /// A table over the same columns holding `records`.
    pub fn derive(&self, records: Vec<Record>) -> Self {
        Table {
            schema: Arc::clone(&self.schema),
            records,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn distinct_regions(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.region.clone()).collect()
    }

    pub fn distinct_products(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.product.clone()).collect()
    }

    /// Earliest and latest date, or `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Every record must carry exactly one cell per column.
    pub fn check_shape(&self) -> Result<(), ExportError> {
        let expected = self.schema.len();
        let extra = self.schema.extra_count();
        for (row, record) in self.records.iter().enumerate() {
            if record.extra.len() != extra {
                return Err(ExportError::RaggedRow {
                    row,
                    expected,
                    found: expected - extra + record.extra.len(),
                });
            }
        }
        Ok(())
    }

    /// Cells of one record in column order.
    pub fn row_cells<'a>(&'a self, record: &'a Record) -> impl Iterator<Item = CellValue> + 'a {
        self.schema.fields().iter().map(move |field| record.cell(*field))
    }
}
