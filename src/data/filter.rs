use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};

use super::model::{Record, Table};

// ---------------------------------------------------------------------------
// Filter predicate: selected regions, products and an inclusive date range
// ---------------------------------------------------------------------------

/// Inclusive calendar interval. `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The active filter parameters.
///
/// Unlike an unconstrained column, an empty `regions` or `products` set
/// selects nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria {
    pub regions: BTreeSet<String>,
    pub products: BTreeSet<String>,
    pub dates: DateRange,
}

impl Criteria {
    /// Criteria that every record of `table` satisfies: all regions, all
    /// products and the table's full date span.
    ///
    /// An empty table has no span; the range collapses to today so date
    /// widgets still get an ordinary calendar day.
    pub fn covering(table: &Table) -> Self {
        let (start, end) = table.date_bounds().unwrap_or_else(|| {
            let today = Local::now().date_naive();
            (today, today)
        });
        Criteria {
            regions: table.distinct_regions(),
            products: table.distinct_products(),
            dates: DateRange::new(start, end),
        }
    }

    /// A record passes when its region and product are selected and its
    /// date falls inside the range.
    pub fn matches(&self, record: &Record) -> bool {
        self.regions.contains(&record.region)
            && self.products.contains(&record.product)
            && self.dates.contains(record.date)
    }
}

/// Return the records of `table` that pass `criteria`, in their original
/// order and with all original columns.
pub fn apply(table: &Table, criteria: &Criteria) -> Table {
    let records = table
        .records()
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect();
    table.derive(records)
}
