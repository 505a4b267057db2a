use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::model::{Table, DATE_FORMAT};

// ---------------------------------------------------------------------------
// Scalar summary
// ---------------------------------------------------------------------------

/// The three headline metrics of a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_sales: f64,
    pub total_quantity: f64,
    pub count: usize,
}

pub fn summarize(table: &Table) -> Summary {
    table
        .records()
        .iter()
        .fold(Summary::default(), |acc, r| Summary {
            total_sales: acc.total_sales + r.sales,
            total_quantity: acc.total_quantity + r.quantity,
            count: acc.count + 1,
        })
}

/// `$1,234.56` style rendering for the sales KPI.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

// ---------------------------------------------------------------------------
// Grouped sums
// ---------------------------------------------------------------------------

/// Column to group sales by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Ordered by date.
    Date,
    /// Ordered by summed sales, ascending.
    Region,
    /// Ordered by summed sales, ascending.
    Product,
}

/// The value a group is keyed on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupValue {
    Date(NaiveDate),
    Label(String),
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            GroupValue::Label(s) => write!(f, "{s}"),
        }
    }
}

/// Sum of sales per distinct key value.
///
/// Keys compare exactly: labels as literal strings, dates by calendar day.
/// Equal sums keep key order so the result is deterministic.
pub fn group_sum(table: &Table, key: GroupKey) -> Vec<(GroupValue, f64)> {
    let mut sums: BTreeMap<GroupValue, f64> = BTreeMap::new();
    for record in table.records() {
        let value = match key {
            GroupKey::Date => GroupValue::Date(record.date),
            GroupKey::Region => GroupValue::Label(record.region.clone()),
            GroupKey::Product => GroupValue::Label(record.product.clone()),
        };
        *sums.entry(value).or_insert(0.0) += record.sales;
    }

    let mut groups: Vec<(GroupValue, f64)> = sums.into_iter().collect();
    if key != GroupKey::Date {
        // stable sort: ties stay in key order
        groups.sort_by(|a, b| a.1.total_cmp(&b.1));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Record, Schema};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn sample() -> Table {
        Table::new(
            Schema::standard(),
            vec![
                Record::new(day(2), "East", "Widget", 100.0, 2.0),
                Record::new(day(1), "West", "Gadget", 50.0, 1.0),
                Record::new(day(2), "West", "Widget", 25.5, 4.0),
                Record::new(day(1), "North", "Gizmo", 80.0, 1.0),
            ],
        )
    }

    #[test]
    fn summary_totals() {
        let s = summarize(&sample());
        assert_eq!(s.count, 4);
        assert!((s.total_sales - 255.5).abs() < 1e-9);
        assert!((s.total_quantity - 8.0).abs() < 1e-9);
    }

    #[test]
    fn empty_table_yields_zeros() {
        let empty = Table::new(Schema::standard(), Vec::new());
        assert_eq!(summarize(&empty), Summary::default());
        assert!(group_sum(&empty, GroupKey::Date).is_empty());
        assert!(group_sum(&empty, GroupKey::Region).is_empty());
    }

    #[test]
    fn by_date_is_ordered_by_day() {
        let groups = group_sum(&sample(), GroupKey::Date);
        assert_eq!(
            groups,
            vec![
                (GroupValue::Date(day(1)), 130.0),
                (GroupValue::Date(day(2)), 125.5)
            ]
        );
    }

    #[test]
    fn categories_are_ordered_by_sum() {
        let regions: Vec<String> = group_sum(&sample(), GroupKey::Region)
            .into_iter()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(regions, vec!["West", "North", "East"]);

        let products = group_sum(&sample(), GroupKey::Product);
        assert_eq!(
            products,
            vec![
                (GroupValue::Label("Gadget".into()), 50.0),
                (GroupValue::Label("Gizmo".into()), 80.0),
                (GroupValue::Label("Widget".into()), 125.5),
            ]
        );
    }

    #[test]
    fn group_sums_add_up_to_total() {
        let table = sample();
        let total = summarize(&table).total_sales;
        for key in [GroupKey::Date, GroupKey::Region, GroupKey::Product] {
            let sum: f64 = group_sum(&table, key).iter().map(|(_, v)| v).sum();
            assert!((sum - total).abs() < 1e-9, "{key:?}");
        }
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(-12.0), "-$12.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
    }
}
