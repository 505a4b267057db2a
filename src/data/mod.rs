/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  sales_data.csv / .tsv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + coerce rows → Table (bad rows dropped)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Schema (column order) + Vec<Record>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Criteria (regions, products, dates) → filtered Table
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  Summary + grouped sales sums
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
