use std::fs;

use chrono::NaiveDate;
use sales_dashboard::{
    apply, group_sum, load_file, load_str, summarize, CellValue, Criteria, DateRange,
    ExportError, ExportFormat, GroupKey, LoadError, Record, Schema, Table,
};
use tempfile::tempdir;

const SCENARIO: &str = "Date,Region,Product,Sales,Quantity\n\
                        2024-01-01,East,Widget,100,2\n\
                        2024-01-02,West,Gadget,50,1\n";

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn east_only() -> Criteria {
    Criteria {
        regions: ["East".to_string()].into_iter().collect(),
        products: ["Widget".to_string(), "Gadget".to_string()].into_iter().collect(),
        dates: DateRange::new(day(1), day(2)),
    }
}

#[test]
fn east_widget_scenario() {
    let table = load_str(SCENARIO).unwrap().table;
    let filtered = apply(&table, &east_only());

    assert_eq!(
        filtered.records(),
        &[Record::new(day(1), "East", "Widget", 100.0, 2.0)]
    );

    let summary = summarize(&filtered);
    assert_eq!(summary.total_sales, 100.0);
    assert_eq!(summary.total_quantity, 2.0);
    assert_eq!(summary.count, 1);

    let text = String::from_utf8(ExportFormat::Csv.export(&filtered).unwrap()).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert_eq!(text, "Date,Region,Product,Sales,Quantity\n2024-01-01,East,Widget,100,2\n");
}

#[test]
fn csv_export_reloads_to_the_same_table() {
    let text = "Date,Region,Product,Sales,Quantity,Note,Rep\n\
                2024-01-01,\"East, Coast\",Widget,100.25,2,\"said \"\"rush\"\"\",7\n\
                2024-01-02,West,Gadget,50,1,,\n\
                2024-01-03,North,Gizmo,0.1,3,plain,8.5\n";
    let original = load_str(text).unwrap().table;
    let exported = ExportFormat::Csv.export(&original).unwrap();

    let dir = tempdir().expect("temporary directory");
    let path = dir.path().join("filtered_data.csv");
    fs::write(&path, &exported).unwrap();
    let reloaded = load_file(&path).unwrap();

    assert_eq!(reloaded.report.dropped, 0);
    assert_eq!(reloaded.table.columns(), original.columns());
    assert_eq!(reloaded.table.records(), original.records());
}

#[test]
fn empty_region_selection_exports_header_only_everywhere() {
    let table = load_str(SCENARIO).unwrap().table;
    let mut criteria = Criteria::covering(&table);
    criteria.regions.clear();
    let filtered = apply(&table, &criteria);
    assert!(filtered.is_empty());

    for format in ExportFormat::ALL {
        let bytes = format
            .export(&filtered)
            .unwrap_or_else(|e| panic!("{format} export failed: {e}"));
        assert!(!bytes.is_empty(), "{format}");
    }
    let text = String::from_utf8(ExportFormat::Csv.export(&filtered).unwrap()).unwrap();
    assert_eq!(text, "Date,Region,Product,Sales,Quantity\n");
}

#[test]
fn ragged_table_is_rejected_by_every_exporter() {
    let schema =
        Schema::from_headers(&["Date", "Region", "Product", "Sales", "Quantity", "Note"]).unwrap();
    let table = Table::new(
        schema,
        vec![
            Record::new(day(1), "East", "Widget", 1.0, 1.0)
                .with_extra(vec![CellValue::Text("x".into())]),
            Record::new(day(2), "East", "Widget", 1.0, 1.0),
        ],
    );
    for format in ExportFormat::ALL {
        let err = format.export(&table).unwrap_err();
        assert!(
            matches!(err, ExportError::RaggedRow { row: 1, expected: 6, found: 5 }),
            "{format}: {err}"
        );
    }
}

#[test]
fn full_domain_filter_preserves_summary() {
    let text = "Date,Region,Product,Sales,Quantity\n\
                2024-01-05,East,Widget,10.5,1\n\
                2024-01-01,West,Gadget,20,2\n\
                2024-01-03,East,Gizmo,30.25,3\n\
                2024-01-03,South,Widget,0.75,4\n";
    let table = load_str(text).unwrap().table;
    let filtered = apply(&table, &Criteria::covering(&table));
    assert_eq!(summarize(&filtered), summarize(&table));

    let total = summarize(&table).total_sales;
    for key in [GroupKey::Date, GroupKey::Region, GroupKey::Product] {
        let sum: f64 = group_sum(&table, key).iter().map(|(_, v)| v).sum();
        assert!((sum - total).abs() < 1e-9);
    }
}

#[test]
fn loader_errors_surface() {
    let dir = tempdir().expect("temporary directory");

    let missing = dir.path().join("nope.csv");
    assert!(matches!(load_file(&missing), Err(LoadError::NotFound(_))));

    let json = dir.path().join("sales.json");
    fs::write(&json, "[]").unwrap();
    assert!(matches!(
        load_file(&json),
        Err(LoadError::UnsupportedExtension(ext)) if ext == "json"
    ));

    let no_sales = dir.path().join("bad.csv");
    fs::write(&no_sales, "Date,Region,Product,Quantity\n").unwrap();
    assert!(matches!(
        load_file(&no_sales),
        Err(LoadError::MissingColumn(col)) if col == "Sales"
    ));
}

#[test]
fn tab_separated_input() {
    let dir = tempdir().expect("temporary directory");
    let path = dir.path().join("sales.tsv");
    fs::write(
        &path,
        "Date\tRegion\tProduct\tSales\tQuantity\n2024-01-01\tEast\tWidget\t100\t2\n",
    )
    .unwrap();
    let loaded = load_file(&path).unwrap();
    assert_eq!(loaded.table.len(), 1);
    assert_eq!(loaded.table.records()[0].product, "Widget");
}
