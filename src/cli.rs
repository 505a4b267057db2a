use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use sales_dashboard::data::loader::parse_date;
use sales_dashboard::{
    apply, group_sum, load_file, summarize, Criteria, ExportFormat, GroupKey, GroupValue,
    LoadReport, Summary, Table,
};
use serde::Serialize;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Sales dashboard: filter sales records, chart them and export CSV, Excel, PDF or Word."
)]
pub struct Cli {
    /// Sales file to open in the dashboard (defaults to ./sales_data.csv when present).
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the summary metrics and grouped sales as JSON.
    Summary(SummaryArgs),
    /// Write the filtered rows in one of the export formats.
    Export(ExportArgs),
}

#[derive(clap::Args)]
pub struct SummaryArgs {
    /// Input file path.
    #[arg(long)]
    data: PathBuf,

    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(clap::Args)]
pub struct ExportArgs {
    /// Input file path.
    #[arg(long)]
    data: PathBuf,

    /// Target format.
    #[arg(long, value_enum)]
    format: FormatKind,

    /// Output file path (defaults to filtered_data.<ext>).
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    filter: FilterArgs,
}

/// Filter flags; an omitted flag keeps the full range of the loaded data.
#[derive(clap::Args)]
struct FilterArgs {
    /// Region to keep (repeatable).
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Product to keep (repeatable).
    #[arg(long = "product")]
    products: Vec<String>,

    /// First day to keep.
    #[arg(long, value_parser = parse_date_arg)]
    from: Option<NaiveDate>,

    /// Last day to keep.
    #[arg(long, value_parser = parse_date_arg)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn criteria(&self, table: &Table) -> Criteria {
        let mut criteria = Criteria::covering(table);
        if !self.regions.is_empty() {
            criteria.regions = self.regions.iter().cloned().collect();
        }
        if !self.products.is_empty() {
            criteria.products = self.products.iter().cloned().collect();
        }
        if let Some(from) = self.from {
            criteria.dates.start = from;
        }
        if let Some(to) = self.to {
            criteria.dates.end = to;
        }
        criteria
    }
}

fn parse_date_arg(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("'{raw}' is not a recognisable date"))
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatKind {
    Csv,
    Xlsx,
    Pdf,
    Docx,
}

impl From<FormatKind> for ExportFormat {
    fn from(kind: FormatKind) -> Self {
        match kind {
            FormatKind::Csv => ExportFormat::Csv,
            FormatKind::Xlsx => ExportFormat::Xlsx,
            FormatKind::Pdf => ExportFormat::Pdf,
            FormatKind::Docx => ExportFormat::Docx,
        }
    }
}

pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Summary(args) => execute_summary(args),
        Command::Export(args) => execute_export(args),
    }
}

// ---------------------------------------------------------------------------
// summary
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GroupEntry {
    key: GroupValue,
    sales: f64,
}

#[derive(Serialize)]
struct SummaryOutput {
    load: LoadOutput,
    summary: Summary,
    sales_by_date: Vec<GroupEntry>,
    sales_by_region: Vec<GroupEntry>,
    sales_by_product: Vec<GroupEntry>,
}

#[derive(Serialize)]
struct LoadOutput {
    rows: usize,
    repeated_headers: usize,
    dropped: usize,
}

impl From<(usize, LoadReport)> for LoadOutput {
    fn from((rows, report): (usize, LoadReport)) -> Self {
        LoadOutput {
            rows,
            repeated_headers: report.repeated_headers,
            dropped: report.dropped,
        }
    }
}

fn entries(groups: Vec<(GroupValue, f64)>) -> Vec<GroupEntry> {
    groups
        .into_iter()
        .map(|(key, sales)| GroupEntry { key, sales })
        .collect()
}

fn execute_summary(args: SummaryArgs) -> Result<()> {
    let loaded = load_file(&args.data)?;
    let filtered = apply(&loaded.table, &args.filter.criteria(&loaded.table));

    let output = SummaryOutput {
        load: (loaded.table.len(), loaded.report).into(),
        summary: summarize(&filtered),
        sales_by_date: entries(group_sum(&filtered, GroupKey::Date)),
        sales_by_region: entries(group_sum(&filtered, GroupKey::Region)),
        sales_by_product: entries(group_sum(&filtered, GroupKey::Product)),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

fn execute_export(args: ExportArgs) -> Result<()> {
    let format = ExportFormat::from(args.format);
    let loaded = load_file(&args.data)?;
    let filtered = apply(&loaded.table, &args.filter.criteria(&loaded.table));

    let bytes = format.export(&filtered)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format.file_name()));
    std::fs::write(&output, &bytes).with_context(|| format!("writing {}", output.display()))?;

    eprintln!(
        "wrote {} rows to {} ({})",
        filtered.len(),
        output.display(),
        format.media_type()
    );
    Ok(())
}
