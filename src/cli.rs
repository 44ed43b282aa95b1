use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dell_orders::config::{self, TrackerSettings};
use dell_orders::export::write_orders;
use dell_orders::interactive::process_upload;
use dell_orders::orders::{OrderPipeline, read_input_bytes};
use dell_orders::report::render_console_report;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "dell-orders",
    about = "Filter Dell order exports for Service Tag Quantity = 1",
    after_help = EXAMPLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

const EXAMPLES: &str = "\
Examples:
  dell-orders run orders.xlsx
  dell-orders run orders.xlsx -o filtered.xlsx
  dell-orders run orders.xlsx -o output.csv
  dell-orders bundle orders.xlsx --out-dir reports --status Shipped";

#[derive(Subcommand)]
pub enum Commands {
    /// Filter an export and print the summary report
    Run {
        /// Input Dell orders file (Excel or CSV)
        input: PathBuf,

        /// Output file; `.csv` writes CSV, anything else writes Excel
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Order date to keep (YYYY-MM-DD). Defaults to the configured date.
        #[arg(long, env = "DELL_ORDERS_TARGET_DATE")]
        target_date: Option<NaiveDate>,
    },
    /// Write the Excel and CSV downloads plus the print report for an export
    Bundle {
        /// Input Dell orders file (.csv, .xlsx or .xls)
        input: PathBuf,

        /// Directory the files are written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Only include orders with this status; repeat for several
        #[arg(long = "status")]
        statuses: Vec<String>,

        /// Order date to keep (YYYY-MM-DD). Defaults to the configured date.
        #[arg(long, env = "DELL_ORDERS_TARGET_DATE")]
        target_date: Option<NaiveDate>,
    },
    /// Show or update the stored settings
    Config {
        /// Store a new default order date (YYYY-MM-DD)
        #[arg(long)]
        set_target_date: Option<NaiveDate>,

        /// Store a new download file name prefix
        #[arg(long)]
        set_prefix: Option<String>,
    },
}

/// A failure whose message is already worded for the user.
#[derive(Debug)]
pub struct ReportedError(pub String);

impl fmt::Display for ReportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ReportedError {}

pub fn print_usage() {
    println!("Dell Orders Tracker - Command Line Tool");
    println!("\nUsage: dell-orders run <input_file> [-o <output_file>]");
    println!("       dell-orders bundle <input_file> [--out-dir <dir>] [--status <status>]...");
    println!("\n{EXAMPLES}");
    println!("\nFor more help: dell-orders --help");
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            input,
            output,
            target_date,
        } => handle_run(&input, output.as_deref(), target_date),
        Commands::Bundle {
            input,
            out_dir,
            statuses,
            target_date,
        } => handle_bundle(&input, &out_dir, &statuses, target_date),
        Commands::Config {
            set_target_date,
            set_prefix,
        } => handle_config(set_target_date, set_prefix),
    }
}

fn handle_run(input: &Path, output: Option<&Path>, target_date: Option<NaiveDate>) -> Result<()> {
    let settings = config::load_settings();
    let target_date = settings.resolve_target_date(target_date);

    println!("Reading file: {}", input.display());
    let outcome = OrderPipeline::new(target_date).run_path(input)?;
    println!("Loaded {} total rows", outcome.loaded_rows);
    println!("{}", outcome.filter_message());

    if outcome.orders.is_empty() {
        println!("No orders found with Service Tag Quantity = 1");
        return Ok(());
    }

    let summary = outcome.orders.summary()?;
    let report = render_console_report(&outcome.orders, &summary, today())?;
    print!("{report}");

    if let Some(path) = output {
        let format = write_orders(&outcome.orders, path)?;
        println!("\nSaved to {}: {}", format.label(), path.display());
    }
    Ok(())
}

fn handle_bundle(
    input: &Path,
    out_dir: &Path,
    statuses: &[String],
    target_date: Option<NaiveDate>,
) -> Result<()> {
    let mut settings = config::load_settings();
    settings.target_order_date = settings.resolve_target_date(target_date);

    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let bytes = read_input_bytes(input)?;

    let view = process_upload(&file_name, &bytes, &settings).map_err(ReportedError)?;
    println!("{}", view.loaded_message());
    println!("{}", view.filter_message);

    if let Some(warning) = &view.warning {
        println!("{warning}");
        return Ok(());
    }
    if let Some(message) = view.narrowing_message(statuses).map_err(ReportedError)? {
        println!("{message}");
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let generated_on = today();
    for download in view.downloads(statuses, generated_on).map_err(ReportedError)? {
        let path = out_dir.join(&download.file_name);
        std::fs::write(&path, &download.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{}: {}", download.label, path.display());
    }

    let report = view
        .print_report(statuses, generated_on)
        .map_err(ReportedError)?;
    let report_path = out_dir.join(report_file_name(&settings, generated_on));
    std::fs::write(&report_path, report)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;
    println!("Print report: {}", report_path.display());
    Ok(())
}

fn handle_config(set_target_date: Option<NaiveDate>, set_prefix: Option<String>) -> Result<()> {
    let mut settings = config::load_settings();
    let changed = set_target_date.is_some() || set_prefix.is_some();

    if let Some(date) = set_target_date {
        settings.target_order_date = date;
    }
    if let Some(prefix) = set_prefix {
        settings.export_file_prefix = prefix;
    }

    if changed {
        let path = config::save_settings(&settings)?;
        println!("Saved settings to {}", path.display());
    } else if let Some(path) = config::get_config_path() {
        println!("Settings file: {}", path.display());
    }
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

fn report_file_name(settings: &TrackerSettings, generated_on: NaiveDate) -> String {
    format!(
        "{}_{}_report.md",
        settings.export_file_prefix,
        generated_on.format("%Y%m%d")
    )
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
