mod config;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use shelf_bridge::Bridge;
use shelf_pipeline::analytics::{
    self, CategoryShare, ExpiryBreakdown, InventorySummary, PriceBox, RetailerStatusCount,
    TableRow,
};
use shelf_pipeline::{
    BatchQuery, DashboardConfig, Dataset, LookupOutcome, Selection, StockOnHandRule,
};

#[derive(Parser)]
#[command(name = "shelf-server")]
#[command(about = "Inventory dashboard over a product batch catalog")]
#[command(version)]
struct Cli {
    /// Catalog file: a CSV export or a spreadsheet workbook (.xlsx, .xls, .ods)
    #[arg(env = "SHELF_CATALOG")]
    catalog: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reference date for expiry calculations (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_iso_date)]
    today: Option<NaiveDate>,

    /// Days before expiry at which a batch counts as near expiry
    #[arg(long)]
    near_expiry_days: Option<i64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show summary metrics, chart series and the product table
    Dashboard(DashboardArgs),

    /// Verify a batch by its batch number
    Verify {
        /// Exact batch number, e.g. OI-TEA-001
        batch_number: String,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Answer JSON bridge requests, one per line, from stdin
    Serve,
}

#[derive(Args)]
struct DashboardArgs {
    /// Case-insensitive product name search
    #[arg(long)]
    search: Option<String>,

    /// Category to show ("All" for every category)
    #[arg(long, default_value = "All")]
    category: String,

    /// Retailer to show ("All" for every retailer)
    #[arg(long, default_value = "All")]
    retailer: String,

    /// Batch status to show: All, "In Stock", "Low Stock" or "Out of Stock"
    #[arg(long, default_value = "All")]
    stock_status: String,

    /// Maximum table rows to print
    #[arg(long, default_value_t = 25)]
    limit: usize,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl DashboardArgs {
    fn query(&self) -> BatchQuery {
        BatchQuery {
            search_text: self.search.clone(),
            category: Selection::from(self.category.as_str()),
            retailer: Selection::from(self.retailer.as_str()),
            stock_status: Selection::from(self.stock_status.as_str()),
        }
    }
}

fn parse_iso_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", value, e))
}

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DashboardJson {
    generated_at: String,
    as_of: NaiveDate,
    filters: BatchQuery,
    load_ms: u128,
    summary: InventorySummary,
    expiry: ExpiryBreakdown,
    matched: usize,
    total: usize,
    charts: ChartsJson,
    table: Vec<TableRow>,
}

#[derive(Serialize)]
struct ChartsJson {
    category_distribution: Vec<CategoryShare>,
    stock_status_by_retailer: Vec<RetailerStatusCount>,
    price_distribution: Vec<PriceBox>,
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// Format a rupee amount with comma thousands separators and two decimals.
fn format_rupees(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let paise = (amount.abs() * 100.0).round() as u64;
    let whole = (paise / 100).to_string();

    let mut grouped = String::new();
    for (i, ch) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let grouped: String = grouped.chars().rev().collect();
    format!("{}\u{20b9}{}.{:02}", sign, grouped, paise % 100)
}

fn bar(count: usize, max: usize) -> String {
    const WIDTH: usize = 30;
    let len = if max == 0 { 0 } else { (count * WIDTH).div_ceil(max) };
    "\u{2588}".repeat(len)
}

fn print_dashboard(dataset: &Dataset, args: &DashboardArgs, load_ms: u128) {
    let query = args.query();
    let view = dataset.filter(&query);
    let summary = dataset.summary();
    let expiry = analytics::expiry_breakdown(dataset.records());

    println!();
    println!("  \u{2554}{}\u{2557}", "\u{2550}".repeat(62));
    println!("  \u{2551}{:^62}\u{2551}", "Organic India Product Dashboard");
    println!("  \u{255a}{}\u{255d}", "\u{2550}".repeat(62));
    println!();

    println!("  Inventory Summary (as of {})", dataset.as_of());
    println!(
        "  {} products  \u{00b7}  {} categories  \u{00b7}  {} retailers  \u{00b7}  avg. shelf life {:.1} months",
        summary.total_products,
        summary.categories,
        summary.retailers,
        summary.avg_shelf_life_months
    );
    println!(
        "  {} batches: {} expired  \u{00b7}  {} near expiry  \u{00b7}  {} good",
        summary.total_batches, expiry.expired, expiry.near_expiry, expiry.good
    );
    println!();

    if query.is_unfiltered() {
        println!("  Showing all {} batches", dataset.len());
    } else {
        println!(
            "  {} of {} batches match the current filters",
            view.kept.len(),
            dataset.len()
        );
    }
    println!();

    if view.kept.is_empty() {
        println!("  No batches match. Try widening the filters.");
        println!();
        return;
    }

    println!("  Category Distribution");
    println!("  {:\u{2500}<64}", "");
    let shares = analytics::category_distribution(&view.kept);
    let max_share = shares.iter().map(|s| s.count).max().unwrap_or(0);
    for share in &shares {
        println!(
            "  {:20} {:>4}  {}",
            share.category,
            share.count,
            bar(share.count, max_share)
        );
    }
    println!();

    println!("  Stock Status by Retailer");
    println!("  {:\u{2500}<64}", "");
    for entry in analytics::stock_status_by_retailer(&view.kept) {
        println!(
            "  {:20} {:14} {:>4}",
            entry.retailer, entry.batch_status, entry.count
        );
    }
    println!();

    println!("  Price Distribution by Category (MRP)");
    println!("  {:\u{2500}<64}", "");
    for price in analytics::price_distribution(&view.kept) {
        println!(
            "  {:20} min {}  median {}  max {}  (n={})",
            price.category,
            format_rupees(price.min),
            format_rupees(price.median),
            format_rupees(price.max),
            price.count
        );
    }
    println!();

    println!("  Product Details");
    println!("  {:\u{2500}<64}", "");
    let shown = view.kept.len().min(args.limit);
    for row in analytics::table_rows(&view.kept[..shown]) {
        println!(
            "  {:24} {:14} {:>5} {:>12} {:16} {:>5} {:14} {}",
            row.product_name,
            row.category,
            row.quantity,
            format_rupees(row.mrp),
            row.retailer_name,
            row.current_stock,
            row.batch_status,
            if row.blockchain_verified { "\u{2713}" } else { "\u{2717}" },
        );
    }
    if shown < view.kept.len() {
        println!("  ... {} more (raise --limit to see them)", view.kept.len() - shown);
    }
    println!();
    println!("  \u{23f1}  Catalog loaded in {}ms", load_ms);
    println!();
}

fn dashboard_json(dataset: &Dataset, args: &DashboardArgs, load_ms: u128) -> DashboardJson {
    let query = args.query();
    let view = dataset.filter(&query);
    let shown = view.kept.len().min(args.limit);

    DashboardJson {
        generated_at: Utc::now().to_rfc3339(),
        as_of: dataset.as_of(),
        load_ms,
        summary: dataset.summary(),
        expiry: analytics::expiry_breakdown(dataset.records()),
        matched: view.kept.len(),
        total: dataset.len(),
        charts: ChartsJson {
            category_distribution: analytics::category_distribution(&view.kept),
            stock_status_by_retailer: analytics::stock_status_by_retailer(&view.kept),
            price_distribution: analytics::price_distribution(&view.kept),
        },
        table: analytics::table_rows(&view.kept[..shown]),
        filters: query,
    }
}

fn print_verification(outcome: &LookupOutcome) {
    println!();
    match outcome {
        LookupOutcome::Verified(detail) => {
            println!("  \u{2713} Verification Successful!");
            println!("  {:\u{2500}<64}", "");
            println!("  Product Name:           {}", detail.product_name);
            println!("  Category:               {}", detail.category);
            println!("  Quantity:               {}", detail.quantity);
            println!("  MRP:                    {}", format_rupees(detail.mrp));
            println!("  Shelf Life:             {} months", detail.shelf_life_months);
            println!("  Manufacturer:           {}", detail.manufacturer);
            println!("  Manufacturing Address:  {}", detail.manufacturing_address);
            println!(
                "  Manufacturing Time:     {}",
                detail.manufactured_at().format("%Y-%m-%d %H:%M")
            );
            println!("  Organic Certifications: {}", detail.organic_certifications);
        }
        LookupOutcome::VerificationFailed(failed) => {
            println!("  \u{2717} Verification Failed");
            println!("  {:\u{2500}<64}", "");
            println!("  Product Name: {}", failed.product_name);
            println!("  Reason:       {}", failed.reason);
            println!(
                "  This batch was manufactured at {} on {}",
                failed.manufacturing_address,
                failed.manufacture_date.format("%Y-%m-%d")
            );
        }
        LookupOutcome::NotFound { batch_number } => {
            println!("  ! Batch ID '{}' not found in our records", batch_number);
        }
    }
    println!();
}

fn serve(dataset: &Dataset) -> io::Result<()> {
    let bridge = Bridge::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut served = 0usize;

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match bridge.handle_line(dataset, &line) {
            Ok(response) => response,
            Err(e) => {
                log::error!("failed to encode response: {}", e);
                serde_json::json!({ "request_id": "", "error": e.to_string() }).to_string()
            }
        };
        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
        served += 1;
    }

    log::info!("stdin closed after {} requests", served);
    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut dashboard_config: DashboardConfig = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };
    if let Some(days) = cli.near_expiry_days {
        dashboard_config.near_expiry_days = days;
        dashboard_config = match config::validate(dashboard_config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        };
    }

    if let Commands::Verify { batch_number, .. } = &cli.command {
        if batch_number.is_empty() {
            eprintln!("Please enter a Batch ID");
            process::exit(2);
        }
    }

    // Load the catalog once; every command below reads this snapshot.
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let load_start = Instant::now();
    let dataset = match Dataset::load_file(&cli.catalog, today, &dashboard_config, &StockOnHandRule)
    {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error loading catalog: {}", e);
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();

    match &cli.command {
        Commands::Dashboard(args) => {
            if args.json {
                let digest = dashboard_json(&dataset, args, load_ms);
                match serde_json::to_string_pretty(&digest) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Error encoding JSON: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                print_dashboard(&dataset, args, load_ms);
            }
        }
        Commands::Verify { batch_number, json } => {
            let outcome = dataset.lookup(batch_number);
            if let LookupOutcome::NotFound { .. } = outcome {
                log::warn!("batch '{}' not found", batch_number);
            }
            if *json {
                match serde_json::to_string_pretty(&outcome) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Error encoding JSON: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                print_verification(&outcome);
            }
        }
        Commands::Serve => {
            if let Err(e) = serve(&dataset) {
                eprintln!("Error serving requests: {}", e);
                process::exit(1);
            }
        }
    }
}
