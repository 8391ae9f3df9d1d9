//! # Seed Data Generator
//!
//! Populates a database with a pantry and a few simulated business days.
//!
//! ## Usage
//! ```bash
//! # Seed ./larder_dev.db with 7 days of history (default)
//! cargo run -p larder-db --bin seed
//!
//! # Custom number of days
//! cargo run -p larder-db --bin seed -- --days 30
//!
//! # Specify database path (or set LARDER_DB_PATH)
//! cargo run -p larder-db --bin seed -- --db ./data/larder.db
//! ```
//!
//! ## Simulated Day
//! 1. Record usage for every product
//! 2. Restock anything at or below the low-stock threshold
//! 3. Enter the day's sales
//! 4. Close the day

use std::env;

use larder_core::{
    LedgerConfig, Money, NewProduct, PersistedInventory, ProductUpdate, UsageEntry,
};
use larder_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// (name, starting quantity, unit, unit price in cents)
const PANTRY: &[(&str, i64, &str, i64)] = &[
    ("Rice", 50, "kg", 200),
    ("Flour", 40, "kg", 120),
    ("Sugar", 25, "kg", 150),
    ("Salt", 10, "kg", 60),
    ("Olive Oil", 12, "bottle", 850),
    ("Eggs", 30, "dozen", 400),
    ("Milk", 24, "liter", 110),
    ("Butter", 16, "block", 325),
    ("Tomatoes", 20, "kg", 275),
    ("Onions", 30, "kg", 90),
    ("Coffee Beans", 8, "kg", 1800),
    ("Tea", 10, "box", 450),
];

const RESTOCK_TO: i64 = 40;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut days: u32 = 7;
    let mut db_config = DbConfig::from_env_or("./larder_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(7);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_config = DbConfig::new(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Larder Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Business days to simulate (default: 7)");
                println!("  -d, --db <PATH>    Database file path (default: $LARDER_DB_PATH or ./larder_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    println!("🌱 Larder Seed Data Generator");
    println!("============================");
    println!("Database: {}", db_config.database_path.display());
    println!("Days:     {}", days);
    println!();

    let db = Database::new(db_config).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let config = LedgerConfig::from_env();
    let mut store = PersistedInventory::open(db.clone(), &config).await?;
    info!(today = %store.inventory().today(), "Seeding from business date");

    for (name, qty, unit, cents) in PANTRY {
        store
            .add(NewProduct::new(*name, *qty, *unit, Money::from_cents(*cents)))
            .await?;
    }
    println!("✓ Added {} products", PANTRY.len());

    for day in 0..days {
        simulate_day(&mut store, day as usize).await?;
    }

    println!();
    println!("Date        Sales        Expenses     Profit");
    println!("----------  -----------  -----------  -----------");
    for row in store.inventory().all_reports() {
        println!(
            "{}  {:>11}  {:>11}  {:>11}",
            row.date,
            config.format_currency(row.sales.cents()),
            config.format_currency(row.expenses.cents()),
            config.format_currency(row.profit.cents()),
        );
    }

    let low = store.inventory().low_stock();
    println!();
    println!("Low stock (≤ {}): {}", config.low_stock_threshold, low.len());
    for product in low {
        println!("  {} - {} {}", product.name, product.quantity, product.unit);
    }

    println!();
    println!("✓ Seed complete! Next business date: {}", store.inventory().today());

    Ok(())
}

/// Runs one business day against the store. Quantities are derived from
/// `day` so repeated runs produce the same history.
async fn simulate_day(
    store: &mut PersistedInventory<Database>,
    day: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let usage: Vec<UsageEntry> = store
        .inventory()
        .products()
        .iter()
        .enumerate()
        .map(|(idx, p)| UsageEntry::new(&p.id, ((day * 7 + idx * 3) % 6) as i64 + 1))
        .collect();

    let summary = store.apply_usage(&usage).await;
    if !summary.is_complete() {
        warn!(failed = summary.failed(), skipped = summary.skipped(), "Usage partially applied");
    }

    let restock: Vec<ProductUpdate> = store
        .inventory()
        .low_stock()
        .into_iter()
        .map(|p| {
            let mut edit = ProductUpdate::from_product(p);
            edit.quantity = RESTOCK_TO;
            edit
        })
        .collect();
    for edit in &restock {
        store.update(edit).await?;
    }

    let today = store.inventory().today();
    let sales = Money::from_cents(4_000 + ((day * 1_373) % 6_000) as i64);
    store.set_sales(today, sales);

    let closed = store.end_day().await;
    println!(
        "  {} closed: {} usage entries, {} restocked, profit {}{}",
        closed.snapshot.date,
        summary.applied(),
        restock.len(),
        closed.snapshot.profit,
        if closed.persisted { "" } else { " (not saved)" },
    );

    Ok(())
}

/// Logging for the seed run; override with `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
