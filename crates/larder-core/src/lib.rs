//! # larder-core: Inventory Ledger and Daily Reports
//!
//! Business logic for a small-shop stock ledger: products with purchase
//! costs, stock usage, and one sales/expenses/profit report per business day.
//! Everything except [`PersistedInventory`] is synchronous and free of I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Larder Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ larder-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   clock   │  │  ledger   │  │  report   │  │   usage   │  │   │
//! │  │   │ business  │─►│ products  │─►│ date →    │  │ batch     │  │   │
//! │  │   │ date      │  │ + costs   │  │ report    │  │ deduction │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   Inventory (owns all three) ──► PersistedInventory<R>          │   │
//! │  └──────────────────────────────────────────────┬──────────────────┘   │
//! │                                                 │ InventoryRepository   │
//! │  ┌──────────────────────────────────────────────▼──────────────────┐   │
//! │  │                 larder-db (Database Layer)                      │   │
//! │  │          SQLite tables for products and closed days             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`clock`] - The current business date
//! - [`ledger`] - Product collection and its report side effects
//! - [`report`] - Daily reports keyed by date
//! - [`usage`] - Batch stock deduction
//! - [`inventory`] - The store that wires the above together
//! - [`persisted`] - Two-phase persistence over [`InventoryRepository`]
//! - [`money`] - Integer-cent money
//! - [`types`], [`validation`], [`error`], [`config`]
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use larder_core::{Inventory, Money, NewProduct, UsageEntry};
//!
//! let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
//! let mut inventory = Inventory::new(monday);
//!
//! let flour = inventory
//!     .add(NewProduct::new("Flour", 25, "kg", Money::from_cents(120)))
//!     .unwrap();
//! inventory.apply_usage(&[UsageEntry::new(&flour.id, 5)]);
//! inventory.set_sales(monday, Money::from_cents(4_500));
//!
//! let closed = inventory.end_day();
//! assert_eq!(closed.profit, Money::from_cents(1_500));
//! assert_eq!(inventory.today(), monday.succ_opt().unwrap());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod config;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod money;
pub mod persisted;
pub mod report;
pub mod repository;
pub mod types;
pub mod usage;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::BusinessClock;
pub use config::LedgerConfig;
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::Inventory;
pub use ledger::{generate_product_id, ProductLedger};
pub use money::Money;
pub use persisted::{EndOfDay, PersistedInventory};
pub use report::DailyReportBook;
pub use repository::InventoryRepository;
pub use types::*;
pub use usage::{apply_usage, SkipReason, UsageEntry, UsageOutcome, UsageSummary};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Low-stock threshold used when none is configured.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Largest on-hand quantity a single product may record.
///
/// Keeps `quantity × unit_price` well inside `i64` cents.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Largest unit price, in cents ($10,000,000.00).
pub const MAX_UNIT_PRICE_CENTS: i64 = 1_000_000_000;

/// Largest purchase total, in cents. Also caps an explicit total override.
pub const MAX_TOTAL_PRICE_CENTS: i64 = MAX_QUANTITY * MAX_UNIT_PRICE_CENTS;
