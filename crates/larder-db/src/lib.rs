//! # larder-db: SQLite Storage for Larder
//!
//! Local persistence for products and closed-day reports, exposed both as
//! table-level repositories and as a [`larder_core::InventoryRepository`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Larder Data Flow                                │
//! │                                                                         │
//! │  PersistedInventory<Database> (larder-core)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     larder-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ ProductRepo    │    │ 001_init.sql │  │   │
//! │  │   │  SqlitePool   │    │ DailyReportRepo│    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (LARDER_DB_PATH, default ./larder.db)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Product and daily-report repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use larder_core::{LedgerConfig, PersistedInventory};
//! use larder_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("larder.db")).await?;
//! let mut store = PersistedInventory::open(db, &LedgerConfig::from_env()).await?;
//!
//! store.add(NewProduct::new("Rice", 50, "kg", Money::from_cents(200))).await?;
//! store.end_day().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::daily_report::DailyReportRepository;
pub use repository::product::ProductRepository;
