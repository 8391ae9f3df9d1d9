//! # Persistence Interface
//!
//! The contract the inventory expects from its backend. `larder-db`
//! implements it on SQLite; tests implement it in memory.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PersistedInventory                 InventoryRepository                 │
//! │  ──────────────────                 ───────────────────                 │
//! │  open()       ──────────────────►   list_products                       │
//! │               ──────────────────►   list_daily_report_snapshots         │
//! │  add()        ──────────────────►   insert_product                      │
//! │  update()     ──────────────────►   update_product                      │
//! │  deduct()     ──────────────────►   update_product (new quantity)       │
//! │  delete()     ──────────────────►   delete_product                      │
//! │  end_day()    ──────────────────►   insert_daily_report_snapshot        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Implementations own their transport, including any timeout.

use async_trait::async_trait;

use crate::types::{Product, ProductDraft, ProductFields, ReportRow};

/// Backend for products and closed-day report snapshots.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Backend-specific failure, surfaced as `CoreError::RemoteFailure`.
    type Error: std::error::Error + Send + Sync + 'static;

    /// All stored products, ordered by name.
    async fn list_products(&self) -> Result<Vec<Product>, Self::Error>;

    /// Stores a new product and returns it with its assigned id.
    async fn insert_product(&self, draft: &ProductDraft) -> Result<Product, Self::Error>;

    /// Overwrites a product's mutable fields.
    async fn update_product(&self, id: &str, fields: &ProductFields)
        -> Result<Product, Self::Error>;

    async fn delete_product(&self, id: &str) -> Result<(), Self::Error>;

    /// Records a closed day. Called once per end-of-day.
    async fn insert_daily_report_snapshot(&self, row: &ReportRow) -> Result<(), Self::Error>;

    /// Every closed-day snapshot, most recent first.
    async fn list_daily_report_snapshots(&self) -> Result<Vec<ReportRow>, Self::Error>;
}
