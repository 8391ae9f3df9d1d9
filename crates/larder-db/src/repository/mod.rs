//! # Repository Module
//!
//! Table-level repositories, plus the [`InventoryRepository`] implementation
//! that lets a [`Database`] back a `PersistedInventory`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InventoryRepository for Database                                       │
//! │                                                                         │
//! │  list_products                ──►  db.products().list()                 │
//! │  insert_product               ──►  db.products().insert()               │
//! │  update_product               ──►  db.products().update_fields()        │
//! │  delete_product               ──►  db.products().delete()               │
//! │  insert_daily_report_snapshot ──►  db.daily_reports().upsert()          │
//! │  list_daily_report_snapshots  ──►  db.daily_reports().list()            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD
//! - [`DailyReportRepository`](daily_report::DailyReportRepository) - Closed-day snapshots

pub mod daily_report;
pub mod product;

use async_trait::async_trait;
use larder_core::{InventoryRepository, Product, ProductDraft, ProductFields, ReportRow};

use crate::error::DbError;
use crate::pool::Database;

#[async_trait]
impl InventoryRepository for Database {
    type Error = DbError;

    async fn list_products(&self) -> Result<Vec<Product>, DbError> {
        self.products().list().await
    }

    async fn insert_product(&self, draft: &ProductDraft) -> Result<Product, DbError> {
        self.products().insert(draft).await
    }

    async fn update_product(&self, id: &str, fields: &ProductFields) -> Result<Product, DbError> {
        self.products().update_fields(id, fields).await
    }

    async fn delete_product(&self, id: &str) -> Result<(), DbError> {
        self.products().delete(id).await
    }

    async fn insert_daily_report_snapshot(&self, row: &ReportRow) -> Result<(), DbError> {
        self.daily_reports().upsert(row).await
    }

    async fn list_daily_report_snapshots(&self) -> Result<Vec<ReportRow>, DbError> {
        self.daily_reports().list().await
    }
}

// =============================================================================
// Integration Tests
// =============================================================================
