//! # Persisted Inventory
//!
//! [`Inventory`] backed by an [`InventoryRepository`], using a two-phase
//! remote-then-local protocol.
//!
//! ## Two-Phase Mutation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. validate locally ──Err──► ValidationError (nothing sent)            │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  2. remote write ──────Err──► RemoteFailure  (local state untouched)    │
//! │          │                                                              │
//! │          ▼ Ok                                                           │
//! │  3. apply the same mutation in memory                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage batches run entry by entry, sequentially, with no rollback of
//! earlier successes. End-of-day persistence is best effort: a failed
//! snapshot write is logged and the date advances anyway.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::inventory::Inventory;
use crate::money::Money;
use crate::repository::InventoryRepository;
use crate::types::{DailyReport, NewProduct, Product, ProductUpdate, ReportRow};
use crate::usage::{SkipReason, UsageEntry, UsageOutcome, UsageSummary};

/// Result of closing a business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndOfDay {
    /// The closed day's figures.
    pub snapshot: ReportRow,
    /// Whether the backend accepted the snapshot.
    pub persisted: bool,
    /// The newly opened business date.
    pub opened: NaiveDate,
}

/// Inventory whose mutations go through a persistence backend first.
#[derive(Debug)]
pub struct PersistedInventory<R> {
    inventory: Inventory,
    repository: R,
}

impl<R: InventoryRepository> PersistedInventory<R> {
    /// Wraps an existing in-memory inventory without loading anything.
    pub fn new(repository: R, inventory: Inventory) -> Self {
        PersistedInventory {
            inventory,
            repository,
        }
    }

    /// Loads products and closed-day history from the backend.
    ///
    /// ## Opening Date
    /// 1. `config.opening_date`, if set
    /// 2. the day after the latest snapshot
    /// 3. the local wall-clock date (fresh install)
    pub async fn open(repository: R, config: &LedgerConfig) -> CoreResult<Self> {
        let products = repository
            .list_products()
            .await
            .map_err(|e| CoreError::remote("list_products", e))?;
        let snapshots = repository
            .list_daily_report_snapshots()
            .await
            .map_err(|e| CoreError::remote("list_daily_report_snapshots", e))?;

        let today = config
            .opening_date
            .or_else(|| {
                snapshots
                    .iter()
                    .map(|row| row.date)
                    .max()
                    .and_then(|last| last.succ_opt())
            })
            .unwrap_or_else(|| Local::now().date_naive());

        info!(%today, "Opening persisted inventory");

        let mut inventory = Inventory::with_config(today, config);
        inventory.hydrate(products, snapshots);

        Ok(PersistedInventory {
            inventory,
            repository,
        })
    }

    /// Read access to the in-memory state and its derived views.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_parts(self) -> (R, Inventory) {
        (self.repository, self.inventory)
    }

    // =========================================================================
    // Two-phase mutators
    // =========================================================================

    /// Adds a product through the backend.
    ///
    /// A purchase backdated before the open day also rewrites that day's
    /// snapshot, so the extra expense survives a restart. If that write
    /// fails, or the backend hands back an id the ledger already holds, the
    /// inserted row is deleted again and nothing changes locally.
    pub async fn add(&mut self, input: NewProduct) -> CoreResult<Product> {
        let draft = input.into_draft(self.inventory.today())?;

        let record = self
            .repository
            .insert_product(&draft)
            .await
            .map_err(|e| CoreError::remote("insert_product", e))?;
        debug!(id = %record.id, "Backend accepted product");

        if self.inventory.get(&record.id).is_some() {
            warn!(id = %record.id, "Backend returned an id already in the ledger");
            self.discard_inserted(&record.id).await;
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: record.id,
            }
            .into());
        }

        if draft.purchase_date < self.inventory.today() {
            let mut revised = self
                .inventory
                .reports()
                .get(draft.purchase_date)
                .copied()
                .unwrap_or_default();
            revised.expenses = revised.expenses.saturating_add(draft.total_price);
            let row = ReportRow::new(draft.purchase_date, revised);

            if let Err(e) = self.repository.insert_daily_report_snapshot(&row).await {
                self.discard_inserted(&record.id).await;
                return Err(CoreError::remote("insert_daily_report_snapshot", e));
            }
            info!(date = %row.date, expenses = row.expenses.cents(), "Revised closed day for backdated purchase");
        }

        self.inventory.add_with_id(record.id, draft)
    }

    /// Best-effort removal of a row the ledger will not take.
    async fn discard_inserted(&self, id: &str) {
        if let Err(e) = self.repository.delete_product(id).await {
            warn!(id = %id, error = %e, "Failed to remove rejected product from backend");
        }
    }

    pub async fn update(&mut self, changes: &ProductUpdate) -> CoreResult<Product> {
        let next = self.inventory.ledger().preview_update(changes)?;

        self.repository
            .update_product(&changes.id, &next.fields())
            .await
            .map_err(|e| CoreError::remote("update_product", e))?;

        self.inventory.update(changes)
    }

    /// Deletes remotely, then locally. Unknown ids never reach the backend.
    pub async fn delete(&mut self, id: &str) -> CoreResult<Option<Product>> {
        if self.inventory.get(id).is_none() {
            return Ok(None);
        }

        self.repository
            .delete_product(id)
            .await
            .map_err(|e| CoreError::remote("delete_product", e))?;

        Ok(self.inventory.delete(id))
    }

    pub async fn deduct(&mut self, id: &str, qty: i64) -> CoreResult<Option<i64>> {
        let Some(next) = self.inventory.ledger().preview_deduct(id, qty)? else {
            return Ok(None);
        };

        self.repository
            .update_product(id, &next.fields())
            .await
            .map_err(|e| CoreError::remote("update_product", e))?;

        self.inventory.deduct(id, qty)
    }

    /// Applies a usage batch, one remote write per applicable entry.
    pub async fn apply_usage(&mut self, entries: &[UsageEntry]) -> UsageSummary {
        let mut outcomes = Vec::with_capacity(entries.len());

        for entry in entries {
            outcomes.push(self.apply_entry(entry).await);
        }

        let summary = UsageSummary { outcomes };
        summary.log();
        summary
    }

    async fn apply_entry(&mut self, entry: &UsageEntry) -> UsageOutcome {
        let product_id = entry.product_id.clone();

        let next = match self
            .inventory
            .ledger()
            .preview_deduct(&entry.product_id, entry.quantity)
        {
            Ok(Some(next)) => next,
            Ok(None) => {
                return UsageOutcome::Skipped {
                    product_id,
                    reason: SkipReason::UnknownProduct,
                }
            }
            Err(_) => {
                return UsageOutcome::Skipped {
                    product_id,
                    reason: SkipReason::NonPositiveQuantity,
                }
            }
        };

        if let Err(e) = self
            .repository
            .update_product(&entry.product_id, &next.fields())
            .await
        {
            return UsageOutcome::Failed {
                product_id,
                message: e.to_string(),
            };
        }

        let before = self
            .inventory
            .get(&entry.product_id)
            .map(|p| p.quantity)
            .unwrap_or_default();

        match self.inventory.deduct(&entry.product_id, entry.quantity) {
            Ok(Some(remaining)) => UsageOutcome::Applied {
                product_id,
                deducted: before - remaining,
                remaining,
            },
            // preview already resolved the id and validated the quantity
            Ok(None) => UsageOutcome::Skipped {
                product_id,
                reason: SkipReason::UnknownProduct,
            },
            Err(e) => UsageOutcome::Failed {
                product_id,
                message: e.to_string(),
            },
        }
    }

    /// Persists the open day's snapshot (best effort) and advances the date.
    pub async fn end_day(&mut self) -> EndOfDay {
        let snapshot = self.inventory.snapshot_today();

        let persisted = match self.repository.insert_daily_report_snapshot(&snapshot).await {
            Ok(()) => true,
            Err(e) => {
                warn!(date = %snapshot.date, error = %e, "Failed to persist daily report");
                false
            }
        };

        self.inventory.end_day();

        EndOfDay {
            snapshot,
            persisted,
            opened: self.inventory.today(),
        }
    }

    // =========================================================================
    // Local-only operations
    // =========================================================================

    /// Sales are held in memory and persisted with the day's snapshot.
    pub fn set_sales(&mut self, date: NaiveDate, amount: Money) {
        self.inventory.set_sales(date, amount);
    }

    pub fn set_sales_input(&mut self, date: NaiveDate, input: &str) {
        self.inventory.set_sales_input(date, input);
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.inventory.set_date(date);
    }

    pub fn report_for(&mut self, date: NaiveDate) -> DailyReport {
        self.inventory.report_for(date)
    }

    pub fn today_report(&mut self) -> DailyReport {
        self.inventory.today_report()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
