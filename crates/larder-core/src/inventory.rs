//! # Inventory Store
//!
//! The explicitly constructed object that owns the clock, the ledger and the
//! report book, and wires ledger mutations into report deltas.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Inventory                                    │
//! │                                                                         │
//! │   ┌───────────────┐   ┌────────────────┐   ┌──────────────────┐        │
//! │   │ BusinessClock │   │ ProductLedger  │   │ DailyReportBook  │        │
//! │   │   today       │──►│   products     │──►│   date → report  │        │
//! │   └───────────────┘   └────────────────┘   └──────────────────┘        │
//! │         reads "today"      pushes expense deltas                        │
//! │                                                                         │
//! │   Consumers hold `&mut Inventory`; there is no global instance.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use chrono::NaiveDate;
//! use larder_core::{Inventory, Money, NewProduct};
//!
//! let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let mut inventory = Inventory::new(d);
//!
//! let rice = inventory
//!     .add(NewProduct::new("Rice", 50, "kg", Money::from_cents(200)))
//!     .unwrap();
//! assert_eq!(inventory.report_for(d).expenses, Money::from_cents(10_000));
//!
//! inventory.deduct(&rice.id, 20).unwrap();
//! assert_eq!(inventory.get(&rice.id).unwrap().quantity, 30);
//!
//! inventory.set_sales(d, Money::from_cents(15_000));
//! assert_eq!(inventory.profit(d), Money::from_cents(5_000));
//! ```

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::info;

use crate::clock::BusinessClock;
use crate::config::LedgerConfig;
use crate::error::CoreResult;
use crate::ledger::ProductLedger;
use crate::money::Money;
use crate::report::DailyReportBook;
use crate::types::{DailyReport, NewProduct, Product, ProductDraft, ProductUpdate, ReportRow};
use crate::usage::{apply_usage, UsageEntry, UsageOutcome, UsageSummary};
use crate::DEFAULT_LOW_STOCK_THRESHOLD;

/// In-memory inventory: products, reports and the business date.
#[derive(Debug, Clone)]
pub struct Inventory {
    clock: BusinessClock,
    ledger: ProductLedger,
    reports: DailyReportBook,
    low_stock_threshold: i64,
}

impl Inventory {
    /// Creates an empty inventory opened on `today`.
    pub fn new(today: NaiveDate) -> Self {
        Inventory {
            clock: BusinessClock::new(today),
            ledger: ProductLedger::new(),
            reports: DailyReportBook::new(),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }

    /// Creates an empty inventory using the config's threshold.
    pub fn with_config(today: NaiveDate, config: &LedgerConfig) -> Self {
        Inventory {
            low_stock_threshold: config.low_stock_threshold,
            ..Inventory::new(today)
        }
    }

    // =========================================================================
    // Clock
    // =========================================================================

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Administrative date correction (outside the end-of-day flow).
    pub fn set_date(&mut self, date: NaiveDate) {
        info!(from = %self.clock.today(), to = %date, "Business date set");
        self.clock.set_date(date);
    }

    /// Snapshot of the open day's report, as it would be closed now.
    pub fn snapshot_today(&mut self) -> ReportRow {
        let today = self.clock.today();
        ReportRow::new(today, self.reports.report_for(today))
    }

    /// Closes the current day: returns its snapshot and advances the date.
    ///
    /// Existing reports are left exactly as they are.
    pub fn end_day(&mut self) -> ReportRow {
        let snapshot = self.snapshot_today();
        let next = self.clock.advance();
        info!(
            closed = %snapshot.date,
            opened = %next,
            sales = snapshot.sales.cents(),
            expenses = snapshot.expenses.cents(),
            "Business day closed"
        );
        snapshot
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    pub fn ledger(&self) -> &ProductLedger {
        &self.ledger
    }

    pub fn products(&self) -> &[Product] {
        self.ledger.products()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.ledger.get(id)
    }

    pub fn add(&mut self, input: NewProduct) -> CoreResult<Product> {
        self.ledger.add(input, &self.clock, &mut self.reports)
    }

    pub fn add_with_id(&mut self, id: String, draft: ProductDraft) -> CoreResult<Product> {
        self.ledger.add_with_id(id, draft, &mut self.reports)
    }

    pub fn update(&mut self, changes: &ProductUpdate) -> CoreResult<Product> {
        self.ledger.update(changes, &self.clock, &mut self.reports)
    }

    pub fn delete(&mut self, id: &str) -> Option<Product> {
        self.ledger.delete(id, &self.clock, &mut self.reports)
    }

    pub fn deduct(&mut self, id: &str, qty: i64) -> CoreResult<Option<i64>> {
        self.ledger.deduct(id, qty)
    }

    pub fn deduct_many(&mut self, entries: &[UsageEntry]) -> Vec<UsageOutcome> {
        self.ledger.deduct_many(entries)
    }

    /// Records a daily-usage batch.
    pub fn apply_usage(&mut self, entries: &[UsageEntry]) -> UsageSummary {
        apply_usage(&mut self.ledger, entries)
    }

    pub fn low_stock_threshold(&self) -> i64 {
        self.low_stock_threshold
    }

    /// Products at or below the configured threshold.
    pub fn low_stock(&self) -> Vec<&Product> {
        self.ledger.low_stock(self.low_stock_threshold)
    }

    // =========================================================================
    // Reports
    // =========================================================================

    pub fn reports(&self) -> &DailyReportBook {
        &self.reports
    }

    pub fn report_for(&mut self, date: NaiveDate) -> DailyReport {
        self.reports.report_for(date)
    }

    pub fn today_report(&mut self) -> DailyReport {
        let today = self.clock.today();
        self.reports.report_for(today)
    }

    pub fn profit(&self, date: NaiveDate) -> Money {
        self.reports.profit(date)
    }

    pub fn profit_today(&self) -> Money {
        self.reports.profit(self.clock.today())
    }

    pub fn set_sales(&mut self, date: NaiveDate, amount: Money) {
        self.reports.set_sales(date, amount);
    }

    pub fn set_sales_input(&mut self, date: NaiveDate, input: &str) {
        self.reports.set_sales_input(date, input);
    }

    pub fn all_reports(&self) -> Vec<ReportRow> {
        self.reports.all_reports()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Rebuilds state from persisted products and closed-day snapshots.
    ///
    /// Snapshots are authoritative for their dates. Purchases on any date
    /// without a snapshot (normally just the open day) are re-booked.
    pub fn hydrate(&mut self, products: Vec<Product>, snapshots: Vec<ReportRow>) {
        self.reports.clear();

        let closed: BTreeSet<NaiveDate> = snapshots.iter().map(|row| row.date).collect();
        for row in snapshots {
            self.reports.restore(row);
        }
        for product in products.iter().filter(|p| !closed.contains(&p.purchase_date)) {
            self.reports
                .book_expense(product.purchase_date, product.total_price);
        }

        info!(
            products = products.len(),
            closed_days = closed.len(),
            "Inventory hydrated"
        );
        self.ledger.replace_all(products);
    }

    /// Drops all products and reports and reopens on `today`.
    pub fn reset(&mut self, today: NaiveDate) {
        self.ledger.clear();
        self.reports.clear();
        self.clock.set_date(today);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn rice() -> NewProduct {
        NewProduct::new("Rice", 50, "kg", Money::from_cents(200))
    }

    #[test]
    fn test_rice_scenario() {
        let mut inv = Inventory::new(day(1));

        let p = inv.add(rice()).unwrap();
        assert_eq!(inv.report_for(day(1)).expenses, Money::from_cents(10_000));

        assert_eq!(inv.deduct(&p.id, 20).unwrap(), Some(30));
        assert_eq!(inv.get(&p.id).unwrap().quantity, 30);
        assert_eq!(inv.report_for(day(1)).expenses, Money::from_cents(10_000));

        inv.set_sales(day(1), Money::from_cents(15_000));
        assert_eq!(inv.profit(day(1)), Money::from_cents(5_000));
        assert_eq!(inv.profit_today(), Money::from_cents(5_000));
    }

    #[test]
    fn test_doubling_quantity_on_open_day() {
        let mut inv = Inventory::new(day(1));
        let p = inv
            .add(NewProduct::new("Eggs", 10, "dozen", Money::from_cents(400)))
            .unwrap();
        assert_eq!(p.total_price, Money::from_cents(4000));

        let mut edit = ProductUpdate::from_product(&p);
        edit.quantity = 20;
        inv.update(&edit).unwrap();

        assert_eq!(inv.today_report().expenses, Money::from_cents(8000));
    }

    #[test]
    fn test_end_day_advances_without_touching_reports() {
        let mut inv = Inventory::new(day(1));
        inv.add(rice()).unwrap();
        inv.set_sales(day(1), Money::from_cents(300));
        let before = inv.all_reports();

        let snapshot = inv.end_day();

        assert_eq!(snapshot.date, day(1));
        assert_eq!(snapshot.expenses, Money::from_cents(10_000));
        assert_eq!(snapshot.profit, Money::from_cents(-9_700));
        assert_eq!(inv.today(), day(2));
        assert_eq!(inv.all_reports(), before);
    }

    #[test]
    fn test_mutations_after_end_day_hit_the_new_day() {
        let mut inv = Inventory::new(day(1));
        let first = inv.add(rice()).unwrap();
        inv.end_day();

        inv.add(NewProduct::new("Oil", 2, "bottle", Money::from_cents(500)))
            .unwrap();
        inv.delete(&first.id);

        assert_eq!(inv.report_for(day(1)).expenses, Money::from_cents(10_000));
        assert_eq!(inv.today_report().expenses, Money::from_cents(1000));
        assert_eq!(inv.all_reports().len(), 2);
    }

    #[test]
    fn test_low_stock_uses_configured_threshold() {
        let config = LedgerConfig::default().with_threshold(2);
        let mut inv = Inventory::with_config(day(1), &config);
        inv.add(NewProduct::new("Salt", 3, "kg", Money::zero()))
            .unwrap();
        inv.add(NewProduct::new("Yeast", 2, "pack", Money::zero()))
            .unwrap();

        let names: Vec<_> = inv.low_stock().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Yeast"]);
        assert_eq!(Inventory::new(day(1)).low_stock_threshold(), 10);
    }

    #[test]
    fn test_apply_usage_reports_each_entry() {
        let mut inv = Inventory::new(day(1));
        let p = inv.add(rice()).unwrap();

        let summary = inv.apply_usage(&[
            UsageEntry::new(&p.id, 10),
            UsageEntry::new("unknown", 10),
        ]);

        assert!(summary.is_partial());
        assert_eq!(inv.get(&p.id).unwrap().quantity, 40);
    }

    #[test]
    fn test_hydrate_restores_snapshots_and_rebooks_open_day() {
        let mut source = Inventory::new(day(1));
        source.add(rice()).unwrap();
        source.set_sales(day(1), Money::from_cents(500));
        let closed = source.end_day();
        source
            .add(NewProduct::new("Oil", 2, "bottle", Money::from_cents(500)))
            .unwrap();

        let mut restored = Inventory::new(day(2));
        restored.hydrate(source.products().to_vec(), vec![closed]);

        assert_eq!(restored.products().len(), 2);
        assert_eq!(restored.report_for(day(1)).sales, Money::from_cents(500));
        assert_eq!(restored.report_for(day(1)).expenses, Money::from_cents(10_000));
        assert_eq!(restored.today_report().expenses, Money::from_cents(1000));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut inv = Inventory::new(day(1));
        inv.add(rice()).unwrap();

        inv.reset(day(9));

        assert!(inv.products().is_empty());
        assert!(inv.all_reports().is_empty());
        assert_eq!(inv.today(), day(9));
    }

    #[test]
    fn test_set_date_redirects_new_purchases() {
        let mut inv = Inventory::new(day(5));
        inv.set_date(day(3));

        let p = inv.add(rice()).unwrap();

        assert_eq!(p.purchase_date, day(3));
        assert_eq!(inv.report_for(day(3)).expenses, Money::from_cents(10_000));
    }
}
