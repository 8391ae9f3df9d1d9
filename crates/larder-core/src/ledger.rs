//! # Product Ledger
//!
//! The in-memory product collection and its mutators.
//!
//! ## Expense Accounting
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation        Product                 Report (keyed by purchase_date)│
//! │  ───────────────  ──────────────────────  ───────────────────────────── │
//! │  add              push, stamp date        expenses += total             │
//! │  update (open)    replace, new total      expenses += new - old         │
//! │  update (closed)  replace, new total      untouched                     │
//! │  delete (open)    remove                  expenses -= total             │
//! │  delete (closed)  remove                  untouched                     │
//! │  deduct           quantity -= n (floor 0) untouched                     │
//! │                                                                         │
//! │  "open" = purchase_date == clock.today()                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The clock and the report book are not owned here; the owner passes them
//! in on every call that needs them.

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::clock::BusinessClock;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::report::DailyReportBook;
use crate::types::{NewProduct, Product, ProductDraft, ProductUpdate};
use crate::usage::{SkipReason, UsageEntry, UsageOutcome};
use crate::validation::validate_deduction;

/// Owns every [`Product`] record.
#[derive(Debug, Clone, Default)]
pub struct ProductLedger {
    products: Vec<Product>,
}

impl ProductLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All products in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products at or below `threshold`.
    pub fn low_stock(&self, threshold: i64) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.is_low_stock(threshold))
            .collect()
    }

    /// Sum of `total_price` for products booked under `date`.
    pub fn purchases_on(&self, date: NaiveDate) -> Money {
        self.products
            .iter()
            .filter(|p| p.purchase_date == date)
            .map(|p| p.total_price)
            .sum()
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Adds a product under a freshly generated id.
    ///
    /// The purchase date defaults to `clock.today()` and the purchase total is
    /// booked as an expense for that date.
    pub fn add(
        &mut self,
        input: NewProduct,
        clock: &BusinessClock,
        reports: &mut DailyReportBook,
    ) -> CoreResult<Product> {
        let draft = input.into_draft(clock.today())?;
        self.add_with_id(generate_product_id(), draft, reports)
    }

    /// Adds an already-validated draft under an id chosen elsewhere (the
    /// persistence backend).
    pub fn add_with_id(
        &mut self,
        id: String,
        draft: ProductDraft,
        reports: &mut DailyReportBook,
    ) -> CoreResult<Product> {
        if self.get(&id).is_some() {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: id,
            }
            .into());
        }

        let product = draft.into_product(id);
        reports.book_expense(product.purchase_date, product.total_price);

        debug!(
            id = %product.id,
            name = %product.name,
            total = product.total_price.cents(),
            purchase_date = %product.purchase_date,
            "Added product"
        );

        self.products.push(product.clone());
        Ok(product)
    }

    /// Computes what `update` would store, without storing it.
    pub fn preview_update(&self, changes: &ProductUpdate) -> CoreResult<Product> {
        changes.validate()?;
        let existing = self
            .get(&changes.id)
            .ok_or_else(|| CoreError::ProductNotFound(changes.id.clone()))?;
        Ok(changes.apply_to(existing)?)
    }

    /// Replaces a product's editable fields and recomputes its total.
    ///
    /// The expense delta is booked only while the product's purchase date is
    /// still the open business day; closed days are never revised.
    pub fn update(
        &mut self,
        changes: &ProductUpdate,
        clock: &BusinessClock,
        reports: &mut DailyReportBook,
    ) -> CoreResult<Product> {
        let updated = self.preview_update(changes)?;
        let slot = self
            .products
            .iter_mut()
            .find(|p| p.id == changes.id)
            .ok_or_else(|| CoreError::ProductNotFound(changes.id.clone()))?;

        if clock.is_open(slot.purchase_date) {
            reports.book_expense(slot.purchase_date, updated.total_price - slot.total_price);
        }

        debug!(
            id = %updated.id,
            old_total = slot.total_price.cents(),
            new_total = updated.total_price.cents(),
            "Updated product"
        );

        *slot = updated.clone();
        Ok(updated)
    }

    /// Removes a product. Unknown ids are a no-op.
    ///
    /// A product bought today takes its expense with it; one bought on a
    /// closed day leaves that day's report alone.
    pub fn delete(
        &mut self,
        id: &str,
        clock: &BusinessClock,
        reports: &mut DailyReportBook,
    ) -> Option<Product> {
        let index = self.products.iter().position(|p| p.id == id)?;
        let removed = self.products.remove(index);

        if clock.is_open(removed.purchase_date) {
            reports.book_expense(removed.purchase_date, -removed.total_price);
        }

        debug!(id = %removed.id, "Deleted product");
        Some(removed)
    }

    /// Computes the quantity `deduct` would leave, without storing it.
    ///
    /// `Ok(None)` for an unknown id.
    pub fn preview_deduct(&self, id: &str, qty: i64) -> CoreResult<Option<Product>> {
        validate_deduction(qty)?;
        Ok(self.get(id).map(|p| {
            let mut next = p.clone();
            next.quantity = remaining_after(p.quantity, qty);
            next
        }))
    }

    /// Consumes `qty` units of stock, never going below zero.
    ///
    /// Returns the remaining quantity, or `None` for an unknown id. Totals
    /// and reports are untouched: the stock was already paid for.
    pub fn deduct(&mut self, id: &str, qty: i64) -> CoreResult<Option<i64>> {
        validate_deduction(qty)?;

        let Some(product) = self.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        product.quantity = remaining_after(product.quantity, qty);
        debug!(id = %id, qty, remaining = product.quantity, "Deducted stock");
        Ok(Some(product.quantity))
    }

    /// Applies `deduct` to each entry, skipping the ones that cannot apply.
    pub fn deduct_many(&mut self, entries: &[UsageEntry]) -> Vec<UsageOutcome> {
        entries.iter().map(|entry| self.deduct_entry(entry)).collect()
    }

    fn deduct_entry(&mut self, entry: &UsageEntry) -> UsageOutcome {
        let before = match self.get(&entry.product_id) {
            Some(p) => p.quantity,
            None => 0,
        };

        match self.deduct(&entry.product_id, entry.quantity) {
            Ok(Some(remaining)) => UsageOutcome::Applied {
                product_id: entry.product_id.clone(),
                deducted: before - remaining,
                remaining,
            },
            Ok(None) => UsageOutcome::Skipped {
                product_id: entry.product_id.clone(),
                reason: SkipReason::UnknownProduct,
            },
            Err(_) => UsageOutcome::Skipped {
                product_id: entry.product_id.clone(),
                reason: SkipReason::NonPositiveQuantity,
            },
        }
    }

    /// Replaces the whole collection with records loaded from persistence.
    ///
    /// No expenses are booked; the caller rebuilds reports separately.
    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }
}

fn remaining_after(quantity: i64, qty: i64) -> i64 {
    quantity.saturating_sub(qty).max(0)
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    struct Fixture {
        clock: BusinessClock,
        reports: DailyReportBook,
        ledger: ProductLedger,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                clock: BusinessClock::new(day(1)),
                reports: DailyReportBook::new(),
                ledger: ProductLedger::new(),
            }
        }

        fn add(&mut self, name: &str, qty: i64, unit_cents: i64) -> Product {
            self.ledger
                .add(
                    NewProduct::new(name, qty, "kg", Money::from_cents(unit_cents)),
                    &self.clock,
                    &mut self.reports,
                )
                .unwrap()
        }

        fn expenses(&mut self, date: NaiveDate) -> Money {
            self.reports.report_for(date).expenses
        }
    }

    #[test]
    fn test_add_books_expense_on_purchase_date() {
        let mut fx = Fixture::new();
        let rice = fx.add("Rice", 50, 200);

        assert_eq!(rice.purchase_date, day(1));
        assert_eq!(rice.total_price, Money::from_cents(10_000));
        assert_eq!(fx.expenses(day(1)), Money::from_cents(10_000));
        assert_eq!(fx.ledger.len(), 1);
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let mut fx = Fixture::new();
        let a = fx.add("Rice", 1, 1);
        let b = fx.add("Rice", 1, 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_backdated_add_books_under_past_date() {
        let mut fx = Fixture::new();
        fx.clock.set_date(day(5));

        fx.ledger
            .add(
                NewProduct::new("Flour", 10, "kg", Money::from_cents(100)).purchased_on(day(3)),
                &fx.clock,
                &mut fx.reports,
            )
            .unwrap();

        assert_eq!(fx.expenses(day(3)), Money::from_cents(1000));
        assert_eq!(fx.expenses(day(5)), Money::zero());
    }

    #[test]
    fn test_add_rejects_invalid_input_without_mutation() {
        let mut fx = Fixture::new();
        let err = fx
            .ledger
            .add(
                NewProduct::new("Rice", -5, "kg", Money::from_cents(200)),
                &fx.clock,
                &mut fx.reports,
            )
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
        assert!(fx.ledger.is_empty());
        assert!(fx.reports.is_empty());
    }

    #[test]
    fn test_add_rejects_quantity_that_would_overflow_total() {
        let mut fx = Fixture::new();
        let err = fx
            .ledger
            .add(
                NewProduct::new("Bulk", i64::MAX / 2, "g", Money::from_cents(4)),
                &fx.clock,
                &mut fx.reports,
            )
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TooLarge { .. })
        ));
        assert!(fx.ledger.is_empty());
        assert!(fx.reports.is_empty());
    }

    #[test]
    fn test_update_rejects_oversized_values() {
        let mut fx = Fixture::new();
        let p = fx.add("Saffron", 1, 100);

        let mut edit = ProductUpdate::from_product(&p);
        edit.quantity = crate::MAX_QUANTITY + 1;
        let err = fx.ledger.update(&edit, &fx.clock, &mut fx.reports).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::TooLarge { .. })
        ));

        // both at their limits still fits
        edit.quantity = crate::MAX_QUANTITY;
        edit.unit_price = Money::from_cents(crate::MAX_UNIT_PRICE_CENTS);
        let updated = fx.ledger.update(&edit, &fx.clock, &mut fx.reports).unwrap();
        assert_eq!(updated.total_price.cents(), crate::MAX_TOTAL_PRICE_CENTS);
        assert_eq!(fx.expenses(day(1)).cents(), crate::MAX_TOTAL_PRICE_CENTS);
    }

    #[test]
    fn test_zero_priced_product_still_opens_report() {
        let mut fx = Fixture::new();
        let freebie = fx.add("Sample", 3, 0);

        assert_eq!(freebie.total_price, Money::zero());
        assert_eq!(
            fx.reports.get(day(1)).map(|r| r.expenses),
            Some(Money::zero())
        );
    }

    #[test]
    fn test_add_with_duplicate_id_is_rejected() {
        let mut fx = Fixture::new();
        let draft = NewProduct::new("Rice", 1, "kg", Money::from_cents(100))
            .into_draft(day(1))
            .unwrap();

        fx.ledger
            .add_with_id("p-1".to_string(), draft.clone(), &mut fx.reports)
            .unwrap();
        let err = fx
            .ledger
            .add_with_id("p-1".to_string(), draft, &mut fx.reports)
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Duplicate { .. })
        ));
        assert_eq!(fx.expenses(day(1)), Money::from_cents(100));
    }

    #[test]
    fn test_update_on_open_day_reconciles_delta() {
        let mut fx = Fixture::new();
        let p = fx.add("Beans", 10, 400);
        assert_eq!(fx.expenses(day(1)), Money::from_cents(4000));

        let mut edit = ProductUpdate::from_product(&p);
        edit.quantity = 20;
        let updated = fx.ledger.update(&edit, &fx.clock, &mut fx.reports).unwrap();

        assert_eq!(updated.total_price, Money::from_cents(8000));
        assert_eq!(fx.expenses(day(1)), Money::from_cents(8000));
    }

    #[test]
    fn test_update_on_closed_day_leaves_report_alone() {
        let mut fx = Fixture::new();
        let p = fx.add("Beans", 10, 400);
        fx.clock.advance();

        let mut edit = ProductUpdate::from_product(&p);
        edit.unit_price = Money::from_cents(900);
        let updated = fx.ledger.update(&edit, &fx.clock, &mut fx.reports).unwrap();

        assert_eq!(updated.total_price, Money::from_cents(9000));
        assert_eq!(updated.purchase_date, day(1));
        assert_eq!(fx.expenses(day(1)), Money::from_cents(4000));
        assert_eq!(fx.expenses(day(2)), Money::zero());
    }

    #[test]
    fn test_update_unknown_product_is_not_found() {
        let mut fx = Fixture::new();
        let p = fx.add("Beans", 10, 400);
        let mut edit = ProductUpdate::from_product(&p);
        edit.id = "missing".to_string();

        let err = fx.ledger.update(&edit, &fx.clock, &mut fx.reports).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(id) if id == "missing"));
    }

    #[test]
    fn test_update_validates_before_mutating() {
        let mut fx = Fixture::new();
        let p = fx.add("Beans", 10, 400);
        let mut edit = ProductUpdate::from_product(&p);
        edit.quantity = -1;

        assert!(fx.ledger.update(&edit, &fx.clock, &mut fx.reports).is_err());
        assert_eq!(fx.ledger.get(&p.id).unwrap().quantity, 10);
        assert_eq!(fx.expenses(day(1)), Money::from_cents(4000));
    }

    #[test]
    fn test_delete_on_open_day_reverses_expense() {
        let mut fx = Fixture::new();
        fx.add("Rice", 50, 200);
        let oil = fx.add("Oil", 2, 500);

        let removed = fx.ledger.delete(&oil.id, &fx.clock, &mut fx.reports);

        assert_eq!(removed.map(|p| p.id), Some(oil.id));
        assert_eq!(fx.expenses(day(1)), Money::from_cents(10_000));
        assert_eq!(fx.ledger.len(), 1);
    }

    #[test]
    fn test_delete_on_closed_day_keeps_expense() {
        let mut fx = Fixture::new();
        let oil = fx.add("Oil", 2, 500);
        fx.clock.advance();

        assert!(fx.ledger.delete(&oil.id, &fx.clock, &mut fx.reports).is_some());
        assert_eq!(fx.expenses(day(1)), Money::from_cents(1000));
        assert!(fx.ledger.is_empty());
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let mut fx = Fixture::new();
        fx.add("Oil", 2, 500);

        assert!(fx.ledger.delete("nope", &fx.clock, &mut fx.reports).is_none());
        assert_eq!(fx.ledger.len(), 1);
        assert_eq!(fx.expenses(day(1)), Money::from_cents(1000));
    }

    #[test]
    fn test_delete_then_readd_restores_expenses() {
        let mut fx = Fixture::new();
        fx.add("Rice", 50, 200);
        let oil = fx.add("Oil", 2, 500);
        let before = fx.expenses(day(1));

        fx.ledger.delete(&oil.id, &fx.clock, &mut fx.reports);
        fx.add("Oil", 2, 500);

        assert_eq!(fx.expenses(day(1)), before);
    }

    #[test]
    fn test_deduct_reduces_quantity_only() {
        let mut fx = Fixture::new();
        let rice = fx.add("Rice", 50, 200);

        assert_eq!(fx.ledger.deduct(&rice.id, 20).unwrap(), Some(30));

        let stored = fx.ledger.get(&rice.id).unwrap();
        assert_eq!(stored.quantity, 30);
        assert_eq!(stored.initial_quantity, 50);
        assert_eq!(stored.total_price, Money::from_cents(10_000));
        assert_eq!(fx.expenses(day(1)), Money::from_cents(10_000));
    }

    #[test]
    fn test_deduct_clamps_at_zero() {
        let mut fx = Fixture::new();
        let rice = fx.add("Rice", 5, 200);

        assert_eq!(fx.ledger.deduct(&rice.id, 500).unwrap(), Some(0));
        assert_eq!(fx.ledger.deduct(&rice.id, i64::MAX).unwrap(), Some(0));
    }

    #[test]
    fn test_deduct_rejects_non_positive() {
        let mut fx = Fixture::new();
        let rice = fx.add("Rice", 5, 200);

        assert!(fx.ledger.deduct(&rice.id, 0).is_err());
        assert!(fx.ledger.deduct(&rice.id, -4).is_err());
        assert_eq!(fx.ledger.get(&rice.id).unwrap().quantity, 5);
    }

    #[test]
    fn test_deduct_unknown_is_noop() {
        let mut fx = Fixture::new();
        assert_eq!(fx.ledger.deduct("ghost", 3).unwrap(), None);
    }

    #[test]
    fn test_deduct_many_skips_bad_entries() {
        let mut fx = Fixture::new();
        let rice = fx.add("Rice", 50, 200);
        let salt = fx.add("Salt", 3, 50);

        let outcomes = fx.ledger.deduct_many(&[
            UsageEntry::new(&rice.id, 5),
            UsageEntry::new("ghost", 2),
            UsageEntry::new(&salt.id, 0),
            UsageEntry::new(&salt.id, 99),
        ]);

        assert_eq!(
            outcomes,
            vec![
                UsageOutcome::Applied {
                    product_id: rice.id.clone(),
                    deducted: 5,
                    remaining: 45,
                },
                UsageOutcome::Skipped {
                    product_id: "ghost".to_string(),
                    reason: SkipReason::UnknownProduct,
                },
                UsageOutcome::Skipped {
                    product_id: salt.id.clone(),
                    reason: SkipReason::NonPositiveQuantity,
                },
                UsageOutcome::Applied {
                    product_id: salt.id.clone(),
                    deducted: 3,
                    remaining: 0,
                },
            ]
        );
        assert_eq!(fx.ledger.len(), 2);
    }

    #[test]
    fn test_low_stock_uses_inclusive_threshold() {
        let mut fx = Fixture::new();
        fx.add("Rice", 50, 200);
        let salt = fx.add("Salt", 10, 50);
        let yeast = fx.add("Yeast", 0, 50);

        let low: Vec<_> = fx.ledger.low_stock(10).iter().map(|p| p.id.clone()).collect();
        assert_eq!(low, vec![salt.id, yeast.id]);
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let mut fx = Fixture::new();
        let rice = fx.add("Rice", 50, 200);

        let preview = fx.ledger.preview_deduct(&rice.id, 60).unwrap().unwrap();
        assert_eq!(preview.quantity, 0);

        let mut edit = ProductUpdate::from_product(&rice);
        edit.quantity = 1;
        assert_eq!(fx.ledger.preview_update(&edit).unwrap().quantity, 1);

        assert_eq!(fx.ledger.get(&rice.id).unwrap().quantity, 50);
    }

    #[quickcheck]
    fn prop_deduct_never_negative(start: u16, cuts: Vec<u16>) -> bool {
        let mut fx = Fixture::new();
        let p = fx.add("Rice", i64::from(start), 1);

        cuts.into_iter().filter(|c| *c > 0).all(|c| {
            let remaining = fx.ledger.deduct(&p.id, i64::from(c)).unwrap().unwrap();
            let stored = fx.ledger.get(&p.id).unwrap();
            remaining >= 0 && stored.quantity <= stored.initial_quantity
        })
    }

    #[quickcheck]
    fn prop_expenses_match_surviving_purchases(items: Vec<(u8, u8, bool)>) -> bool {
        let mut fx = Fixture::new();

        for (qty, price, delete) in items {
            let p = fx.add("Item", i64::from(qty), i64::from(price));
            if delete {
                fx.ledger.delete(&p.id, &fx.clock, &mut fx.reports);
            }
        }

        fx.reports.get(day(1)).map(|r| r.expenses).unwrap_or_default()
            == fx.ledger.purchases_on(day(1))
    }
}
