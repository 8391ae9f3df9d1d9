//! # Domain Types
//!
//! Core domain types used throughout Larder.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  NewProduct ──validate──► ProductDraft ──assign id──► Product           │
//! │  (form input)             (dates resolved)            (ledger record)   │
//! │                                                                         │
//! │  ProductUpdate ──apply──► Product ──► ProductFields (remote update)     │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   DailyReport   │   │   ReportRow     │       │
//! │  │  id (UUID)      │   │  sales          │   │  date           │       │
//! │  │  quantity       │   │  expenses       │   │  sales/expenses │       │
//! │  │  unit_price     │   │  profit()       │   │  profit         │       │
//! │  │  total_price    │   └─────────────────┘   └─────────────────┘       │
//! │  │  purchase_date  │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Fields
//! `total_price` and `initial_quantity` freeze the purchase. Deducting usage
//! lowers `quantity` only; the money was already spent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::validation::{
    line_total, validate_product_name, validate_quantity, validate_total_price, validate_unit,
    validate_unit_price, ValidationResult,
};

// =============================================================================
// Product
// =============================================================================

/// A stock item in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4, or whatever the backend assigned).
    pub id: String,

    /// Display name ("Rice", "Olive Oil").
    pub name: String,

    /// On-hand quantity. Never negative.
    pub quantity: i64,

    /// Unit of measure ("kg", "bottle").
    pub unit: String,

    /// Purchase price per unit.
    pub unit_price: Money,

    /// Purchase total booked as an expense (quantity × unit_price at the
    /// last add/update, or an explicit override).
    pub total_price: Money,

    /// Business date the purchase is booked under.
    #[ts(as = "String")]
    pub purchase_date: NaiveDate,

    /// Quantity at purchase time.
    pub initial_quantity: i64,
}

impl Product {
    /// Checks if the product is at or below the low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.quantity <= threshold
    }

    /// Quantity consumed since purchase.
    #[inline]
    pub fn consumed(&self) -> i64 {
        self.initial_quantity - self.quantity
    }

    /// Fields sent to the persistence collaborator on update.
    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            quantity: self.quantity,
            unit: self.unit.clone(),
            unit_price: self.unit_price,
            total_price: self.total_price,
        }
    }
}

// =============================================================================
// New Product (add input)
// =============================================================================

/// Input for adding a product.
///
/// ## Example
/// ```rust
/// use larder_core::{Money, NewProduct};
///
/// let rice = NewProduct::new("Rice", 50, "kg", Money::from_cents(200));
/// assert!(rice.total_price.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub unit_price: Money,
    /// Overrides `quantity × unit_price` (e.g. a bulk discount).
    #[serde(default)]
    pub total_price: Option<Money>,
    /// Backdates the purchase. Defaults to the current business date.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub purchase_date: Option<NaiveDate>,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        quantity: i64,
        unit: impl Into<String>,
        unit_price: Money,
    ) -> Self {
        NewProduct {
            name: name.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            total_price: None,
            purchase_date: None,
        }
    }

    /// Sets an explicit purchase total.
    pub fn with_total_price(mut self, total: Money) -> Self {
        self.total_price = Some(total);
        self
    }

    /// Books the purchase under `date` instead of today.
    pub fn purchased_on(mut self, date: NaiveDate) -> Self {
        self.purchase_date = Some(date);
        self
    }

    /// Validates the input and resolves defaults against `today`.
    pub fn into_draft(self, today: NaiveDate) -> ValidationResult<ProductDraft> {
        validate_product_name(&self.name)?;
        validate_unit(&self.unit)?;
        validate_quantity(self.quantity)?;
        validate_unit_price(self.unit_price)?;

        let total_price = match self.total_price {
            Some(total) => {
                validate_total_price(total)?;
                total
            }
            None => line_total(self.unit_price, self.quantity)?,
        };

        Ok(ProductDraft {
            name: self.name.trim().to_string(),
            quantity: self.quantity,
            unit: self.unit.trim().to_string(),
            unit_price: self.unit_price,
            total_price,
            purchase_date: self.purchase_date.unwrap_or(today),
        })
    }
}

/// A validated product without an id.
///
/// This is what gets sent to the backend's insert; the id comes back with
/// the created record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub unit_price: Money,
    pub total_price: Money,
    pub purchase_date: NaiveDate,
}

impl ProductDraft {
    /// Attaches an id, snapshotting the initial quantity.
    pub fn into_product(self, id: String) -> Product {
        Product {
            id,
            initial_quantity: self.quantity,
            name: self.name,
            quantity: self.quantity,
            unit: self.unit,
            unit_price: self.unit_price,
            total_price: self.total_price,
            purchase_date: self.purchase_date,
        }
    }
}

// =============================================================================
// Product Update
// =============================================================================

/// Edited product fields, looked up by `id`.
///
/// `purchase_date` and `total_price` are not editable: the date is fixed at
/// creation and the total is recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductUpdate {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub unit_price: Money,
}

impl ProductUpdate {
    /// Starts an edit from the current record.
    pub fn from_product(product: &Product) -> Self {
        ProductUpdate {
            id: product.id.clone(),
            name: product.name.clone(),
            quantity: product.quantity,
            unit: product.unit.clone(),
            unit_price: product.unit_price,
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validate_product_name(&self.name)?;
        validate_unit(&self.unit)?;
        validate_quantity(self.quantity)?;
        validate_unit_price(self.unit_price)?;
        Ok(())
    }

    /// Produces the updated record. Total is recomputed from the new values.
    pub fn apply_to(&self, existing: &Product) -> ValidationResult<Product> {
        Ok(Product {
            id: existing.id.clone(),
            name: self.name.trim().to_string(),
            quantity: self.quantity,
            unit: self.unit.trim().to_string(),
            unit_price: self.unit_price,
            total_price: line_total(self.unit_price, self.quantity)?,
            purchase_date: existing.purchase_date,
            initial_quantity: existing.initial_quantity.max(self.quantity),
        })
    }
}

/// Mutable product fields as persisted by `update_product`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    pub name: String,
    pub quantity: i64,
    pub unit: String,
    pub unit_price: Money,
    pub total_price: Money,
}

// =============================================================================
// Reports
// =============================================================================

/// Sales and expenses accumulated for one business date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyReport {
    pub sales: Money,
    pub expenses: Money,
}

impl DailyReport {
    /// Profit is derived, never stored.
    #[inline]
    pub fn profit(&self) -> Money {
        self.sales - self.expenses
    }
}

/// One row of the report history, also the end-of-day snapshot payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportRow {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub sales: Money,
    pub expenses: Money,
    pub profit: Money,
}

impl ReportRow {
    pub fn new(date: NaiveDate, report: DailyReport) -> Self {
        ReportRow {
            date,
            sales: report.sales,
            expenses: report.expenses,
            profit: report.profit(),
        }
    }

    pub fn report(&self) -> DailyReport {
        DailyReport {
            sales: self.sales,
            expenses: self.expenses,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
