//! # Product Repository
//!
//! Database operations for the `products` table.
//!
//! ## Column Mapping
//! ```text
//! ┌──────────────────────────┬──────────────────────────────────────────────┐
//! │ products column          │ larder_core::Product field                   │
//! ├──────────────────────────┼──────────────────────────────────────────────┤
//! │ unit_price_cents         │ unit_price  (Money)                          │
//! │ total_price_cents        │ total_price (Money)                          │
//! │ purchase_date (TEXT)     │ purchase_date (NaiveDate)                    │
//! │ initial_quantity         │ initial_quantity, never lowered by updates   │
//! └──────────────────────────┴──────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use larder_core::{generate_product_id, Money, Product, ProductDraft, ProductFields};

/// A `products` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    quantity: i64,
    unit: String,
    unit_price_cents: i64,
    total_price_cents: i64,
    purchase_date: NaiveDate,
    initial_quantity: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            quantity: row.quantity,
            unit: row.unit,
            unit_price: Money::from_cents(row.unit_price_cents),
            total_price: Money::from_cents(row.total_price_cents),
            purchase_date: row.purchase_date,
            initial_quantity: row.initial_quantity,
        }
    }
}

const SELECT_PRODUCT: &str = r#"
    SELECT
        id,
        name,
        quantity,
        unit,
        unit_price_cents,
        total_price_cents,
        purchase_date,
        initial_quantity
    FROM products
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let rice = repo.insert(&draft).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// All products, ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!("{SELECT_PRODUCT} ORDER BY name, id"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Loaded products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!("{SELECT_PRODUCT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    /// Inserts a validated draft under a freshly generated id.
    pub async fn insert(&self, draft: &ProductDraft) -> DbResult<Product> {
        let product = draft.clone().into_product(generate_product_id());

        debug!(id = %product.id, name = %product.name, "Inserting product");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, quantity, unit,
                unit_price_cents, total_price_cents,
                purchase_date, initial_quantity,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.quantity)
        .bind(&product.unit)
        .bind(product.unit_price.cents())
        .bind(product.total_price.cents())
        .bind(product.purchase_date)
        .bind(product.initial_quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Overwrites the mutable fields and returns the stored record.
    ///
    /// `initial_quantity` is raised to the new quantity when that is higher.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update_fields(&self, id: &str, fields: &ProductFields) -> DbResult<Product> {
        debug!(id = %id, quantity = fields.quantity, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                quantity = ?3,
                unit = ?4,
                unit_price_cents = ?5,
                total_price_cents = ?6,
                initial_quantity = MAX(initial_quantity, ?3),
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(fields.quantity)
        .bind(&fields.unit)
        .bind(fields.unit_price.cents())
        .bind(fields.total_price.cents())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Hard-deletes a product. Its cost stays in any closed-day snapshot.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
