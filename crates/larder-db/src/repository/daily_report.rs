//! # Daily Report Repository
//!
//! Closed-day snapshots in the `daily_reports` table, one row per date.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use larder_core::{Money, ReportRow};

#[derive(Debug, sqlx::FromRow)]
struct DailyReportRow {
    date: NaiveDate,
    sales_cents: i64,
    expenses_cents: i64,
    profit_cents: i64,
}

impl From<DailyReportRow> for ReportRow {
    fn from(row: DailyReportRow) -> Self {
        ReportRow {
            date: row.date,
            sales: Money::from_cents(row.sales_cents),
            expenses: Money::from_cents(row.expenses_cents),
            profit: Money::from_cents(row.profit_cents),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DailyReportRepository {
    pool: SqlitePool,
}

impl DailyReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DailyReportRepository { pool }
    }

    /// Stores a closed day. Closing the same date again replaces the row.
    pub async fn upsert(&self, row: &ReportRow) -> DbResult<()> {
        debug!(date = %row.date, profit = row.profit.cents(), "Saving daily report");

        sqlx::query(
            r#"
            INSERT INTO daily_reports (date, sales_cents, expenses_cents, profit_cents, closed_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(date) DO UPDATE SET
                sales_cents = excluded.sales_cents,
                expenses_cents = excluded.expenses_cents,
                profit_cents = excluded.profit_cents,
                closed_at = excluded.closed_at
            "#,
        )
        .bind(row.date)
        .bind(row.sales.cents())
        .bind(row.expenses.cents())
        .bind(row.profit.cents())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Every snapshot, most recent first.
    pub async fn list(&self) -> DbResult<Vec<ReportRow>> {
        let rows: Vec<DailyReportRow> = sqlx::query_as(
            r#"
            SELECT date, sales_cents, expenses_cents, profit_cents
            FROM daily_reports
            ORDER BY date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReportRow::from).collect())
    }

    pub async fn get(&self, date: NaiveDate) -> DbResult<Option<ReportRow>> {
        let row: Option<DailyReportRow> = sqlx::query_as(
            r#"
            SELECT date, sales_cents, expenses_cents, profit_cents
            FROM daily_reports
            WHERE date = ?1
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ReportRow::from))
    }

    /// Most recently closed business date.
    pub async fn latest_date(&self) -> DbResult<Option<NaiveDate>> {
        let date: Option<NaiveDate> =
            sqlx::query_scalar("SELECT date FROM daily_reports ORDER BY date DESC LIMIT 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use larder_core::DailyReport;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn row(d: u32, sales: i64, expenses: i64) -> ReportRow {
        ReportRow::new(
            day(d),
            DailyReport {
                sales: Money::from_cents(sales),
                expenses: Money::from_cents(expenses),
            },
        )
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.daily_reports();

        repo.upsert(&row(1, 100, 40)).await.unwrap();
        repo.upsert(&row(3, 0, 500)).await.unwrap();
        repo.upsert(&row(2, 900, 0)).await.unwrap();

        let dates: Vec<_> = repo.list().await.unwrap().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(3), day(2), day(1)]);
        assert_eq!(repo.latest_date().await.unwrap(), Some(day(3)));
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_date() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.daily_reports();

        repo.upsert(&row(1, 100, 40)).await.unwrap();
        repo.upsert(&row(1, 300, 40)).await.unwrap();

        let stored = repo.get(day(1)).await.unwrap().unwrap();
        assert_eq!(stored.sales, Money::from_cents(300));
        assert_eq!(stored.profit, Money::from_cents(260));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_table_has_no_latest_date() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(db.daily_reports().latest_date().await.unwrap(), None);
    }
}
