//! # Daily Report Book
//!
//! Date-keyed sales and expense totals.
//!
//! ## Who Writes What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ProductLedger ──book_expense(purchase_date, ±delta)──┐                 │
//! │                                                       ▼                 │
//! │                                          ┌──────────────────────┐       │
//! │  Sales form ──set_sales(date, amount)──► │ BTreeMap<NaiveDate,  │       │
//! │              (replaces, never adds)      │   DailyReport>       │       │
//! │                                          └──────────┬───────────┘       │
//! │                                                     │                   │
//! │                     report_for / profit / all_reports (read views)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reports are created lazily and never removed.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::money::Money;
use crate::types::{DailyReport, ReportRow};

/// Owns every [`DailyReport`], keyed by business date.
#[derive(Debug, Clone, Default)]
pub struct DailyReportBook {
    reports: BTreeMap<NaiveDate, DailyReport>,
}

impl DailyReportBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the report for `date`, creating an empty one on first access.
    pub fn report_for(&mut self, date: NaiveDate) -> DailyReport {
        *self.reports.entry(date).or_default()
    }

    /// Reads a report without creating it.
    pub fn get(&self, date: NaiveDate) -> Option<&DailyReport> {
        self.reports.get(&date)
    }

    /// Replaces the sales figure for `date`.
    ///
    /// Negative amounts coerce to zero. Callers wanting running totals add
    /// to the current figure themselves.
    pub fn set_sales(&mut self, date: NaiveDate, amount: Money) {
        let amount = amount.clamp_non_negative();
        debug!(%date, sales = amount.cents(), "Setting sales");
        self.reports.entry(date).or_default().sales = amount;
    }

    /// Sets sales from raw form input. Anything that does not parse is zero.
    pub fn set_sales_input(&mut self, date: NaiveDate, input: &str) {
        self.set_sales(date, Money::parse(input).unwrap_or_default());
    }

    /// `sales - expenses` for `date`; zero for a date with no report.
    pub fn profit(&self, date: NaiveDate) -> Money {
        self.get(date).map(DailyReport::profit).unwrap_or_default()
    }

    /// Every report, most recent first. Rebuilt on each call.
    pub fn all_reports(&self) -> Vec<ReportRow> {
        self.reports
            .iter()
            .rev()
            .map(|(date, report)| ReportRow::new(*date, *report))
            .collect()
    }

    /// Reinstates a persisted snapshot, overwriting whatever is held for
    /// that date.
    pub fn restore(&mut self, row: ReportRow) {
        self.reports.insert(row.date, row.report());
    }

    /// Most recent date with a report.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.reports.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn clear(&mut self) {
        self.reports.clear();
    }

    /// Adds `delta` (possibly negative) to the expenses of `date`.
    ///
    /// The date's report exists afterwards even when `delta` is zero.
    pub(crate) fn book_expense(&mut self, date: NaiveDate, delta: Money) {
        let report = self.reports.entry(date).or_default();
        if delta.is_zero() {
            return;
        }
        report.expenses = report.expenses.saturating_add(delta);
        debug!(%date, delta = delta.cents(), expenses = report.expenses.cents(), "Booked expense");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_report_for_creates_lazily_and_idempotently() {
        let mut book = DailyReportBook::new();
        assert!(book.get(day(1)).is_none());

        assert_eq!(book.report_for(day(1)), DailyReport::default());
        assert_eq!(book.report_for(day(1)), DailyReport::default());
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_set_sales_replaces() {
        let mut book = DailyReportBook::new();
        book.set_sales(day(1), Money::from_cents(100));
        book.set_sales(day(1), Money::from_cents(250));

        assert_eq!(book.report_for(day(1)).sales, Money::from_cents(250));
    }

    #[test]
    fn test_set_sales_coerces_bad_input_to_zero() {
        let mut book = DailyReportBook::new();
        book.set_sales(day(1), Money::from_cents(500));

        book.set_sales(day(1), Money::from_cents(-20));
        assert_eq!(book.report_for(day(1)).sales, Money::zero());

        book.set_sales_input(day(2), "41.50");
        assert_eq!(book.report_for(day(2)).sales, Money::from_cents(4150));

        book.set_sales_input(day(2), "lots");
        assert_eq!(book.report_for(day(2)).sales, Money::zero());

        book.set_sales_input(day(2), "-3");
        assert_eq!(book.report_for(day(2)).sales, Money::zero());
    }

    #[test]
    fn test_profit_is_derived() {
        let mut book = DailyReportBook::new();
        book.book_expense(day(1), Money::from_cents(100));
        book.set_sales(day(1), Money::from_cents(150));
        assert_eq!(book.profit(day(1)), Money::from_cents(50));

        book.book_expense(day(1), Money::from_cents(100));
        assert_eq!(book.profit(day(1)), Money::from_cents(-50));

        assert_eq!(book.profit(day(9)), Money::zero());
    }

    #[test]
    fn test_zero_expense_still_opens_report() {
        let mut book = DailyReportBook::new();
        book.book_expense(day(3), Money::zero());

        assert_eq!(book.get(day(3)), Some(&DailyReport::default()));
        let dates: Vec<_> = book.all_reports().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(3)]);
    }

    #[test]
    fn test_all_reports_most_recent_first() {
        let mut book = DailyReportBook::new();
        book.book_expense(day(2), Money::from_cents(10));
        book.book_expense(day(5), Money::from_cents(50));
        book.set_sales(day(1), Money::from_cents(7));

        let dates: Vec<_> = book.all_reports().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(5), day(2), day(1)]);

        // recomputed from current state
        book.set_sales(day(5), Money::from_cents(80));
        assert_eq!(book.all_reports()[0].profit, Money::from_cents(30));
        assert_eq!(book.latest_date(), Some(day(5)));
    }

    #[test]
    fn test_restore_overwrites() {
        let mut book = DailyReportBook::new();
        book.book_expense(day(1), Money::from_cents(10));

        book.restore(ReportRow::new(
            day(1),
            DailyReport {
                sales: Money::from_cents(300),
                expenses: Money::from_cents(120),
            },
        ));

        assert_eq!(book.profit(day(1)), Money::from_cents(180));
    }
}
