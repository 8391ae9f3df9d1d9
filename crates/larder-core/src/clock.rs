//! # Business Clock
//!
//! The single source of "today" for the ledger and the report book.
//!
//! ```text
//!   set_date(d) ──────────────┐
//!                             ▼
//!   ... ──► 2024-03-01 ──advance──► 2024-03-02 ──advance──► ...
//! ```
//!
//! The wall clock is never consulted here. Whoever constructs the clock picks
//! the opening date, which keeps report bucketing deterministic in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Holds the current business date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessClock {
    today: NaiveDate,
}

impl BusinessClock {
    pub fn new(today: NaiveDate) -> Self {
        BusinessClock { today }
    }

    /// Current business date.
    #[inline]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Moves to the next calendar day and returns it.
    pub fn advance(&mut self) -> NaiveDate {
        // NaiveDate::MAX has no successor
        self.today = self.today.succ_opt().unwrap_or(self.today);
        self.today
    }

    /// Administrative correction: jump to any date, past or future.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.today = date;
    }

    /// True if `date` is the open (current) business day.
    #[inline]
    pub fn is_open(&self, date: NaiveDate) -> bool {
        self.today == date
    }
}
