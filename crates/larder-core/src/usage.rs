//! # Usage Deduction Engine
//!
//! Applies the daily-usage form (a batch of `product_id → quantity used`)
//! against the ledger.
//!
//! ## Best Effort, Per-Entry Results
//! ```text
//! entries:   [Rice −5]     [Ghost −2]        [Oil 0]            [Salt −99]
//!               │              │                 │                   │
//!               ▼              ▼                 ▼                   ▼
//! outcome:   Applied       Skipped           Skipped             Applied
//!            remaining 45  UnknownProduct    NonPositiveQuantity remaining 0
//! ```
//!
//! Entries are independent: there is no atomicity and nothing is rolled back
//! when a later entry cannot be resolved. Every entry gets an outcome so the
//! caller can show what was skipped.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;

use crate::ledger::ProductLedger;

/// One line of the daily-usage form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UsageEntry {
    pub product_id: String,
    pub quantity: i64,
}

impl UsageEntry {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        UsageEntry {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Why an entry was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SkipReason {
    UnknownProduct,
    NonPositiveQuantity,
}

/// Result of applying one [`UsageEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
#[ts(export)]
pub enum UsageOutcome {
    /// Stock was reduced. `deducted` is what was actually removed, which is
    /// less than requested when the entry hit the zero floor.
    Applied {
        product_id: String,
        deducted: i64,
        remaining: i64,
    },
    /// Entry was ignored; nothing changed.
    Skipped {
        product_id: String,
        reason: SkipReason,
    },
    /// The persistence collaborator rejected the write; nothing changed
    /// locally for this entry.
    Failed { product_id: String, message: String },
}

impl UsageOutcome {
    pub fn product_id(&self) -> &str {
        match self {
            UsageOutcome::Applied { product_id, .. }
            | UsageOutcome::Skipped { product_id, .. }
            | UsageOutcome::Failed { product_id, .. } => product_id,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, UsageOutcome::Applied { .. })
    }
}

/// Outcomes of a whole batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UsageSummary {
    pub outcomes: Vec<UsageOutcome>,
}

impl UsageSummary {
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, UsageOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, UsageOutcome::Failed { .. }))
            .count()
    }

    /// True when some entries went through and some did not.
    pub fn is_partial(&self) -> bool {
        let applied = self.applied();
        applied > 0 && applied < self.outcomes.len()
    }

    /// True when every entry was applied (vacuously true for an empty batch).
    pub fn is_complete(&self) -> bool {
        self.applied() == self.outcomes.len()
    }

    pub(crate) fn log(&self) {
        for outcome in &self.outcomes {
            match outcome {
                UsageOutcome::Skipped { product_id, reason } => {
                    warn!(product_id = %product_id, ?reason, "Usage entry skipped");
                }
                UsageOutcome::Failed {
                    product_id,
                    message,
                } => {
                    warn!(product_id = %product_id, error = %message, "Usage entry failed");
                }
                UsageOutcome::Applied { .. } => {}
            }
        }
        info!(
            applied = self.applied(),
            skipped = self.skipped(),
            failed = self.failed(),
            "Usage batch applied"
        );
    }
}

/// Applies a usage batch to the ledger, entry by entry.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use larder_core::usage::{apply_usage, UsageEntry};
/// use larder_core::{BusinessClock, DailyReportBook, Money, NewProduct, ProductLedger};
///
/// let clock = BusinessClock::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
/// let mut reports = DailyReportBook::new();
/// let mut ledger = ProductLedger::new();
/// let rice = ledger
///     .add(NewProduct::new("Rice", 50, "kg", Money::from_cents(200)), &clock, &mut reports)
///     .unwrap();
///
/// let summary = apply_usage(
///     &mut ledger,
///     &[UsageEntry::new(&rice.id, 20), UsageEntry::new("missing", 1)],
/// );
/// assert_eq!(summary.applied(), 1);
/// assert_eq!(summary.skipped(), 1);
/// assert_eq!(ledger.get(&rice.id).unwrap().quantity, 30);
/// ```
pub fn apply_usage(ledger: &mut ProductLedger, entries: &[UsageEntry]) -> UsageSummary {
    let summary = UsageSummary {
        outcomes: ledger.deduct_many(entries),
    };
    summary.log();
    summary
}
