//! # Ledger Configuration
//!
//! Policy knobs loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`LARDER_*`)
//! 2. Defaults (this file)
//!
//! Read-only after construction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::validation::parse_business_date;
use crate::DEFAULT_LOW_STOCK_THRESHOLD;

/// Decimal places `format_currency` will honour.
const MAX_CURRENCY_DECIMALS: u8 = 18;

/// Inventory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerConfig {
    /// Products with `quantity <= low_stock_threshold` show up in the
    /// low-stock view.
    pub low_stock_threshold: i64,

    /// Business date to open on. `None` lets the store decide (resume after
    /// the last closed day, or the wall-clock date on a fresh install).
    pub opening_date: Option<NaiveDate>,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            opening_date: None,
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
        }
    }
}

impl LedgerConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `LARDER_LOW_STOCK_THRESHOLD`: integer threshold (e.g. "5")
    /// - `LARDER_BUSINESS_DATE`: opening business date (`YYYY-MM-DD`)
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = LedgerConfig::default();

        if let Ok(raw) = std::env::var("LARDER_LOW_STOCK_THRESHOLD") {
            match raw.trim().parse::<i64>() {
                Ok(threshold) => config.low_stock_threshold = threshold,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring LARDER_LOW_STOCK_THRESHOLD"),
            }
        }

        if let Ok(raw) = std::env::var("LARDER_BUSINESS_DATE") {
            match parse_business_date(&raw) {
                Ok(date) => config.opening_date = Some(date),
                Err(e) => warn!(value = %raw, error = %e, "Ignoring LARDER_BUSINESS_DATE"),
            }
        }

        config
    }

    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    pub fn opening_on(mut self, date: NaiveDate) -> Self {
        self.opening_date = Some(date);
        self
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ```rust
    /// use larder_core::LedgerConfig;
    ///
    /// let config = LedgerConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        // 10^18 is the largest power of ten an i64 holds
        let decimals = self.currency_decimals.min(MAX_CURRENCY_DECIMALS);
        let divisor = 10_i64.pow(u32::from(decimals));
        let whole = (cents / divisor).unsigned_abs();
        let frac = (cents % divisor).unsigned_abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if decimals > 0 {
                format!("{}.{:0width$}", whole, frac, width = usize::from(decimals))
            } else {
                whole.to_string()
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.low_stock_threshold, 10);
        assert!(config.opening_date.is_none());
    }

    #[test]
    fn test_builders() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let config = LedgerConfig::default().with_threshold(3).opening_on(date);
        assert_eq!(config.low_stock_threshold, 3);
        assert_eq!(config.opening_date, Some(date));
    }

    #[test]
    fn test_format_currency() {
        let config = LedgerConfig::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(-1234), "-$12.34");

        let yen = LedgerConfig {
            currency_symbol: "¥".to_string(),
            currency_decimals: 0,
            ..LedgerConfig::default()
        };
        assert_eq!(yen.format_currency(500), "¥500");
    }

    #[test]
    fn test_format_currency_caps_decimals() {
        let config = LedgerConfig {
            currency_decimals: 30,
            ..LedgerConfig::default()
        };
        assert_eq!(config.format_currency(5), "$0.000000000000000005");

        let yen = LedgerConfig {
            currency_decimals: 0,
            ..LedgerConfig::default()
        };
        assert_eq!(yen.format_currency(i64::MIN), "-$9223372036854775808");
    }

    #[test]
    fn test_config_serializes_camel_case() {
        let json = serde_json::to_value(LedgerConfig::default()).unwrap();
        assert_eq!(json["lowStockThreshold"], 10);
    }
}
