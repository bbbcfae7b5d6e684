//! Runtime settings shared by the ingestion layer and the CLI.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settings for reading obligation records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleConfig {
    /// Maximum number of fractional digits an amount may carry
    /// (2 = cents). Amounts with more digits are rejected, not rounded.
    pub minor_unit_scale: u32,
    /// Largest amount a single record may carry.
    pub max_amount: Decimal,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            minor_unit_scale: 2,
            max_amount: Decimal::from(1_000_000_000_000u64),
        }
    }
}
