//! Balance types for the custodial ledger.
//!
//! Balances are unsigned quantities of an asset's smallest indivisible
//! unit. There are no fractional units inside the ledger; see
//! [`crate::units`] for conversions from human-readable amounts.

use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetId, ExchangeError, Result};

/// Quantity of an asset in its smallest indivisible unit.
pub type Amount = u128;

/// Serde adapter writing an [`Amount`] as a decimal string.
///
/// JSON numbers lose precision past 2^53 in most consumers, and 18-decimal
/// balances routinely exceed that.
pub mod amount_str {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Amount;

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A single `(asset, account)` balance, as reported by ledger listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceEntry {
    pub asset: AssetId,
    pub account: AccountId,
    #[serde(with = "amount_str")]
    pub amount: Amount,
}

/// `a + b`, failing with [`ExchangeError::BalanceOverflow`] instead of wrapping.
pub fn checked_add(a: Amount, b: Amount) -> Result<Amount> {
    a.checked_add(b).ok_or(ExchangeError::BalanceOverflow)
}
