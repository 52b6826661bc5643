//! Order types for the zionex order book.
//!
//! An order is a standing offer: the owner gives `give_amount` of
//! `give_asset` to whoever pays `want_amount` of `want_asset`. Funding is
//! not reserved at creation; it is checked when the order is filled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, AssetId, OrderId};

/// Lifecycle status of an order.
///
/// `Open` is the only initial state; `Filled` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    Filled,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Filled | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Filled => write!(f, "FILLED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Core order record. Retained permanently once terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner: AccountId,
    pub want_asset: AssetId,
    #[serde(with = "crate::balance::amount_str")]
    pub want_amount: Amount,
    pub give_asset: AssetId,
    #[serde(with = "crate::balance::amount_str")]
    pub give_amount: Amount,
    /// Informational only; never used for ordering or matching.
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Address;

    fn dummy(status: OrderStatus) -> Order {
        Order {
            id: OrderId(1),
            owner: Address::repeat_byte(1),
            want_asset: AssetId::token(Address::repeat_byte(9)),
            want_amount: 10,
            give_asset: AssetId::NATIVE,
            give_amount: 20,
            created_at: Utc::now(),
            status,
        }
    }

    #[test]
    fn terminal_states() {
        assert!(!OrderStatus::Open.is_terminal());
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn status_display() {
        assert_eq!(format!("{}", OrderStatus::Open), "OPEN");
        assert_eq!(format!("{}", OrderStatus::Filled), "FILLED");
    }

    #[test]
    fn is_open_tracks_status() {
        assert!(dummy(OrderStatus::Open).is_open());
        assert!(!dummy(OrderStatus::Filled).is_open());
    }
}
