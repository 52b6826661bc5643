//! The settlement result of filling an order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, AssetId, Order, OrderId};

/// Immutable record of one fill.
///
/// The filler paid `want_amount + fee` of `want_asset`; the owner received
/// `want_amount`, the fee account received `fee`, and the filler received
/// `give_amount` of `give_asset` from the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub order_id: OrderId,
    pub owner: AccountId,
    pub filler: AccountId,
    pub want_asset: AssetId,
    #[serde(with = "crate::balance::amount_str")]
    pub want_amount: Amount,
    pub give_asset: AssetId,
    #[serde(with = "crate::balance::amount_str")]
    pub give_amount: Amount,
    #[serde(with = "crate::balance::amount_str")]
    pub fee: Amount,
    pub fee_account: AccountId,
    /// The order's creation time, carried into the trade record.
    pub created_at: DateTime<Utc>,
}

impl Fill {
    #[must_use]
    pub fn from_order(order: &Order, filler: AccountId, fee: Amount, fee_account: AccountId) -> Self {
        Self {
            order_id: order.id,
            owner: order.owner,
            filler,
            want_asset: order.want_asset,
            want_amount: order.want_amount,
            give_asset: order.give_asset,
            give_amount: order.give_amount,
            fee,
            fee_account,
            created_at: order.created_at,
        }
    }

    /// Total the filler paid in `want_asset`.
    #[must_use]
    pub fn filler_cost(&self) -> Amount {
        self.want_amount.saturating_add(self.fee)
    }
}

impl std::fmt::Display for Fill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fill[{}] {} {} for {} {} (fee {})",
            self.order_id,
            self.want_amount,
            self.want_asset,
            self.give_amount,
            self.give_asset,
            self.fee,
        )
    }
}
