//! Records emitted for every committed state change.
//!
//! The field sets are part of the external contract: monitors consume them
//! without knowledge of ledger internals. Serialized with an `"event"` tag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, AssetId, Fill, Order, OrderId};

/// One audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    Deposit {
        asset: AssetId,
        account: AccountId,
        #[serde(with = "crate::balance::amount_str")]
        amount: Amount,
        #[serde(with = "crate::balance::amount_str")]
        new_balance: Amount,
    },
    Withdraw {
        asset: AssetId,
        account: AccountId,
        #[serde(with = "crate::balance::amount_str")]
        amount: Amount,
        #[serde(with = "crate::balance::amount_str")]
        new_balance: Amount,
    },
    /// An order was created.
    Order {
        id: OrderId,
        owner: AccountId,
        want_asset: AssetId,
        #[serde(with = "crate::balance::amount_str")]
        want_amount: Amount,
        give_asset: AssetId,
        #[serde(with = "crate::balance::amount_str")]
        give_amount: Amount,
        created_at: DateTime<Utc>,
    },
    Cancel {
        id: OrderId,
        owner: AccountId,
        want_asset: AssetId,
        #[serde(with = "crate::balance::amount_str")]
        want_amount: Amount,
        give_asset: AssetId,
        #[serde(with = "crate::balance::amount_str")]
        give_amount: Amount,
        created_at: DateTime<Utc>,
    },
    Trade {
        id: OrderId,
        owner: AccountId,
        want_asset: AssetId,
        #[serde(with = "crate::balance::amount_str")]
        want_amount: Amount,
        give_asset: AssetId,
        #[serde(with = "crate::balance::amount_str")]
        give_amount: Amount,
        filler: AccountId,
        created_at: DateTime<Utc>,
    },
}

impl LedgerEvent {
    #[must_use]
    pub fn order_created(order: &Order) -> Self {
        Self::Order {
            id: order.id,
            owner: order.owner,
            want_asset: order.want_asset,
            want_amount: order.want_amount,
            give_asset: order.give_asset,
            give_amount: order.give_amount,
            created_at: order.created_at,
        }
    }

    #[must_use]
    pub fn cancelled(order: &Order) -> Self {
        Self::Cancel {
            id: order.id,
            owner: order.owner,
            want_asset: order.want_asset,
            want_amount: order.want_amount,
            give_asset: order.give_asset,
            give_amount: order.give_amount,
            created_at: order.created_at,
        }
    }

    #[must_use]
    pub fn trade(fill: &Fill) -> Self {
        Self::Trade {
            id: fill.order_id,
            owner: fill.owner,
            want_asset: fill.want_asset,
            want_amount: fill.want_amount,
            give_asset: fill.give_asset,
            give_amount: fill.give_amount,
            filler: fill.filler,
            created_at: fill.created_at,
        }
    }

    /// Record name, as monitors filter on it.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "Deposit",
            Self::Withdraw { .. } => "Withdraw",
            Self::Order { .. } => "Order",
            Self::Cancel { .. } => "Cancel",
            Self::Trade { .. } => "Trade",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Address, OrderStatus};

    fn order() -> Order {
        Order {
            id: OrderId(1),
            owner: Address::repeat_byte(1),
            want_asset: AssetId::token(Address::repeat_byte(2)),
            want_amount: 1,
            give_asset: AssetId::NATIVE,
            give_amount: 2,
            created_at: Utc::now(),
            status: OrderStatus::Open,
        }
    }

    #[test]
    fn serialized_tag_matches_name() {
        let event = LedgerEvent::order_created(&order());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "Order");
        assert_eq!(json["id"], 1);
        assert_eq!(event.name(), "Order");
    }

    #[test]
    fn trade_record_carries_filler() {
        let o = order();
        let filler = Address::repeat_byte(5);
        let fill = Fill::from_order(&o, filler, 0, Address::repeat_byte(6));
        match LedgerEvent::trade(&fill) {
            LedgerEvent::Trade { id, owner, filler: f, .. } => {
                assert_eq!(id, o.id);
                assert_eq!(owner, o.owner);
                assert_eq!(f, filler);
            }
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[test]
    fn deposit_serde_roundtrip() {
        let event = LedgerEvent::Deposit {
            asset: AssetId::NATIVE,
            account: Address::repeat_byte(3),
            amount: 10,
            new_balance: 10,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: LedgerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
