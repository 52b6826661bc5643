//! The order book.
//!
//! Uses a `BTreeMap<OrderId, Order>` so listings come out in creation
//! order. Ids start at 1 and are never reused.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use zionex_ledger::BalanceLedger;
use zionex_settlement::Settler;
use zionex_types::{AccountId, Amount, AssetId, ExchangeError, Fill, Order, OrderId, OrderStatus, Result};

/// All orders of one exchange instance.
#[derive(Debug, Default)]
pub struct OrderBook {
    /// Every order ever created, terminal ones included.
    orders: BTreeMap<OrderId, Order>,
    /// Last allocated id; `OrderId(0)` before the first order.
    last_id: OrderId,
}

impl OrderBook {
    /// Create a new empty order book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =================================================================
    // Creation
    // =================================================================

    /// Store a new `Open` order under the next id.
    ///
    /// No funding check happens here; the give side is checked at fill time.
    /// Zero amounts are accepted.
    pub fn make_order(
        &mut self,
        owner: AccountId,
        want_asset: AssetId,
        want_amount: Amount,
        give_asset: AssetId,
        give_amount: Amount,
        created_at: DateTime<Utc>,
    ) -> &Order {
        let id = self.last_id.next();
        self.last_id = id;
        let order = Order {
            id,
            owner,
            want_asset,
            want_amount,
            give_asset,
            give_amount,
            created_at,
            status: OrderStatus::Open,
        };
        tracing::info!(order = %id, owner = %owner, "order created");
        self.orders.entry(id).or_insert(order)
    }

    // =================================================================
    // Cancellation
    // =================================================================

    /// Cancel an open order on behalf of its owner. Returns the updated record.
    ///
    /// # Errors
    /// - `OrderNotFound` if `id` was never allocated
    /// - `Unauthorized` if `caller` is not the owner
    /// - `OrderNotOpen` if the order is already filled or cancelled
    pub fn cancel_order(&mut self, id: OrderId, caller: AccountId) -> Result<&Order> {
        let order = self
            .orders
            .get_mut(&id)
            .ok_or(ExchangeError::OrderNotFound(id))?;
        if order.owner != caller {
            return Err(ExchangeError::Unauthorized { id, caller });
        }
        if !order.is_open() {
            return Err(ExchangeError::OrderNotOpen {
                id,
                status: order.status,
            });
        }
        order.status = OrderStatus::Cancelled;
        tracing::info!(order = %id, owner = %caller, "order cancelled");
        Ok(&*order)
    }

    // =================================================================
    // Fill
    // =================================================================

    /// Fill an open order: settle it through `settler` against `ledger`,
    /// then mark it `Filled`. On error nothing changes.
    ///
    /// # Errors
    /// - `OrderNotFound` if `id` was never allocated
    /// - `OrderNotOpen` if the order is already filled or cancelled
    /// - any settlement error (`InsufficientBalance`, ...)
    pub fn fill_order(
        &mut self,
        id: OrderId,
        filler: AccountId,
        settler: &Settler,
        ledger: &mut BalanceLedger,
    ) -> Result<Fill> {
        let order = self
            .orders
            .get_mut(&id)
            .ok_or(ExchangeError::OrderNotFound(id))?;
        if !order.is_open() {
            return Err(ExchangeError::OrderNotOpen {
                id,
                status: order.status,
            });
        }
        let fill = settler.settle(ledger, order, filler)?;
        order.status = OrderStatus::Filled;
        tracing::info!(order = %id, filler = %filler, fee = fill.fee, "order filled");
        Ok(fill)
    }

    // =================================================================
    // Queries
    // =================================================================

    #[must_use]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// Number of orders ever created (equals the last allocated id).
    #[must_use]
    pub fn order_count(&self) -> u64 {
        self.last_id.0
    }

    #[must_use]
    pub fn is_filled(&self, id: OrderId) -> bool {
        self.status(id) == Some(OrderStatus::Filled)
    }

    #[must_use]
    pub fn is_cancelled(&self, id: OrderId) -> bool {
        self.status(id) == Some(OrderStatus::Cancelled)
    }

    #[must_use]
    pub fn status(&self, id: OrderId) -> Option<OrderStatus> {
        self.orders.get(&id).map(|o| o.status)
    }

    /// Open orders in creation order.
    pub fn open_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values().filter(|o| o.is_open())
    }

    /// Every order owned by `owner`, in creation order.
    pub fn orders_of(&self, owner: AccountId) -> impl Iterator<Item = &Order> {
        self.orders.values().filter(move |o| o.owner == owner)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
