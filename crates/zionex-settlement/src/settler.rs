//! Atomic fill settlement.
//!
//! A fill moves three amounts between accounts already custodied by the
//! ledger:
//! 1. filler → owner: `want_amount` of `want_asset`
//! 2. filler → fee account: `fee` of `want_asset`
//! 3. owner → filler: `give_amount` of `give_asset`
//!
//! Both parties' funding is checked up front, then the legs run inside
//! [`BalanceLedger::atomically`] so no partial fill is ever visible.

use zionex_ledger::BalanceLedger;
use zionex_types::{AccountId, Amount, ExchangeConfig, ExchangeError, Fill, Order, Result, checked_add};

/// `floor(want_amount * fee_percent / 100)`.
///
/// # Errors
/// Returns `BalanceOverflow` if the intermediate product overflows.
pub fn compute_fee(want_amount: Amount, fee_percent: u32) -> Result<Amount> {
    want_amount
        .checked_mul(Amount::from(fee_percent))
        .map(|scaled| scaled / 100)
        .ok_or(ExchangeError::BalanceOverflow)
}

/// Settles fills for one exchange instance.
#[derive(Debug, Clone)]
pub struct Settler {
    /// Account credited with the fee leg.
    fee_account: AccountId,
    /// Percent of `want_amount` charged to the filler.
    fee_percent: u32,
}

impl Settler {
    #[must_use]
    pub fn new(fee_account: AccountId, fee_percent: u32) -> Self {
        Self {
            fee_account,
            fee_percent,
        }
    }

    #[must_use]
    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self::new(config.fee_account, config.fee_percent)
    }

    #[must_use]
    pub fn fee_account(&self) -> AccountId {
        self.fee_account
    }

    #[must_use]
    pub fn fee_percent(&self) -> u32 {
        self.fee_percent
    }

    /// Settle `order` against `filler` atomically.
    ///
    /// Does not look at the order's status; the order book only hands
    /// open orders to the settler.
    ///
    /// # Errors
    /// - `InsufficientBalance` if either party is short
    /// - `BalanceOverflow` if a credit or the fee overflows
    /// - `SupplyInvariantViolation` if conservation breaks
    pub fn settle(&self, ledger: &mut BalanceLedger, order: &Order, filler: AccountId) -> Result<Fill> {
        // 1. Fee, in the asset the filler provides
        let fee = compute_fee(order.want_amount, self.fee_percent)?;
        let filler_cost = checked_add(order.want_amount, fee)?;

        // 2. Funding checks for both parties
        ledger.ensure_available(order.want_asset, filler, filler_cost)?;
        ledger.ensure_available(order.give_asset, order.owner, order.give_amount)?;

        // 3–4. Legs plus conservation check as one unit
        ledger.atomically(|l| {
            l.internal_transfer(order.want_asset, filler, order.owner, order.want_amount)?;
            l.internal_transfer(order.want_asset, filler, self.fee_account, fee)?;
            l.internal_transfer(order.give_asset, order.owner, filler, order.give_amount)?;
            l.verify_supply(order.want_asset)?;
            l.verify_supply(order.give_asset)
        })?;

        tracing::debug!(
            order = %order.id,
            filler = %filler,
            fee,
            "settled fill"
        );
        Ok(Fill::from_order(order, filler, fee, self.fee_account))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use zionex_types::units::{ether, tokens};
    use zionex_types::{Address, AssetId, OrderId, OrderStatus};

    use super::*;

    struct Parties {
        owner: AccountId,
        filler: AccountId,
        fee_account: AccountId,
        token: AssetId,
    }

    fn parties() -> Parties {
        Parties {
            owner: Address::random(),
            filler: Address::random(),
            fee_account: Address::random(),
            token: AssetId::token(Address::random()),
        }
    }

    /// Owner wants 1 token and gives 1 ether.
    fn order(p: &Parties) -> Order {
        Order {
            id: OrderId(1),
            owner: p.owner,
            want_asset: p.token,
            want_amount: tokens(1),
            give_asset: AssetId::NATIVE,
            give_amount: ether(1),
            created_at: Utc::now(),
            status: OrderStatus::Open,
        }
    }

    fn funded_ledger(p: &Parties) -> BalanceLedger {
        let mut ledger = BalanceLedger::new();
        ledger.credit_deposit(AssetId::NATIVE, p.owner, ether(1)).unwrap();
        ledger.credit_deposit(p.token, p.filler, tokens(2)).unwrap();
        ledger
    }

    #[test]
    fn fee_rounds_down() {
        assert_eq!(compute_fee(tokens(1), 10).unwrap(), tokens(1) / 10);
        assert_eq!(compute_fee(9, 10).unwrap(), 0);
        assert_eq!(compute_fee(19, 10).unwrap(), 1);
        assert_eq!(compute_fee(0, 10).unwrap(), 0);
        assert_eq!(compute_fee(100, 0).unwrap(), 0);
    }

    #[test]
    fn fee_overflow_is_an_error() {
        let err = compute_fee(Amount::MAX, 10).unwrap_err();
        assert!(matches!(err, ExchangeError::BalanceOverflow));
    }

    #[test]
    fn settle_transfers_all_legs() {
        let p = parties();
        let mut ledger = funded_ledger(&p);
        let settler = Settler::new(p.fee_account, 10);

        let fill = settler.settle(&mut ledger, &order(&p), p.filler).unwrap();

        assert_eq!(fill.fee, tokens(1) / 10);
        assert_eq!(ledger.balance_of(p.token, p.owner), tokens(1));
        assert_eq!(ledger.balance_of(p.token, p.filler), tokens(2) - tokens(1) - tokens(1) / 10);
        assert_eq!(ledger.balance_of(p.token, p.fee_account), tokens(1) / 10);
        assert_eq!(ledger.balance_of(AssetId::NATIVE, p.filler), ether(1));
        assert_eq!(ledger.balance_of(AssetId::NATIVE, p.owner), 0);
        ledger.verify_supply(p.token).unwrap();
        ledger.verify_supply(AssetId::NATIVE).unwrap();
    }

    #[test]
    fn filler_short_by_fee_fails_without_effect() {
        let p = parties();
        let mut ledger = BalanceLedger::new();
        ledger.credit_deposit(AssetId::NATIVE, p.owner, ether(1)).unwrap();
        // Covers want_amount but not the fee.
        ledger.credit_deposit(p.token, p.filler, tokens(1)).unwrap();
        let settler = Settler::new(p.fee_account, 10);

        let err = settler.settle(&mut ledger, &order(&p), p.filler).unwrap_err();

        assert!(matches!(err, ExchangeError::InsufficientBalance { account, .. } if account == p.filler));
        assert_eq!(ledger.balance_of(p.token, p.filler), tokens(1));
        assert_eq!(ledger.balance_of(p.token, p.owner), 0);
        assert_eq!(ledger.balance_of(AssetId::NATIVE, p.owner), ether(1));
    }

    #[test]
    fn owner_short_fails_without_effect() {
        let p = parties();
        let mut ledger = BalanceLedger::new();
        ledger.credit_deposit(p.token, p.filler, tokens(2)).unwrap();
        let settler = Settler::new(p.fee_account, 10);

        let err = settler.settle(&mut ledger, &order(&p), p.filler).unwrap_err();

        assert!(matches!(err, ExchangeError::InsufficientBalance { account, .. } if account == p.owner));
        assert_eq!(ledger.balance_of(p.token, p.filler), tokens(2));
        assert_eq!(ledger.balance_of(p.token, p.fee_account), 0);
    }

    #[test]
    fn same_asset_self_fill_rolls_back_when_short() {
        // Owner fills their own order on a single asset: each check passes on
        // its own but the combined legs cannot all run.
        let p = parties();
        let mut ledger = BalanceLedger::new();
        ledger.credit_deposit(p.token, p.owner, 110).unwrap();
        let settler = Settler::new(p.fee_account, 10);
        let order = Order {
            want_asset: p.token,
            want_amount: 100,
            give_asset: p.token,
            give_amount: 110,
            ..order(&p)
        };

        let err = settler.settle(&mut ledger, &order, p.owner).unwrap_err();

        assert!(matches!(err, ExchangeError::InsufficientBalance { .. }));
        assert_eq!(ledger.balance_of(p.token, p.owner), 110);
        assert_eq!(ledger.balance_of(p.token, p.fee_account), 0);
        ledger.verify_supply(p.token).unwrap();
    }

    #[test]
    fn zero_amount_order_settles_with_zero_fee() {
        let p = parties();
        let mut ledger = BalanceLedger::new();
        let settler = Settler::new(p.fee_account, 10);
        let order = Order {
            want_amount: 0,
            give_amount: 0,
            ..order(&p)
        };
        let fill = settler.settle(&mut ledger, &order, p.filler).unwrap();
        assert_eq!(fill.fee, 0);
    }
}
