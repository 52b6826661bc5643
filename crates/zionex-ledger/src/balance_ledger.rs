//! The custodial balance ledger.
//!
//! Tracks per-(asset, account) balances. Every mutation is atomic: either
//! the full operation succeeds or the ledger is unchanged. Multi-step
//! mutations run inside [`BalanceLedger::atomically`], which journals each
//! write and replays the journal backwards on failure.

use std::collections::HashMap;

use zionex_types::{AccountId, Amount, AssetId, BalanceEntry, ExchangeError, Result, checked_add};

use crate::supply_conservation::SupplyConservation;

type BalanceKey = (AssetId, AccountId);

/// Source of truth for every balance held by the exchange.
///
/// Deposits and withdrawals also update the [`SupplyConservation`]
/// totals; internal transfers only move funds between accounts.
#[derive(Debug, Default)]
pub struct BalanceLedger {
    /// Per-(asset, account) balances.
    balances: HashMap<BalanceKey, Amount>,
    /// Deposit/withdraw totals per asset.
    supply: SupplyConservation,
    /// Prior values of keys written inside an open `atomically` scope.
    journal: Option<Vec<(BalanceKey, Amount)>>,
}

impl BalanceLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance; zero if the account never held the asset.
    #[must_use]
    pub fn balance_of(&self, asset: AssetId, account: AccountId) -> Amount {
        self.balances.get(&(asset, account)).copied().unwrap_or(0)
    }

    /// Fail with `InsufficientBalance` unless `account` holds `needed`.
    pub fn ensure_available(&self, asset: AssetId, account: AccountId, needed: Amount) -> Result<()> {
        let available = self.balance_of(asset, account);
        if available < needed {
            return Err(ExchangeError::InsufficientBalance {
                asset,
                account,
                needed,
                available,
            });
        }
        Ok(())
    }

    /// Fail with `BalanceOverflow` if crediting `amount` would overflow the
    /// account balance or the asset's deposit total.
    pub fn ensure_creditable(&self, asset: AssetId, account: AccountId, amount: Amount) -> Result<()> {
        checked_add(self.balance_of(asset, account), amount)?;
        checked_add(self.supply.total_deposits(asset), amount)?;
        Ok(())
    }

    /// Credit funds that have already entered custody. Returns the new balance.
    pub fn credit_deposit(&mut self, asset: AssetId, account: AccountId, amount: Amount) -> Result<Amount> {
        let new_balance = checked_add(self.balance_of(asset, account), amount)?;
        self.supply.record_deposit(asset, amount)?;
        self.write((asset, account), new_balance);
        Ok(new_balance)
    }

    /// Debit funds about to leave custody. Returns the new balance.
    ///
    /// Callers must apply this before handing funds to any collaborator.
    pub fn debit_withdrawal(&mut self, asset: AssetId, account: AccountId, amount: Amount) -> Result<Amount> {
        self.ensure_available(asset, account, amount)?;
        let new_balance = self.balance_of(asset, account) - amount;
        self.supply.record_withdrawal(asset, amount)?;
        self.write((asset, account), new_balance);
        Ok(new_balance)
    }

    /// Undo a [`Self::debit_withdrawal`] whose release was refused.
    pub fn reverse_withdrawal(&mut self, asset: AssetId, account: AccountId, amount: Amount) -> Result<Amount> {
        let restored = checked_add(self.balance_of(asset, account), amount)?;
        self.supply.unrecord_withdrawal(asset, amount)?;
        self.write((asset, account), restored);
        Ok(restored)
    }

    /// Move `amount` from `from` to `to` without leaving custody.
    pub fn internal_transfer(
        &mut self,
        asset: AssetId,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<()> {
        self.ensure_available(asset, from, amount)?;
        if from == to {
            return Ok(());
        }
        let to_balance = checked_add(self.balance_of(asset, to), amount)?;
        let from_balance = self.balance_of(asset, from) - amount;
        self.write((asset, from), from_balance);
        self.write((asset, to), to_balance);
        tracing::debug!(%asset, from = %from, to = %to, amount, "internal transfer");
        Ok(())
    }

    /// Run `f` as one unit: if it returns an error, every balance write and
    /// supply update it made is discarded. Nested calls join the outer unit.
    pub fn atomically<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.journal.is_some() {
            return f(self);
        }
        let supply_before = self.supply.clone();
        self.journal = Some(Vec::new());
        let result = f(self);
        let journal = self.journal.take().unwrap_or_default();
        if result.is_err() {
            for (key, previous) in journal.into_iter().rev() {
                self.balances.insert(key, previous);
            }
            self.supply = supply_before;
        }
        result
    }

    /// Sum of every account's balance of `asset`.
    #[must_use]
    pub fn total_supply(&self, asset: AssetId) -> Amount {
        self.balances
            .iter()
            .filter(|((a, _), _)| *a == asset)
            .fold(0, |acc: Amount, (_, amount)| acc.saturating_add(*amount))
    }

    /// Check the conservation invariant for `asset`.
    pub fn verify_supply(&self, asset: AssetId) -> Result<()> {
        self.supply.verify(asset, self.total_supply(asset))
    }

    /// Non-zero balances held by `account`, ordered by asset.
    #[must_use]
    pub fn balances_of(&self, account: AccountId) -> Vec<BalanceEntry> {
        let mut entries: Vec<BalanceEntry> = self
            .balances
            .iter()
            .filter(|((_, owner), amount)| *owner == account && **amount > 0)
            .map(|(&(asset, account), &amount)| BalanceEntry {
                asset,
                account,
                amount,
            })
            .collect();
        entries.sort_by_key(|e| e.asset);
        entries
    }

    /// Deposit/withdraw totals.
    #[must_use]
    pub fn supply(&self) -> &SupplyConservation {
        &self.supply
    }

    fn write(&mut self, key: BalanceKey, value: Amount) {
        let previous = self.balances.insert(key, value).unwrap_or(0);
        if let Some(journal) = self.journal.as_mut() {
            journal.push((key, previous));
        }
    }
}
