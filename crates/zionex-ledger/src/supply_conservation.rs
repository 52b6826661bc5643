//! Supply conservation invariant checker.
//!
//! Invariant enforced after every settlement:
//! ```text
//! ∀ asset: Σ balances(asset) == Σ deposits(asset) - Σ withdrawals(asset)
//! ```
//!
//! Internal transfers move funds between accounts but never change the
//! per-asset total, so any drift means funds were created or destroyed.

use std::collections::{BTreeSet, HashMap};

use zionex_types::{Amount, AssetId, ExchangeError, Result, checked_add};

/// Tracks per-asset deposit and withdrawal totals.
#[derive(Debug, Clone, Default)]
pub struct SupplyConservation {
    /// Total deposits per asset since genesis.
    deposits: HashMap<AssetId, Amount>,
    /// Total withdrawals per asset since genesis.
    withdrawals: HashMap<AssetId, Amount>,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deposit. Fails without effect if the running total overflows.
    pub fn record_deposit(&mut self, asset: AssetId, amount: Amount) -> Result<()> {
        let total = checked_add(self.total_deposits(asset), amount)?;
        self.deposits.insert(asset, total);
        Ok(())
    }

    /// Record a withdrawal. Fails without effect if the running total overflows.
    pub fn record_withdrawal(&mut self, asset: AssetId, amount: Amount) -> Result<()> {
        let total = checked_add(self.total_withdrawals(asset), amount)?;
        self.withdrawals.insert(asset, total);
        Ok(())
    }

    /// Undo a withdrawal whose release was refused by the collaborator.
    pub fn unrecord_withdrawal(&mut self, asset: AssetId, amount: Amount) -> Result<()> {
        let total = self
            .total_withdrawals(asset)
            .checked_sub(amount)
            .ok_or_else(|| ExchangeError::SupplyInvariantViolation {
                reason: format!("Asset {asset}: reverting {amount} exceeds recorded withdrawals"),
            })?;
        self.withdrawals.insert(asset, total);
        Ok(())
    }

    /// Expected total supply for an asset: deposits - withdrawals.
    #[must_use]
    pub fn expected_supply(&self, asset: AssetId) -> Amount {
        self.total_deposits(asset)
            .saturating_sub(self.total_withdrawals(asset))
    }

    /// Verify that the actual supply (sum of all balances) matches
    /// the expected supply for `asset`.
    ///
    /// # Errors
    /// Returns [`ExchangeError::SupplyInvariantViolation`] if actual ≠ expected.
    pub fn verify(&self, asset: AssetId, actual_supply: Amount) -> Result<()> {
        let expected = self.expected_supply(asset);
        if actual_supply != expected {
            return Err(ExchangeError::SupplyInvariantViolation {
                reason: format!(
                    "Asset {asset}: actual supply {actual_supply} != expected {expected} \
                     (deposits={}, withdrawals={})",
                    self.total_deposits(asset),
                    self.total_withdrawals(asset),
                ),
            });
        }
        Ok(())
    }

    /// All assets that ever saw a deposit or withdrawal.
    #[must_use]
    pub fn tracked_assets(&self) -> Vec<AssetId> {
        let assets: BTreeSet<AssetId> = self
            .deposits
            .keys()
            .chain(self.withdrawals.keys())
            .copied()
            .collect();
        assets.into_iter().collect()
    }

    #[must_use]
    pub fn total_deposits(&self, asset: AssetId) -> Amount {
        self.deposits.get(&asset).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_withdrawals(&self, asset: AssetId) -> Amount {
        self.withdrawals.get(&asset).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use zionex_types::Address;

    use super::*;

    fn token() -> AssetId {
        AssetId::token(Address::repeat_byte(0xaa))
    }

    #[test]
    fn empty_supply_is_zero() {
        let sc = SupplyConservation::new();
        assert_eq!(sc.expected_supply(AssetId::NATIVE), 0);
        assert!(sc.verify(AssetId::NATIVE, 0).is_ok());
    }

    #[test]
    fn deposits_and_withdrawals_net_out() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(token(), 1000).unwrap();
        sc.record_deposit(token(), 500).unwrap();
        sc.record_withdrawal(token(), 300).unwrap();
        assert_eq!(sc.expected_supply(token()), 1200);
        assert!(sc.verify(token(), 1200).is_ok());
    }

    #[test]
    fn verify_fails_when_imbalanced() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(AssetId::NATIVE, 10).unwrap();
        let err = sc.verify(AssetId::NATIVE, 11).unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::SupplyInvariantViolation { .. }
        ));
    }

    #[test]
    fn unrecord_restores_expected() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(token(), 10).unwrap();
        sc.record_withdrawal(token(), 4).unwrap();
        sc.unrecord_withdrawal(token(), 4).unwrap();
        assert_eq!(sc.expected_supply(token()), 10);
        assert!(sc.unrecord_withdrawal(token(), 1).is_err());
    }

    #[test]
    fn overflowing_deposit_leaves_total_unchanged() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(token(), Amount::MAX).unwrap();
        let err = sc.record_deposit(token(), 1).unwrap_err();
        assert!(matches!(err, ExchangeError::BalanceOverflow));
        assert_eq!(sc.total_deposits(token()), Amount::MAX);
    }

    #[test]
    fn tracked_assets_are_deduplicated() {
        let mut sc = SupplyConservation::new();
        sc.record_deposit(token(), 1).unwrap();
        sc.record_withdrawal(token(), 1).unwrap();
        sc.record_deposit(AssetId::NATIVE, 1).unwrap();
        assert_eq!(sc.tracked_assets(), vec![AssetId::NATIVE, token()]);
    }
}
