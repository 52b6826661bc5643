//! Native-asset value release.
//!
//! Native deposits arrive as value attached to the call, so only the
//! outbound direction needs a collaborator.

use std::collections::HashMap;

use zionex_types::{AccountId, Amount};

/// Sends native value out of custody.
pub trait NativeTransfer {
    /// Release `amount` to `to`. Returns `false` if the recipient refused it.
    fn send(&mut self, to: AccountId, amount: Amount) -> bool;
}

/// In-memory native balances held outside the exchange.
#[derive(Debug, Clone, Default)]
pub struct NativeWallets {
    balances: HashMap<AccountId, Amount>,
    /// Accounts that refuse incoming value.
    refusing: Vec<AccountId>,
}

impl NativeWallets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// Make `account` reject every future `send`.
    pub fn refuse_incoming(&mut self, account: AccountId) {
        if !self.refusing.contains(&account) {
            self.refusing.push(account);
        }
    }
}

impl NativeTransfer for NativeWallets {
    fn send(&mut self, to: AccountId, amount: Amount) -> bool {
        if self.refusing.contains(&to) {
            return false;
        }
        let Some(balance) = self.balance_of(to).checked_add(amount) else {
            return false;
        };
        self.balances.insert(to, balance);
        true
    }
}
