//! The fungible-token collaborator.
//!
//! The exchange only ever calls `transfer`, `transfer_from` and
//! `balance_of`. `approve` / `allowance` are used by account holders
//! directly before depositing. Failures are reported as `false`, the way
//! the external contract reports them; the exchange maps them to errors.

use std::collections::HashMap;

use zionex_types::{AccountId, Address, Amount, AssetId, constants, units};

/// Narrow interface onto an external token ledger.
///
/// `caller` is the authenticated account invoking the token, i.e. the
/// exchange's custody address when the exchange moves funds.
pub trait TokenCollaborator {
    /// The token's own address, which is its [`AssetId`].
    fn asset(&self) -> AssetId;

    /// Move `amount` from `caller` to `to`.
    fn transfer(&mut self, caller: AccountId, to: AccountId, amount: Amount) -> bool;

    /// Move `amount` from `from` to `to`, spending `caller`'s allowance.
    fn transfer_from(&mut self, caller: AccountId, from: AccountId, to: AccountId, amount: Amount) -> bool;

    fn balance_of(&self, account: AccountId) -> Amount;
}

/// In-memory reference token ("Zion Token").
///
/// The full supply is minted to the deployer. Transfers to the zero
/// address, beyond the sender's balance, or beyond the spender's
/// allowance are refused.
#[derive(Debug, Clone)]
pub struct StandardToken {
    address: Address,
    name: String,
    symbol: String,
    decimals: u32,
    total_supply: Amount,
    balances: HashMap<AccountId, Amount>,
    /// `(owner, spender) -> remaining allowance`.
    allowances: HashMap<(AccountId, AccountId), Amount>,
}

impl StandardToken {
    /// Deploy the reference token at `address`, minting the supply to `deployer`.
    #[must_use]
    pub fn deploy(address: Address, deployer: AccountId) -> Self {
        let total_supply = units::tokens(constants::TOKEN_TOTAL_SUPPLY_WHOLE);
        let mut balances = HashMap::new();
        balances.insert(deployer, total_supply);
        Self {
            address,
            name: constants::TOKEN_NAME.to_string(),
            symbol: constants::TOKEN_SYMBOL.to_string(),
            decimals: constants::TOKEN_DECIMALS,
            total_supply,
            balances,
            allowances: HashMap::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Let `spender` move up to `amount` of `caller`'s tokens. Overwrites
    /// any previous allowance.
    pub fn approve(&mut self, caller: AccountId, spender: AccountId, amount: Amount) -> bool {
        if spender.is_zero() {
            return false;
        }
        self.allowances.insert((caller, spender), amount);
        true
    }

    #[must_use]
    pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    fn move_balance(&mut self, from: AccountId, to: AccountId, amount: Amount) -> bool {
        if to.is_zero() {
            return false;
        }
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return false;
        }
        if from == to {
            return true;
        }
        let Some(to_balance) = self.balance_of(to).checked_add(amount) else {
            return false;
        };
        self.balances.insert(from, from_balance - amount);
        self.balances.insert(to, to_balance);
        true
    }
}

impl TokenCollaborator for StandardToken {
    fn asset(&self) -> AssetId {
        AssetId::token(self.address)
    }

    fn transfer(&mut self, caller: AccountId, to: AccountId, amount: Amount) -> bool {
        self.move_balance(caller, to, amount)
    }

    fn transfer_from(&mut self, caller: AccountId, from: AccountId, to: AccountId, amount: Amount) -> bool {
        let allowance = self.allowance(from, caller);
        if allowance < amount {
            return false;
        }
        if !self.move_balance(from, to, amount) {
            return false;
        }
        self.allowances.insert((from, caller), allowance - amount);
        true
    }

    fn balance_of(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(0)
    }
}
