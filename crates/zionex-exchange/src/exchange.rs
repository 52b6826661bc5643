//! The exchange: one instance owns all ledger and order-book state.
//!
//! Every operation takes the authenticated `caller` explicitly. Each either
//! commits fully and appends exactly one audit record, or fails and leaves
//! balances, orders and the audit log exactly as they were.
//!
//! Funds leave custody only through a collaborator call in `withdraw_*`,
//! and the ledger debit always happens before that call. The collaborator
//! is handed in by `&mut` while the exchange is itself mutably borrowed, so
//! it has no path back into the exchange until the call returns.

use chrono::{DateTime, Utc};
use zionex_ledger::{BalanceLedger, NativeTransfer, TokenCollaborator};
use zionex_orderbook::OrderBook;
use zionex_settlement::Settler;
use zionex_types::{
    AccountId, Amount, AssetId, BalanceEntry, ExchangeConfig, ExchangeError, Fill, LedgerEvent,
    Order, OrderId, Result,
};

use crate::audit::{AuditLog, AuditRecord};
use crate::clock::{Clock, SystemClock};

/// Where withdrawn funds are released to.
pub enum Payout<'a> {
    /// Native value channel.
    Native(&'a mut dyn NativeTransfer),
    /// The token collaborator for the withdrawn asset.
    Token(&'a mut dyn TokenCollaborator),
}

/// Ledger, order book and settlement for one custodial exchange.
pub struct Exchange {
    /// The exchange's own custody address on token collaborators.
    address: AccountId,
    config: ExchangeConfig,
    ledger: BalanceLedger,
    book: OrderBook,
    settler: Settler,
    audit: AuditLog,
    clock: Box<dyn Clock>,
    /// Latest `created_at` handed out; keeps timestamps monotonic.
    last_timestamp: Option<DateTime<Utc>>,
}

impl Exchange {
    /// Initialise an exchange with its custody address and fee settings.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` fails validation.
    pub fn new(address: AccountId, config: ExchangeConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            address = %address,
            fee_account = %config.fee_account,
            fee_percent = config.fee_percent,
            "exchange initialised"
        );
        Ok(Self {
            address,
            settler: Settler::from_config(&config),
            config,
            ledger: BalanceLedger::new(),
            book: OrderBook::new(),
            audit: AuditLog::new(),
            clock: Box::new(SystemClock),
            last_timestamp: None,
        })
    }

    /// Replace the time source used for order timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn address(&self) -> AccountId {
        self.address
    }

    #[must_use]
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    #[must_use]
    pub fn fee_account(&self) -> AccountId {
        self.settler.fee_account()
    }

    #[must_use]
    pub fn fee_percent(&self) -> u32 {
        self.settler.fee_percent()
    }

    // =================================================================
    // Deposits
    // =================================================================

    /// Credit native value attached to the call. Zero is accepted.
    /// Returns the new balance.
    pub fn deposit_native(&mut self, caller: AccountId, value: Amount) -> Result<Amount> {
        let new_balance = self.ledger.credit_deposit(AssetId::NATIVE, caller, value)?;
        self.record_deposit(AssetId::NATIVE, caller, value, new_balance);
        Ok(new_balance)
    }

    /// Pull `amount` of `token` from `caller` (who must have approved this
    /// exchange's address) and credit it. Returns the new balance.
    ///
    /// # Errors
    /// - `UnsupportedAsset` if the collaborator reports the native asset id
    /// - `CollaboratorTransferFailed` if the pull is refused
    pub fn deposit_token(
        &mut self,
        caller: AccountId,
        token: &mut dyn TokenCollaborator,
        amount: Amount,
    ) -> Result<Amount> {
        let asset = token.asset();
        if asset.is_native() {
            return Err(ExchangeError::UnsupportedAsset {
                asset,
                reason: "native asset must be deposited with deposit_native".into(),
            });
        }
        // Never pull funds the ledger could not then credit.
        self.ledger.ensure_creditable(asset, caller, amount)?;

        if !token.transfer_from(self.address, caller, self.address, amount) {
            tracing::warn!(%asset, account = %caller, amount, "token pull refused");
            return Err(ExchangeError::CollaboratorTransferFailed {
                asset,
                reason: format!("transfer_from of {amount} from {caller} refused"),
            });
        }

        let new_balance = self.ledger.credit_deposit(asset, caller, amount)?;
        self.record_deposit(asset, caller, amount, new_balance);
        Ok(new_balance)
    }

    /// Plain native value sent without `deposit_native`. Always rejected.
    #[allow(clippy::unused_self)]
    pub fn receive_native(&mut self, caller: AccountId, value: Amount) -> Result<()> {
        tracing::warn!(account = %caller, value, "direct native transfer rejected");
        Err(ExchangeError::DirectTransferRejected)
    }

    // =================================================================
    // Withdrawals
    // =================================================================

    /// Withdraw native value through `channel`. Returns the new balance.
    pub fn withdraw_native(
        &mut self,
        caller: AccountId,
        amount: Amount,
        channel: &mut dyn NativeTransfer,
    ) -> Result<Amount> {
        self.withdraw(caller, AssetId::NATIVE, amount, Payout::Native(channel))
    }

    /// Withdraw `amount` of `token`. Returns the new balance.
    pub fn withdraw_token(
        &mut self,
        caller: AccountId,
        token: &mut dyn TokenCollaborator,
        amount: Amount,
    ) -> Result<Amount> {
        let asset = token.asset();
        self.withdraw(caller, asset, amount, Payout::Token(token))
    }

    /// Debit `amount` of `asset`, then release it through `payout`.
    /// Returns the new balance.
    ///
    /// # Errors
    /// - `UnsupportedAsset` if `payout` cannot carry `asset`
    /// - `InsufficientBalance` if the balance is short
    /// - `CollaboratorTransferFailed` if the release is refused; the debit
    ///   is reversed
    pub fn withdraw(
        &mut self,
        caller: AccountId,
        asset: AssetId,
        amount: Amount,
        payout: Payout<'_>,
    ) -> Result<Amount> {
        check_payout(asset, &payout)?;

        // Effects before interactions.
        let new_balance = self.ledger.debit_withdrawal(asset, caller, amount)?;

        let released = match payout {
            Payout::Native(channel) => channel.send(caller, amount),
            Payout::Token(token) => token.transfer(self.address, caller, amount),
        };
        if !released {
            self.ledger.reverse_withdrawal(asset, caller, amount)?;
            tracing::warn!(%asset, account = %caller, amount, "release refused, withdrawal reversed");
            return Err(ExchangeError::CollaboratorTransferFailed {
                asset,
                reason: format!("release of {amount} to {caller} refused"),
            });
        }

        tracing::info!(%asset, account = %caller, amount, new_balance, "withdraw");
        self.audit.append(LedgerEvent::Withdraw {
            asset,
            account: caller,
            amount,
            new_balance,
        });
        Ok(new_balance)
    }

    // =================================================================
    // Balances
    // =================================================================

    #[must_use]
    pub fn balance_of(&self, asset: AssetId, account: AccountId) -> Amount {
        self.ledger.balance_of(asset, account)
    }

    /// Non-zero balances of `account`.
    #[must_use]
    pub fn balances_of(&self, account: AccountId) -> Vec<BalanceEntry> {
        self.ledger.balances_of(account)
    }

    /// Check the conservation invariant for `asset`.
    pub fn verify_supply(&self, asset: AssetId) -> Result<()> {
        self.ledger.verify_supply(asset)
    }

    // =================================================================
    // Orders
    // =================================================================

    /// Post an order offering `give_amount` of `give_asset` for
    /// `want_amount` of `want_asset`. Returns the new id.
    pub fn make_order(
        &mut self,
        caller: AccountId,
        want_asset: AssetId,
        want_amount: Amount,
        give_asset: AssetId,
        give_amount: Amount,
    ) -> OrderId {
        let created_at = self.next_timestamp();
        let order = self
            .book
            .make_order(caller, want_asset, want_amount, give_asset, give_amount, created_at);
        let id = order.id;
        let event = LedgerEvent::order_created(order);
        self.audit.append(event);
        id
    }

    /// Cancel an open order owned by `caller`.
    pub fn cancel_order(&mut self, caller: AccountId, id: OrderId) -> Result<()> {
        let order = self.book.cancel_order(id, caller)?;
        let event = LedgerEvent::cancelled(order);
        self.audit.append(event);
        Ok(())
    }

    /// Fill an open order as `caller`, paying `want_amount` plus the fee.
    pub fn fill_order(&mut self, caller: AccountId, id: OrderId) -> Result<Fill> {
        let fill = self
            .book
            .fill_order(id, caller, &self.settler, &mut self.ledger)
            .inspect_err(|e| {
                if matches!(e, ExchangeError::SupplyInvariantViolation { .. }) {
                    tracing::warn!(order = %id, error = %e, "fill rolled back");
                }
            })?;
        self.audit.append(LedgerEvent::trade(&fill));
        Ok(fill)
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.book.get(id)
    }

    #[must_use]
    pub fn order_count(&self) -> u64 {
        self.book.order_count()
    }

    #[must_use]
    pub fn order_filled(&self, id: OrderId) -> bool {
        self.book.is_filled(id)
    }

    #[must_use]
    pub fn order_cancelled(&self, id: OrderId) -> bool {
        self.book.is_cancelled(id)
    }

    /// Open orders in creation order.
    pub fn open_orders(&self) -> impl Iterator<Item = &Order> {
        self.book.open_orders()
    }

    // =================================================================
    // Audit log
    // =================================================================

    #[must_use]
    pub fn events(&self) -> &[AuditRecord] {
        self.audit.records()
    }

    /// Records after sequence number `seq`.
    #[must_use]
    pub fn events_since(&self, seq: u64) -> &[AuditRecord] {
        self.audit.since(seq)
    }

    /// Hex hash of the latest audit record.
    #[must_use]
    pub fn audit_digest(&self) -> String {
        hex::encode(self.audit.head())
    }

    #[must_use]
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    // =================================================================
    // Internals
    // =================================================================

    fn record_deposit(&mut self, asset: AssetId, account: AccountId, amount: Amount, new_balance: Amount) {
        tracing::info!(%asset, account = %account, amount, new_balance, "deposit");
        self.audit.append(LedgerEvent::Deposit {
            asset,
            account,
            amount,
            new_balance,
        });
    }

    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = self.clock.now();
        let ts = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }
}

fn check_payout(asset: AssetId, payout: &Payout<'_>) -> Result<()> {
    let reason = match payout {
        Payout::Native(_) if asset.is_native() => return Ok(()),
        Payout::Native(_) => "token assets are released through their token collaborator".to_string(),
        Payout::Token(_) if asset.is_native() => {
            "native asset cannot be released through a token collaborator".to_string()
        }
        Payout::Token(token) if token.asset() != asset => {
            format!("collaborator {} does not hold {asset}", token.asset())
        }
        Payout::Token(_) => return Ok(()),
    };
    Err(ExchangeError::UnsupportedAsset { asset, reason })
}
