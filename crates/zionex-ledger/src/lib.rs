//! # zionex-ledger
//!
//! **Balance Ledger**: the authoritative per-asset, per-account balance
//! store custodied by the exchange, and the narrow interfaces through which
//! funds enter and leave it.
//!
//! ## Architecture
//!
//! 1. **BalanceLedger**: `(asset, account) -> amount`, with deposit/withdraw
//!    bookkeeping and the `internal_transfer` primitive used by settlement
//! 2. **SupplyConservation**: per-asset deposit/withdraw totals backing the
//!    conservation check
//! 3. **TokenCollaborator**: `transfer` / `transfer_from` / `balance_of` on an
//!    external fungible-token ledger ([`StandardToken`] is an in-memory one)
//! 4. **NativeTransfer**: releases native value ([`NativeWallets`] is an
//!    in-memory one)
//!
//! ```text
//! deposit:  collaborator pull → BalanceLedger.credit_deposit()
//! withdraw: BalanceLedger.debit_withdrawal() → collaborator release
//!           (→ BalanceLedger.reverse_withdrawal() if the release is refused)
//! ```

pub mod balance_ledger;
pub mod native;
pub mod supply_conservation;
pub mod token;

pub use balance_ledger::BalanceLedger;
pub use native::{NativeTransfer, NativeWallets};
pub use supply_conservation::SupplyConservation;
pub use token::{StandardToken, TokenCollaborator};
