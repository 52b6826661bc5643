//! # zionex-exchange
//!
//! The operation surface of the exchange core. One [`Exchange`] owns the
//! balance ledger, the order book, the settler and the audit log, and
//! exposes each operation with an explicit authenticated `caller`.
//!
//! ## Operation flow
//!
//! ```text
//! deposit_*  → collaborator pull → BalanceLedger credit   → Deposit record
//! withdraw_* → BalanceLedger debit → collaborator release → Withdraw record
//! make_order → OrderBook                                  → Order record
//! cancel_order → OrderBook                                → Cancel record
//! fill_order → OrderBook → Settler → BalanceLedger        → Trade record
//! ```
//!
//! Operations run one at a time to completion. A failed operation changes
//! nothing and appends nothing to the audit log.

pub mod audit;
pub mod clock;
pub mod exchange;
pub mod telemetry;

pub use audit::{AuditLog, AuditRecord};
pub use clock::{Clock, FixedClock, SystemClock};
pub use exchange::{Exchange, Payout};
