//! # zionex-settlement
//!
//! **Settlement Engine**: executes a fill against the balance ledger.
//!
//! ## Settlement steps
//!
//! 1. Compute the fee: `floor(want_amount * fee_percent / 100)`
//! 2. Check the filler holds `want_amount + fee` of the want asset and the
//!    owner holds `give_amount` of the give asset
//! 3. Run the legs as internal transfers: filler → owner (`want_amount`),
//!    filler → fee account (`fee`), owner → filler (`give_amount`)
//! 4. Verify supply conservation for both assets
//!
//! Steps 3–4 run in one ledger unit: any failure discards every leg.
//! Custody never leaves the ledger during settlement.

pub mod settler;

pub use settler::{Settler, compute_fee};
