//! # zionex-orderbook
//!
//! The order book keeps every order ever created, keyed by its sequential
//! [`OrderId`](zionex_types::OrderId). Per-order state machine:
//!
//! ```text
//! make_order ──► Open ──fill_order──► Filled
//!                  └────cancel_order──► Cancelled
//! ```
//!
//! `Filled` and `Cancelled` are terminal; terminal records are kept for
//! audit, so replayed cancels and fills are rejected rather than re-applied.

pub mod orderbook;

pub use orderbook::OrderBook;
