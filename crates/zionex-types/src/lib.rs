//! # zionex-types
//!
//! Shared types, errors, and configuration for the **zionex** exchange core.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`AccountId`], [`AssetId`], [`OrderId`]
//! - **Amounts**: [`Amount`] and the [`units`] conversion helpers
//! - **Order model**: [`Order`], [`OrderStatus`]
//! - **Fill model**: [`Fill`]
//! - **Audit records**: [`LedgerEvent`]
//! - **Configuration**: [`ExchangeConfig`], [`TelemetryConfig`]
//! - **Errors**: [`ExchangeError`] with `ZX_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod fill;
pub mod ids;
pub mod order;
pub mod units;

// Re-export all primary types at crate root for ergonomic imports:
//   use zionex_types::{Order, OrderStatus, AssetId, ...};

pub use balance::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use fill::*;
pub use ids::*;
pub use order::*;

// Constants and unit helpers are accessed via their modules
// (`zionex_types::constants::FOO`, `zionex_types::units::tokens`).
