//! Error types for the zionex exchange core.
//!
//! All errors use the `ZX_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order errors
//! - 2xx: Balance errors
//! - 3xx: Asset / collaborator errors
//! - 6xx: Settlement errors
//! - 9xx: General / internal errors
//!
//! Every error aborts its operation with no state change.

use thiserror::Error;

use crate::{AccountId, Amount, AssetId, OrderId, OrderStatus};

/// Central error enum for all zionex operations.
#[derive(Debug, Error)]
pub enum ExchangeError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// The order id was never allocated.
    #[error("ZX_ERR_100: Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order is already filled or cancelled.
    #[error("ZX_ERR_101: Order {id} is not open (status {status})")]
    OrderNotOpen { id: OrderId, status: OrderStatus },

    /// Someone other than the owner tried to cancel.
    #[error("ZX_ERR_102: Account {caller} is not the owner of {id}")]
    Unauthorized { id: OrderId, caller: AccountId },

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// A debit exceeds the available balance.
    #[error(
        "ZX_ERR_200: Insufficient balance of {asset} for {account}: need {needed}, have {available}"
    )]
    InsufficientBalance {
        asset: AssetId,
        account: AccountId,
        needed: Amount,
        available: Amount,
    },

    /// A credit would exceed the representable amount.
    #[error("ZX_ERR_201: Balance overflow")]
    BalanceOverflow,

    // =================================================================
    // Asset / Collaborator Errors (3xx)
    // =================================================================
    /// Native id passed where a token was required, or vice versa.
    #[error("ZX_ERR_300: Unsupported asset {asset}: {reason}")]
    UnsupportedAsset { asset: AssetId, reason: String },

    /// The external token or native channel refused a transfer.
    #[error("ZX_ERR_301: Collaborator transfer failed for {asset}: {reason}")]
    CollaboratorTransferFailed { asset: AssetId, reason: String },

    /// Native value sent without going through the deposit operation.
    #[error("ZX_ERR_302: Direct native transfers are rejected; use deposit")]
    DirectTransferRejected,

    // =================================================================
    // Settlement Errors (6xx)
    // =================================================================
    /// Supply conservation invariant violated. Critical safety alert.
    #[error("ZX_ERR_600: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Serialization / parsing error.
    #[error("ZX_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid values, missing variables, etc.).
    #[error("ZX_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ExchangeError>;

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Address;

    #[test]
    fn error_display_contains_prefix() {
        let err = ExchangeError::OrderNotFound(OrderId(7));
        let msg = format!("{err}");
        assert!(msg.starts_with("ZX_ERR_100"), "Got: {msg}");
        assert!(msg.contains("order:7"));
    }

    #[test]
    fn insufficient_balance_display() {
        let err = ExchangeError::InsufficientBalance {
            asset: AssetId::NATIVE,
            account: Address::repeat_byte(1),
            needed: 100,
            available: 50,
        };
        let msg = format!("{err}");
        assert!(msg.contains("ZX_ERR_200"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
        assert!(msg.contains("native"));
    }

    #[test]
    fn order_not_open_display() {
        let err = ExchangeError::OrderNotOpen {
            id: OrderId(1),
            status: OrderStatus::Cancelled,
        };
        let msg = format!("{err}");
        assert!(msg.contains("ZX_ERR_101"));
        assert!(msg.contains("CANCELLED"));
    }

    #[test]
    fn all_errors_have_zx_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(ExchangeError::BalanceOverflow),
            Box::new(ExchangeError::DirectTransferRejected),
            Box::new(ExchangeError::Unauthorized {
                id: OrderId(1),
                caller: Address::ZERO,
            }),
            Box::new(ExchangeError::CollaboratorTransferFailed {
                asset: AssetId::NATIVE,
                reason: "refused".into(),
            }),
            Box::new(ExchangeError::Configuration("bad".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("ZX_ERR_"),
                "Error missing ZX_ERR_ prefix: {msg}"
            );
        }
    }
}
