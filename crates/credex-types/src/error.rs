//! Error types for the Credex marketplace core.
//!
//! All errors use the `CX_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order errors
//! - 2xx: Balance / ledger errors
//! - 3xx: Price / rate errors
//! - 4xx: Trade errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{OrderId, TokenType, TradeId};

/// Central error enum for all Credex operations.
#[derive(Debug, Error)]
pub enum CredexError {
    // =================================================================
    // Order Errors (1xx)
    // =================================================================
    /// The requested order was not found in the book.
    #[error("CX_ERR_100: Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order is no longer pending (already matched or cancelled).
    #[error("CX_ERR_101: Order is not pending: {0}")]
    OrderNotPending(OrderId),

    /// A matched counter-order was cancelled or consumed between search
    /// and settlement. Recoverable: the matcher retries the search.
    #[error("CX_ERR_102: Concurrent modification of order: {0}")]
    ConcurrentModification(OrderId),

    // =================================================================
    // Balance / Ledger Errors (2xx)
    // =================================================================
    /// Applying the delta would drive the balance below zero.
    #[error("CX_ERR_200: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    // =================================================================
    // Price / Rate Errors (3xx)
    // =================================================================
    /// No reference price is available for this token.
    #[error("CX_ERR_300: No market price available for {0}")]
    PriceUnavailable(TokenType),

    /// The proposed rate deviates too far from the reference market rate.
    #[error(
        "CX_ERR_301: Rate out of band: proposed {proposed} vs market {market} \
         (spread {spread_pct}% > max {max_spread_pct}%)"
    )]
    RateOutOfBand {
        proposed: Decimal,
        market: Decimal,
        spread_pct: Decimal,
        max_spread_pct: Decimal,
    },

    /// from_token and to_token are the same.
    #[error("CX_ERR_302: Cannot exchange a token for itself: {0}")]
    InvalidPair(TokenType),

    /// The amount or rate is zero or negative.
    #[error("CX_ERR_303: Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    // =================================================================
    // Trade Errors (4xx)
    // =================================================================
    /// The requested trade was not found.
    #[error("CX_ERR_400: Trade not found: {0}")]
    TradeNotFound(TradeId),

    /// The trade is not in the `active` state.
    #[error("CX_ERR_401: Trade is not active: {0}")]
    TradeNotActive(TradeId),

    /// A trade's creator attempted to execute their own trade.
    #[error("CX_ERR_402: Cannot execute your own trade: {0}")]
    SelfExecution(TradeId),

    /// The acting user is not the owning party for this operation.
    #[error("CX_ERR_403: Forbidden: {reason}")]
    Forbidden { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("CX_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, CredexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = CredexError::OrderNotFound(OrderId::new());
        let msg = format!("{err}");
        assert!(msg.starts_with("CX_ERR_100"), "Got: {msg}");
    }

    #[test]
    fn insufficient_balance_display() {
        let err = CredexError::InsufficientBalance {
            needed: Decimal::new(100, 0),
            available: Decimal::new(50, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("CX_ERR_200"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn rate_out_of_band_includes_spread_and_bound() {
        let err = CredexError::RateOutOfBand {
            proposed: Decimal::new(12, 1),
            market: Decimal::new(8333, 4),
            spread_pct: Decimal::new(44, 0),
            max_spread_pct: Decimal::new(15, 0),
        };
        let msg = format!("{err}");
        assert!(msg.contains("CX_ERR_301"));
        assert!(msg.contains("44"));
        assert!(msg.contains("15"));
    }

    #[test]
    fn all_errors_have_cx_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(CredexError::OrderNotPending(OrderId::new())),
            Box::new(CredexError::PriceUnavailable(TokenType::Cohere)),
            Box::new(CredexError::InvalidPair(TokenType::Openai)),
            Box::new(CredexError::SelfExecution(TradeId::new())),
            Box::new(CredexError::Forbidden {
                reason: "test".into(),
            }),
            Box::new(CredexError::Internal("test".into())),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("CX_ERR_"),
                "Error missing CX_ERR_ prefix: {msg}"
            );
        }
    }
}
