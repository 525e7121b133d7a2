//! Resting-order types for the order book matcher.
//!
//! An order is a standing intent to convert `amount` of `from_token` into
//! `to_token` at `exchange_rate` (units of to_token per unit of from_token).
//! Lifecycle: `pending -> {completed, cancelled}`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{OrderId, TokenType, UserId};

/// Lifecycle status of a resting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A standing exchange intent awaiting a counterparty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub from_token: TokenType,
    pub to_token: TokenType,
    /// Quantity offered, in `from_token` units.
    pub amount: Decimal,
    /// Units of `to_token` per unit of `from_token`.
    pub exchange_rate: Decimal,
    pub status: OrderStatus,
    /// The counter-order this order settled against, once matched.
    pub matched_order: Option<OrderId>,
    pub matched_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a new pending order.
    #[must_use]
    pub fn new(
        user_id: UserId,
        from_token: TokenType,
        to_token: TokenType,
        amount: Decimal,
        exchange_rate: Decimal,
    ) -> Self {
        Self {
            id: OrderId::new(),
            user_id,
            from_token,
            to_token,
            amount,
            exchange_rate,
            status: OrderStatus::Pending,
            matched_order: None,
            matched_at: None,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order[{}] {} {} -> {} @ {} ({})",
            self.id, self.amount, self.from_token, self.to_token, self.exchange_rate, self.status,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_order_is_pending() {
        let order = Order::new(
            UserId::new(),
            TokenType::Openai,
            TokenType::Anthropic,
            Decimal::new(50, 0),
            Decimal::ONE,
        );
        assert!(order.is_pending());
        assert!(order.matched_order.is_none());
    }

    #[test]
    fn status_display() {
        assert_eq!(format!("{}", OrderStatus::Pending), "PENDING");
        assert_eq!(format!("{}", OrderStatus::Cancelled), "CANCELLED");
    }

    #[test]
    fn order_serde_roundtrip() {
        let order = Order::new(
            UserId::new(),
            TokenType::Openai,
            TokenType::Cohere,
            Decimal::new(10, 0),
            Decimal::new(9, 1),
        );
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order.id, back.id);
        assert_eq!(order.exchange_rate, back.exchange_rate);
        assert_eq!(back.status, OrderStatus::Pending);
    }
}
