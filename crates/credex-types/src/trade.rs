//! Trade types — realized bilateral exchanges between a creator and an executor.
//!
//! A trade created without a counterpart stays `active` (discoverable by
//! other users) until executed or cancelled by its creator. Creation alone
//! never moves balances; settlement does.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{TokenType, TradeId, UserId};

/// Lifecycle status of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Active,
    Completed,
    Cancelled,
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A bilateral exchange: the creator gives `amount` of `from_token`, the
/// executor gives `amount * exchange_rate` of `to_token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub creator_id: UserId,
    /// Set once the trade settles.
    pub executor_id: Option<UserId>,
    pub from_token: TokenType,
    pub to_token: TokenType,
    /// Units of `to_token` per unit of `from_token`.
    pub exchange_rate: Decimal,
    /// Quantity in `from_token` units.
    pub amount: Decimal,
    pub status: TradeStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Trade {
    /// Create a new active trade awaiting an executor.
    #[must_use]
    pub fn new(
        creator_id: UserId,
        from_token: TokenType,
        to_token: TokenType,
        exchange_rate: Decimal,
        amount: Decimal,
    ) -> Self {
        Self {
            id: TradeId::new(),
            creator_id,
            executor_id: None,
            from_token,
            to_token,
            exchange_rate,
            amount,
            status: TradeStatus::Active,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// What the executor must pay: `amount * exchange_rate` in `to_token` units.
    #[must_use]
    pub fn required_to_amount(&self) -> Decimal {
        self.amount * self.exchange_rate
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == TradeStatus::Active
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trade[{}] {} {} -> {} @ {} ({})",
            self.id, self.amount, self.from_token, self.to_token, self.exchange_rate, self.status,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_trade() -> Trade {
        Trade::new(
            UserId::new(),
            TokenType::Openai,
            TokenType::Anthropic,
            Decimal::ONE,
            Decimal::new(50, 0),
        )
    }

    #[test]
    fn new_trade_is_active_without_executor() {
        let trade = make_trade();
        assert!(trade.is_active());
        assert!(trade.executor_id.is_none());
        assert!(trade.completed_at.is_none());
    }

    #[test]
    fn required_to_amount() {
        let mut trade = make_trade();
        trade.exchange_rate = Decimal::new(12, 1); // 1.2
        assert_eq!(trade.required_to_amount(), Decimal::new(60, 0));
    }

    #[test]
    fn trade_display() {
        let trade = make_trade();
        let s = format!("{trade}");
        assert!(s.contains("openai"));
        assert!(s.contains("ACTIVE"));
    }

    #[test]
    fn trade_serde_roundtrip() {
        let trade = make_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade.id, back.id);
        assert_eq!(trade.amount, back.amount);
        assert_eq!(back.status, TradeStatus::Active);
    }
}
