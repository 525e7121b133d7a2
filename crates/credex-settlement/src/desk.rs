//! Trade store and lifecycle transitions.
//!
//! The desk never touches balances; value movement is the settlement
//! functions' job. Keys are UUIDv7, so iteration order is creation order.

use std::collections::BTreeMap;

use chrono::Utc;
use credex_types::{CredexError, Result, Trade, TradeId, TradeStatus, UserId};
use tracing::info;

/// Owns every trade and its status transitions.
#[derive(Debug, Default)]
pub struct TradeDesk {
    trades: BTreeMap<TradeId, Trade>,
}

impl TradeDesk {
    #[must_use]
    pub fn new() -> Self {
        Self {
            trades: BTreeMap::new(),
        }
    }

    /// Record a new trade (status as constructed by the caller).
    pub(crate) fn insert(&mut self, trade: Trade) {
        self.trades.insert(trade.id, trade);
    }

    #[must_use]
    pub fn get(&self, trade_id: TradeId) -> Option<&Trade> {
        self.trades.get(&trade_id)
    }

    /// Active trades discoverable by `viewer` (everyone else's).
    #[must_use]
    pub fn open_trades(&self, viewer: UserId) -> Vec<Trade> {
        self.trades
            .values()
            .filter(|t| t.is_active() && t.creator_id != viewer)
            .cloned()
            .collect()
    }

    /// Trades created or executed by a user, most recent first.
    #[must_use]
    pub fn trades_of(&self, user_id: UserId) -> Vec<Trade> {
        self.trades
            .values()
            .rev()
            .filter(|t| t.creator_id == user_id || t.executor_id == Some(user_id))
            .cloned()
            .collect()
    }

    /// Cancel an active trade. Only the creator may cancel.
    ///
    /// # Errors
    /// `TradeNotFound`, `Forbidden` (not the creator), or `TradeNotActive`.
    pub fn cancel(&mut self, trade_id: TradeId, actor: UserId) -> Result<Trade> {
        let trade = self
            .trades
            .get_mut(&trade_id)
            .ok_or(CredexError::TradeNotFound(trade_id))?;
        if trade.creator_id != actor {
            return Err(CredexError::Forbidden {
                reason: format!("user {actor} is not the creator of trade {trade_id}"),
            });
        }
        if !trade.is_active() {
            return Err(CredexError::TradeNotActive(trade_id));
        }
        trade.status = TradeStatus::Cancelled;
        info!(trade = %trade_id, "trade cancelled by creator");
        Ok(trade.clone())
    }

    /// Transition an active trade to completed. Called by settlement after
    /// the ledger transaction commits.
    pub(crate) fn mark_completed(&mut self, trade_id: TradeId, executor: UserId) -> Result<Trade> {
        let trade = self
            .trades
            .get_mut(&trade_id)
            .ok_or(CredexError::TradeNotFound(trade_id))?;
        trade.status = TradeStatus::Completed;
        trade.executor_id = Some(executor);
        trade.completed_at = Some(Utc::now());
        Ok(trade.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}
