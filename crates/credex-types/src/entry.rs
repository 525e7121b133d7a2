//! Ledger entry types — the immutable audit trail of every balance change.
//!
//! Entries are append-only: never updated, never deleted. Replaying a user's
//! entries from zero must reproduce their current balance exactly.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EntryId, TokenType, TradeId, UserId};

/// The kind of balance change an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    TradeSend,
    TradeReceive,
    Deposit,
    Withdrawal,
    InitialBalance,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TradeSend => write!(f, "trade_send"),
            Self::TradeReceive => write!(f, "trade_receive"),
            Self::Deposit => write!(f, "deposit"),
            Self::Withdrawal => write!(f, "withdrawal"),
            Self::InitialBalance => write!(f, "initial_balance"),
        }
    }
}

/// Immutable record of one balance change.
///
/// Invariant: `balance_after == balance_before + amount`, and for every
/// account the latest entry's `balance_after` equals the live balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub token: TokenType,
    /// Signed delta: positive for credits, negative for debits.
    pub amount: Decimal,
    pub kind: EntryKind,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    /// The trade that caused this entry, if any.
    pub related_trade: Option<TradeId>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Whether the entry's before/after arithmetic holds.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.balance_after == self.balance_before + self.amount
    }

    /// Whether this entry credits the account.
    #[must_use]
    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

impl std::fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entry[{}] user={} {} {} {} ({} -> {})",
            self.id,
            self.user_id,
            self.kind,
            self.token,
            self.amount,
            self.balance_before,
            self.balance_after,
        )
    }
}
