//! The account ledger — balances as a materialized projection of the entry log.
//!
//! Every mutation goes through a [`LedgerTxn`]: the transaction stages deltas
//! against an overlay and publishes balance updates and log entries together,
//! so no partial state is ever observable. The cached balance must always
//! equal the replay of the log ([`Ledger::reconcile`]).

use std::collections::HashMap;

use chrono::NaiveDate;
use credex_types::{
    BalanceSnapshot, CredexError, EntryKind, LedgerEntry, Result, TokenType, TradeId, UserId,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::snapshots::SnapshotBook;
use crate::txn::LedgerTxn;

/// Source of truth for all balance state. Sole writer of balance values.
#[derive(Debug, Default)]
pub struct Ledger {
    /// Per-(user, token) live balances. Created lazily on first credit.
    pub(crate) balances: HashMap<(UserId, TokenType), Decimal>,
    /// Append-only audit log, in creation order.
    pub(crate) entries: Vec<LedgerEntry>,
    /// Daily balance snapshots.
    pub(crate) snapshots: SnapshotBook,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            entries: Vec::new(),
            snapshots: SnapshotBook::new(),
        }
    }

    /// Begin a unit of work. Staged deltas publish together on commit;
    /// dropping the transaction discards them all.
    pub fn begin(&mut self) -> LedgerTxn<'_> {
        LedgerTxn::new(self)
    }

    /// Apply a single signed delta in its own transaction.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if the delta would drive the balance
    /// below zero; nothing is persisted in that case.
    pub fn apply_delta(
        &mut self,
        user_id: UserId,
        token: TokenType,
        amount: Decimal,
        kind: EntryKind,
        related_trade: Option<TradeId>,
        description: Option<String>,
    ) -> Result<LedgerEntry> {
        let mut txn = self.begin();
        let entry = txn.stage_delta(user_id, token, amount, kind, related_trade, description)?;
        txn.commit();
        Ok(entry)
    }

    /// Current balance for a (user, token) pair. Missing accounts read zero.
    #[must_use]
    pub fn balance(&self, user_id: UserId, token: TokenType) -> Decimal {
        self.balances
            .get(&(user_id, token))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// All of a user's balances, in canonical token order.
    #[must_use]
    pub fn balances_of(&self, user_id: UserId) -> Vec<(TokenType, Decimal)> {
        TokenType::ALL
            .iter()
            .filter_map(|&token| {
                self.balances
                    .get(&(user_id, token))
                    .map(|&bal| (token, bal))
            })
            .collect()
    }

    /// Ledger entries for a user, most recent first, bounded by `limit`.
    #[must_use]
    pub fn history(
        &self,
        user_id: UserId,
        token_filter: Option<TokenType>,
        limit: usize,
    ) -> Vec<LedgerEntry> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .filter(|e| token_filter.is_none_or(|t| e.token == t))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Balance snapshots for a user, most recent date first, bounded by `days`.
    #[must_use]
    pub fn balance_history(
        &self,
        user_id: UserId,
        token_filter: Option<TokenType>,
        days: usize,
    ) -> Vec<BalanceSnapshot> {
        self.snapshots.history(user_id, token_filter, days)
    }

    /// Write one snapshot per held token for `date`, unless the user already
    /// has snapshots for that date. Idempotent: a second call on the same day
    /// is a no-op, not an error. Returns the number of rows written.
    pub fn snapshot_daily(&mut self, user_id: UserId, date: NaiveDate) -> usize {
        if self.snapshots.has_any_for(user_id, date) {
            return 0;
        }
        let held = self.balances_of(user_id);
        for &(token, balance) in &held {
            self.snapshots
                .insert(BalanceSnapshot::new(user_id, token, balance, date));
        }
        info!(user = %user_id, %date, rows = held.len(), "daily balance snapshot written");
        held.len()
    }

    /// Recompute a balance by replaying the entry log from zero.
    #[must_use]
    pub fn replay_balance(&self, user_id: UserId, token: TokenType) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.user_id == user_id && e.token == token)
            .map(|e| e.amount)
            .sum()
    }

    /// Assert that the cached balance matches the replay of the log.
    ///
    /// # Errors
    /// Returns `Internal` if the materialized balance has diverged from the
    /// entry log — this indicates corruption, not a user error.
    pub fn reconcile(&self, user_id: UserId, token: TokenType) -> Result<()> {
        let cached = self.balance(user_id, token);
        let replayed = self.replay_balance(user_id, token);
        if cached != replayed {
            return Err(CredexError::Internal(format!(
                "ledger reconciliation failed for user {user_id} {token}: \
                 cached {cached} != replayed {replayed}"
            )));
        }
        Ok(())
    }

    /// Total number of log entries (all users).
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
