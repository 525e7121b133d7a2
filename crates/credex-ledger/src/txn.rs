//! Unit-of-work transaction over the ledger.
//!
//! A settlement touches up to four accounts; the transaction stages each
//! delta against an overlay of the live balances and publishes everything in
//! one step. Solvency is checked against the staged running balance, so a
//! later delta sees the effect of an earlier one within the same unit of
//! work. Dropping the transaction without committing discards all of it.

use std::collections::HashMap;

use chrono::Utc;
use credex_types::{
    CredexError, EntryId, EntryKind, LedgerEntry, Result, TokenType, TradeId, UserId,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::ledger::Ledger;

/// An open unit of work. Created by [`Ledger::begin`].
pub struct LedgerTxn<'a> {
    ledger: &'a mut Ledger,
    /// Running balances for accounts touched by this transaction.
    staged_balances: HashMap<(UserId, TokenType), Decimal>,
    /// Entries to append on commit, in staging order.
    staged_entries: Vec<LedgerEntry>,
}

impl<'a> LedgerTxn<'a> {
    pub(crate) fn new(ledger: &'a mut Ledger) -> Self {
        Self {
            ledger,
            staged_balances: HashMap::new(),
            staged_entries: Vec::new(),
        }
    }

    /// Stage one signed delta. Returns the entry that will be appended on
    /// commit.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if the staged running balance would go
    /// negative. The transaction remains usable but the failed delta leaves
    /// no trace; callers typically abandon the whole transaction instead.
    pub fn stage_delta(
        &mut self,
        user_id: UserId,
        token: TokenType,
        amount: Decimal,
        kind: EntryKind,
        related_trade: Option<TradeId>,
        description: Option<String>,
    ) -> Result<LedgerEntry> {
        let key = (user_id, token);
        let balance_before = self
            .staged_balances
            .get(&key)
            .copied()
            .unwrap_or_else(|| self.ledger.balance(user_id, token));

        let balance_after = balance_before + amount;
        if balance_after < Decimal::ZERO {
            return Err(CredexError::InsufficientBalance {
                needed: amount.abs(),
                available: balance_before,
            });
        }

        let entry = LedgerEntry {
            id: EntryId::new(),
            user_id,
            token,
            amount,
            kind,
            balance_before,
            balance_after,
            related_trade,
            description,
            created_at: Utc::now(),
        };

        self.staged_balances.insert(key, balance_after);
        self.staged_entries.push(entry.clone());
        Ok(entry)
    }

    /// Number of deltas staged so far.
    #[must_use]
    pub fn staged_len(&self) -> usize {
        self.staged_entries.len()
    }

    /// Publish every staged balance and append every staged entry.
    /// Returns the number of entries appended.
    pub fn commit(self) -> usize {
        for (key, balance) in &self.staged_balances {
            self.ledger.balances.insert(*key, *balance);
        }
        let appended = self.staged_entries.len();
        for entry in &self.staged_entries {
            info!(
                user = %entry.user_id,
                token = %entry.token,
                kind = %entry.kind,
                direction = if entry.is_credit() { "credit" } else { "debit" },
                amount = %entry.amount,
                balance = %entry.balance_after,
                "ledger entry committed"
            );
        }
        self.ledger.entries.extend(self.staged_entries);
        appended
    }
}
