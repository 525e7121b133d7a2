//! Daily balance snapshot store.
//!
//! At most one row per (user, token, calendar day). Writing is idempotent at
//! the (user, day) level: once any snapshot exists for a user on a date, a
//! second write attempt for that date is a no-op.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use credex_types::{BalanceSnapshot, TokenType, UserId};

/// Store of immutable daily balance snapshots.
#[derive(Debug, Default)]
pub struct SnapshotBook {
    rows: BTreeMap<(UserId, NaiveDate, TokenType), BalanceSnapshot>,
}

impl SnapshotBook {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    /// Whether any snapshot exists for this user on this date.
    #[must_use]
    pub fn has_any_for(&self, user_id: UserId, date: NaiveDate) -> bool {
        self.rows
            .range((user_id, date, TokenType::ALL[0])..)
            .take_while(|((u, d, _), _)| *u == user_id && *d == date)
            .next()
            .is_some()
    }

    /// Insert a snapshot row. Existing rows are never overwritten.
    pub fn insert(&mut self, snapshot: BalanceSnapshot) {
        self.rows
            .entry((snapshot.user_id, snapshot.snapshot_date, snapshot.token))
            .or_insert(snapshot);
    }

    /// Snapshots for a user, most recent date first, bounded to `days` rows
    /// (optionally filtered to one token).
    #[must_use]
    pub fn history(
        &self,
        user_id: UserId,
        token_filter: Option<TokenType>,
        days: usize,
    ) -> Vec<BalanceSnapshot> {
        self.rows
            .values()
            .rev()
            .filter(|s| s.user_id == user_id)
            .filter(|s| token_filter.is_none_or(|t| s.token == t))
            .take(days)
            .cloned()
            .collect()
    }

    /// Total number of snapshot rows (all users).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn insert_and_lookup() {
        let mut book = SnapshotBook::new();
        let user = UserId::new();
        let day = date(2026, 8, 29);
        assert!(!book.has_any_for(user, day));

        book.insert(BalanceSnapshot::new(
            user,
            TokenType::Openai,
            Decimal::new(100, 0),
            day,
        ));
        assert!(book.has_any_for(user, day));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn existing_row_is_never_overwritten() {
        let mut book = SnapshotBook::new();
        let user = UserId::new();
        let day = date(2026, 8, 29);

        book.insert(BalanceSnapshot::new(
            user,
            TokenType::Openai,
            Decimal::new(100, 0),
            day,
        ));
        book.insert(BalanceSnapshot::new(
            user,
            TokenType::Openai,
            Decimal::new(999, 0),
            day,
        ));

        let rows = book.history(user, Some(TokenType::Openai), 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].balance, Decimal::new(100, 0));
    }

    #[test]
    fn history_is_most_recent_first_and_bounded() {
        let mut book = SnapshotBook::new();
        let user = UserId::new();
        for d in 1..=5 {
            book.insert(BalanceSnapshot::new(
                user,
                TokenType::Google,
                Decimal::from(d),
                date(2026, 8, d as u32),
            ));
        }

        let rows = book.history(user, None, 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].snapshot_date, date(2026, 8, 5));
        assert_eq!(rows[2].snapshot_date, date(2026, 8, 3));
    }

    #[test]
    fn history_filters_by_token() {
        let mut book = SnapshotBook::new();
        let user = UserId::new();
        let day = date(2026, 8, 29);
        book.insert(BalanceSnapshot::new(user, TokenType::Openai, Decimal::ONE, day));
        book.insert(BalanceSnapshot::new(user, TokenType::Cohere, Decimal::TWO, day));

        let rows = book.history(user, Some(TokenType::Cohere), 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].token, TokenType::Cohere);
    }

    #[test]
    fn users_are_isolated() {
        let mut book = SnapshotBook::new();
        let a = UserId::new();
        let b = UserId::new();
        let day = date(2026, 8, 29);
        book.insert(BalanceSnapshot::new(a, TokenType::Openai, Decimal::ONE, day));

        assert!(book.has_any_for(a, day));
        assert!(!book.has_any_for(b, day));
        assert!(book.history(b, None, 10).is_empty());
    }
}
