//! Daily balance snapshots for historical reporting.
//!
//! At most one snapshot exists per (user, token, calendar day); the row is
//! immutable once written for a given day.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{TokenType, UserId};

/// One user's balance in one token on one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub user_id: UserId,
    pub token: TokenType,
    pub balance: Decimal,
    pub snapshot_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl BalanceSnapshot {
    #[must_use]
    pub fn new(user_id: UserId, token: TokenType, balance: Decimal, date: NaiveDate) -> Self {
        Self {
            user_id,
            token,
            balance,
            snapshot_date: date,
            created_at: Utc::now(),
        }
    }
}
