//! # credex-ledger
//!
//! **Account Ledger**: the sole writer of balance values.
//!
//! ## Architecture
//!
//! The ledger owns per-(user, token) balances, the append-only entry log,
//! and daily balance snapshots:
//! 1. **Ledger**: balance reads, single-delta application, history queries
//! 2. **LedgerTxn**: unit-of-work — stages multiple deltas, commits all or none
//! 3. **SnapshotBook**: one immutable balance row per (user, token, day)
//!
//! ## Invariants
//!
//! - No balance ever goes negative; a delta that would underflow fails the
//!   whole enclosing transaction.
//! - Every balance change appends exactly one entry with
//!   `balance_after == balance_before + amount`.
//! - Replaying a user's entries from zero reproduces the live balance.

pub mod ledger;
pub mod snapshots;
pub mod txn;

pub use ledger::Ledger;
pub use snapshots::SnapshotBook;
pub use txn::LedgerTxn;
