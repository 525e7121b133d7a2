//! # credex-settlement
//!
//! **Bilateral Trade Executor**: the only component that moves value.
//!
//! ## Architecture
//!
//! 1. **TradeDesk**: owns the trade store and lifecycle transitions
//! 2. **settle**: creation, execution (four linked ledger deltas in one
//!    unit of work), cancellation, and the matched-order settlement path
//!
//! ## Settlement
//!
//! Executing a trade performs exactly four ledger deltas, in order:
//! debit creator `from_token`, credit creator `to_token`, debit executor
//! `to_token`, credit executor `from_token`. All four are staged in a
//! single [`LedgerTxn`] — either every entry commits or none do, and the
//! trade stays `active` on failure.
//!
//! Conversion-rate statistics and daily snapshots run after the commit as
//! best-effort side effects: their failures are logged and swallowed.
//!
//! [`LedgerTxn`]: credex_ledger::LedgerTxn

pub mod desk;
pub mod settle;

pub use desk::TradeDesk;
pub use settle::{check_terms, create_trade, execute_trade, settle_matched_orders};
