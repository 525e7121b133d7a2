//! # credex-engine
//!
//! **Order Book Matcher** and the marketplace facade.
//!
//! ## Architecture
//!
//! 1. **OrderBook**: resting orders keyed by UUIDv7, so book iteration is
//!    submission order; owns order lifecycle transitions but never touches
//!    balances
//! 2. **matcher**: synchronous, opportunistic matching at submission time —
//!    first-fit over rate-compatible counter-orders, settlement delegated
//!    to `credex-settlement`, remainders reissued as new pending orders
//! 3. **Marketplace**: the facade wiring ledger, price feed, oracle, trade
//!    desk, and order book into the operations callers consume
//!
//! ## Order Flow
//!
//! ```text
//! submit -> OrderBook.find_match() -> settle_matched_orders() -> remainders rest
//! ```
//!
//! No match leaves the order resting `pending`; matching is never queued
//! for a future asynchronous pass.

pub mod book;
pub mod marketplace;
pub mod matcher;

pub use book::OrderBook;
pub use marketplace::Marketplace;
pub use matcher::submit_order;
