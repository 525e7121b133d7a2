//! # credex-types
//!
//! Shared types, errors, and configuration for the **Credex** marketplace core.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`UserId`], [`OrderId`], [`TradeId`], [`EntryId`]
//! - **Token model**: [`TokenType`], [`TokenInfo`]
//! - **Ledger model**: [`LedgerEntry`], [`EntryKind`]
//! - **Order model**: [`Order`], [`OrderStatus`]
//! - **Trade model**: [`Trade`], [`TradeStatus`]
//! - **Rate model**: [`MarketPrice`], [`ConversionRateRecord`]
//! - **Snapshot model**: [`BalanceSnapshot`]
//! - **Configuration**: [`RatePolicy`]
//! - **Errors**: [`CredexError`] with `CX_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod config;
pub mod constants;
pub mod entry;
pub mod error;
pub mod ids;
pub mod order;
pub mod rate;
pub mod snapshot;
pub mod token;
pub mod trade;

// Re-export all primary types at crate root for ergonomic imports:
//   use credex_types::{TokenType, LedgerEntry, Order, Trade, ...};

pub use config::*;
pub use entry::*;
pub use error::*;
pub use ids::*;
pub use order::*;
pub use rate::*;
pub use snapshot::*;
pub use token::*;
pub use trade::*;

// Constants are accessed via `credex_types::constants::FOO`
// (not re-exported to avoid name collisions).
