//! # credex-oracle
//!
//! **Conversion Rate Oracle**: derives reference exchange rates between
//! token types from externally supplied prices, validates proposed rates
//! against a spread bound, and maintains rolling trade-derived statistics
//! per ordered pair.
//!
//! ## Architecture
//!
//! 1. **PriceFeed**: reference prices per token, refreshed on an external
//!    cadence the core does not control; read-only to the oracle
//! 2. **RateOracle**: market-rate derivation, spread validation, and
//!    per-pair [`ConversionRateRecord`] statistics
//!
//! Statistics updates are best-effort side effects of settlement: callers
//! log and swallow failures so a settled trade is never reported as failed.
//!
//! [`ConversionRateRecord`]: credex_types::ConversionRateRecord

pub mod oracle;
pub mod price_feed;

pub use oracle::RateOracle;
pub use price_feed::PriceFeed;
