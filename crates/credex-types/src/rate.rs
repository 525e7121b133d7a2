//! Reference prices and per-pair conversion-rate statistics.
//!
//! `MarketPrice` is the external reference datum: owned and refreshed by a
//! price-feed collaborator, read-only to the core. `ConversionRateRecord`
//! carries the live market rate plus rolling trade-derived statistics for
//! one ordered pair — A→B and B→A are independent records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::TokenType;

/// External reference price for one token type, quoted in a common unit (BTC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketPrice {
    pub token: TokenType,
    /// Price in the common reference unit; all cross rates derive from it.
    pub reference_price: Decimal,
    /// Informational USD quote, not used for rate derivation.
    pub usd_price: Decimal,
    pub last_updated: DateTime<Utc>,
}

impl MarketPrice {
    #[must_use]
    pub fn new(token: TokenType, reference_price: Decimal, usd_price: Decimal) -> Self {
        Self {
            token,
            reference_price,
            usd_price,
            last_updated: Utc::now(),
        }
    }
}

/// Rolling statistics for one ordered (from, to) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRateRecord {
    pub from_token: TokenType,
    pub to_token: TokenType,
    /// Current reference rate; refreshed from the price feed on every read.
    pub market_rate: Decimal,
    /// Running mean of executed rates. First trade sets it; later trades
    /// blend `(prev + rate) / 2` — an equal-weight smoothing, not a true
    /// volume-weighted average.
    pub avg_trade_rate: Option<Decimal>,
    /// Cumulative executed volume, in `from_token` units.
    pub volume_24h: Decimal,
    /// |last executed − market| / market × 100, against the market rate at
    /// the time of the last executed trade.
    pub spread_percentage: Option<Decimal>,
    pub last_updated: DateTime<Utc>,
}

impl ConversionRateRecord {
    /// Fresh zero-volume record for a pair.
    #[must_use]
    pub fn new(from_token: TokenType, to_token: TokenType, market_rate: Decimal) -> Self {
        Self {
            from_token,
            to_token,
            market_rate,
            avg_trade_rate: None,
            volume_24h: Decimal::ZERO,
            spread_percentage: None,
            last_updated: Utc::now(),
        }
    }
}
