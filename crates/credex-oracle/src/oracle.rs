//! Market-rate derivation, spread validation, and per-pair statistics.

use std::collections::HashMap;

use chrono::Utc;
use credex_types::{
    ConversionRateRecord, CredexError, RatePolicy, Result, TokenType,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::price_feed::PriceFeed;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Derives reference rates and keeps rolling trade statistics.
///
/// Records are keyed by ordered (from, to) pair: A→B and B→A are independent,
/// though their reference rates are reciprocal by construction.
#[derive(Debug, Default)]
pub struct RateOracle {
    records: HashMap<(TokenType, TokenType), ConversionRateRecord>,
    policy: RatePolicy,
}

impl RateOracle {
    #[must_use]
    pub fn new(policy: RatePolicy) -> Self {
        Self {
            records: HashMap::new(),
            policy,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &RatePolicy {
        &self.policy
    }

    /// Reference exchange rate: units of `to` per unit of `from`.
    ///
    /// The identity pair returns 1 without consulting the feed.
    ///
    /// # Errors
    /// Returns `PriceUnavailable` if either token lacks a usable (positive)
    /// reference price.
    pub fn market_rate(
        &self,
        feed: &PriceFeed,
        from: TokenType,
        to: TokenType,
    ) -> Result<Decimal> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        let from_price = Self::usable_price(feed, from)?;
        let to_price = Self::usable_price(feed, to)?;
        Ok(from_price / to_price)
    }

    /// Check a proposed rate against the market rate. Returns the spread
    /// percentage on acceptance.
    ///
    /// # Errors
    /// Returns `RateOutOfBand` (carrying the computed spread and the bound)
    /// if the spread exceeds the policy maximum.
    pub fn validate_rate(&self, proposed: Decimal, market: Decimal) -> Result<Decimal> {
        if market <= Decimal::ZERO {
            return Err(CredexError::Internal(format!(
                "cannot validate against non-positive market rate {market}"
            )));
        }
        let spread_pct = (proposed - market).abs() / market * HUNDRED;
        info!(%proposed, %market, spread = %spread_pct, "rate validation");
        if spread_pct > self.policy.max_spread_pct {
            return Err(CredexError::RateOutOfBand {
                proposed,
                market,
                spread_pct,
                max_spread_pct: self.policy.max_spread_pct,
            });
        }
        Ok(spread_pct)
    }

    /// Get the statistics record for an ordered pair, refreshing its
    /// `market_rate` from the live feed. Creates a zero-volume record on
    /// first access.
    ///
    /// # Errors
    /// Returns `InvalidPair` for the identity pair and `PriceUnavailable`
    /// if the market rate cannot be derived.
    pub fn rate_record(
        &mut self,
        feed: &PriceFeed,
        from: TokenType,
        to: TokenType,
    ) -> Result<ConversionRateRecord> {
        if from == to {
            return Err(CredexError::InvalidPair(from));
        }
        let market_rate = self.market_rate(feed, from, to)?;
        let record = self
            .records
            .entry((from, to))
            .or_insert_with(|| ConversionRateRecord::new(from, to, market_rate));
        // Market rate is always live, never cached stale.
        record.market_rate = market_rate;
        Ok(record.clone())
    }

    /// Fold an executed trade into the pair's rolling statistics.
    ///
    /// Volume accumulates; the average rate blends `(prev + rate) / 2`
    /// (first trade sets it directly); the spread is recomputed against
    /// the current market rate. Best-effort with respect to settlement —
    /// callers log and swallow failures.
    pub fn record_executed_trade(
        &mut self,
        feed: &PriceFeed,
        from: TokenType,
        to: TokenType,
        executed_rate: Decimal,
        amount: Decimal,
    ) -> Result<()> {
        self.rate_record(feed, from, to)?;
        let record = self
            .records
            .get_mut(&(from, to))
            .ok_or_else(|| CredexError::Internal("rate record vanished after create".into()))?;

        record.volume_24h += amount;
        record.avg_trade_rate = Some(match record.avg_trade_rate {
            None => executed_rate,
            Some(prev) => (prev + executed_rate) / Decimal::TWO,
        });
        record.spread_percentage =
            Some((executed_rate - record.market_rate).abs() / record.market_rate * HUNDRED);
        record.last_updated = Utc::now();

        info!(
            %from, %to, rate = %executed_rate, %amount,
            volume = %record.volume_24h,
            "conversion rate statistics updated"
        );
        Ok(())
    }

    /// All statistics records, in pair order.
    #[must_use]
    pub fn records(&self) -> Vec<ConversionRateRecord> {
        let mut records: Vec<_> = self.records.values().cloned().collect();
        records.sort_by_key(|r| (r.from_token, r.to_token));
        records
    }

    fn usable_price(feed: &PriceFeed, token: TokenType) -> Result<Decimal> {
        let price = feed
            .latest(token)
            .ok_or(CredexError::PriceUnavailable(token))?;
        if price.reference_price <= Decimal::ZERO {
            return Err(CredexError::PriceUnavailable(token));
        }
        Ok(price.reference_price)
    }
}
