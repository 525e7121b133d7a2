//! Reference price store, refreshed by an external price-feed collaborator.

use std::collections::BTreeMap;

use credex_types::{MarketPrice, TokenType};
use rust_decimal::Decimal;
use tracing::info;

/// Latest reference prices per token type. The core only reads; an external
/// collaborator calls [`PriceFeed::update`] on its own cadence.
#[derive(Debug, Default)]
pub struct PriceFeed {
    prices: BTreeMap<TokenType, MarketPrice>,
}

impl PriceFeed {
    #[must_use]
    pub fn new() -> Self {
        Self {
            prices: BTreeMap::new(),
        }
    }

    /// Replace the reference price for a token.
    pub fn update(&mut self, token: TokenType, reference_price: Decimal, usd_price: Decimal) {
        info!(%token, %reference_price, "market price updated");
        self.prices
            .insert(token, MarketPrice::new(token, reference_price, usd_price));
    }

    /// Latest price for a token, if one has been supplied.
    #[must_use]
    pub fn latest(&self, token: TokenType) -> Option<&MarketPrice> {
        self.prices.get(&token)
    }

    /// All known prices, in canonical token order.
    #[must_use]
    pub fn all(&self) -> Vec<MarketPrice> {
        self.prices.values().cloned().collect()
    }
}
