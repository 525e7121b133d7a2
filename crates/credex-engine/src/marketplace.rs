//! The marketplace facade: one owner for all core state.
//!
//! `Marketplace` wires the ledger, price feed, rate oracle, trade desk, and
//! order book together and exposes the operations callers consume. It holds
//! `&mut self` across every mutating operation, so each operation observes
//! and produces a consistent state.

use chrono::Utc;
use credex_ledger::Ledger;
use credex_oracle::{PriceFeed, RateOracle};
use credex_settlement::{TradeDesk, create_trade, execute_trade};
use credex_types::{
    ConversionRateRecord, CredexError, EntryKind, LedgerEntry, MarketPrice, Order, OrderId,
    RatePolicy, Result, TokenType, Trade, TradeId, UserId, constants,
};
use rust_decimal::Decimal;
use tracing::info;

use crate::book::OrderBook;
use crate::matcher;

/// Facade over the marketplace core.
#[derive(Debug, Default)]
pub struct Marketplace {
    ledger: Ledger,
    feed: PriceFeed,
    oracle: RateOracle,
    desk: TradeDesk,
    book: OrderBook,
    policy: RatePolicy,
}

impl Marketplace {
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(RatePolicy::default())
    }

    #[must_use]
    pub fn with_policy(policy: RatePolicy) -> Self {
        info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            max_spread_pct = %policy.max_spread_pct,
            match_tolerance = %policy.match_tolerance,
            "marketplace core initialized"
        );
        Self {
            ledger: Ledger::new(),
            feed: PriceFeed::new(),
            oracle: RateOracle::new(policy.clone()),
            desk: TradeDesk::new(),
            book: OrderBook::new(),
            policy,
        }
    }

    // --- prices and rates ---

    /// Feed a new reference price for a token.
    pub fn update_price(&mut self, token: TokenType, reference_price: Decimal, usd_price: Decimal) {
        self.feed.update(token, reference_price, usd_price);
    }

    #[must_use]
    pub fn market_prices(&self) -> Vec<MarketPrice> {
        self.feed.all()
    }

    /// Reference rate for a pair, from current prices.
    ///
    /// # Errors
    /// `PriceUnavailable` if either token lacks a usable price.
    pub fn market_rate(&self, from: TokenType, to: TokenType) -> Result<Decimal> {
        self.oracle.market_rate(&self.feed, from, to)
    }

    /// Statistics record for a pair, with a live market rate.
    ///
    /// # Errors
    /// `InvalidPair` for the identity pair, `PriceUnavailable` otherwise.
    pub fn conversion_rate(
        &mut self,
        from: TokenType,
        to: TokenType,
    ) -> Result<ConversionRateRecord> {
        self.oracle.rate_record(&self.feed, from, to)
    }

    /// All pair statistics records seen so far.
    #[must_use]
    pub fn conversion_rates(&self) -> Vec<ConversionRateRecord> {
        self.oracle.records()
    }

    // --- balances ---

    /// Credit a user with funds from outside the marketplace.
    ///
    /// # Errors
    /// `InvalidAmount` for non-positive amounts.
    pub fn deposit(
        &mut self,
        user_id: UserId,
        token: TokenType,
        amount: Decimal,
    ) -> Result<LedgerEntry> {
        Self::check_positive(amount)?;
        self.ledger
            .apply_delta(user_id, token, amount, EntryKind::Deposit, None, None)
    }

    /// Debit a user's balance out of the marketplace.
    ///
    /// # Errors
    /// `InvalidAmount` for non-positive amounts, `InsufficientBalance` on
    /// overdraft.
    pub fn withdraw(
        &mut self,
        user_id: UserId,
        token: TokenType,
        amount: Decimal,
    ) -> Result<LedgerEntry> {
        Self::check_positive(amount)?;
        self.ledger
            .apply_delta(user_id, token, -amount, EntryKind::Withdrawal, None, None)
    }

    /// Seed a new user with a starting balance.
    ///
    /// # Errors
    /// `InvalidAmount` for non-positive amounts.
    pub fn grant_initial_balance(
        &mut self,
        user_id: UserId,
        token: TokenType,
        amount: Decimal,
    ) -> Result<LedgerEntry> {
        Self::check_positive(amount)?;
        self.ledger.apply_delta(
            user_id,
            token,
            amount,
            EntryKind::InitialBalance,
            None,
            Some(format!("Initial {token} balance")),
        )
    }

    #[must_use]
    pub fn balance(&self, user_id: UserId, token: TokenType) -> Decimal {
        self.ledger.balance(user_id, token)
    }

    #[must_use]
    pub fn balances_of(&self, user_id: UserId) -> Vec<(TokenType, Decimal)> {
        self.ledger.balances_of(user_id)
    }

    /// A user's ledger entries, most recent first. `limit` defaults from
    /// policy when `None`.
    #[must_use]
    pub fn transaction_history(
        &self,
        user_id: UserId,
        token_filter: Option<TokenType>,
        limit: Option<usize>,
    ) -> Vec<LedgerEntry> {
        let limit = limit.unwrap_or(self.policy.default_history_limit);
        self.ledger.history(user_id, token_filter, limit)
    }

    /// A user's daily balance snapshots, most recent date first.
    #[must_use]
    pub fn balance_history(
        &self,
        user_id: UserId,
        token_filter: Option<TokenType>,
        days: Option<usize>,
    ) -> Vec<credex_types::BalanceSnapshot> {
        let days = days.unwrap_or(self.policy.default_history_days);
        self.ledger.balance_history(user_id, token_filter, days)
    }

    /// Write today's balance snapshot for a user. Idempotent per day;
    /// returns the number of rows written.
    pub fn snapshot_now(&mut self, user_id: UserId) -> usize {
        self.ledger.snapshot_daily(user_id, Utc::now().date_naive())
    }

    /// Assert a (user, token) balance matches the replay of the entry log.
    ///
    /// # Errors
    /// `Internal` if the materialized balance has diverged from the log.
    pub fn reconcile(&self, user_id: UserId, token: TokenType) -> Result<()> {
        self.ledger.reconcile(user_id, token)
    }

    // --- trades ---

    /// Create an active trade awaiting an executor. Validates the rate
    /// against the market when `validate_rate` is set.
    ///
    /// # Errors
    /// See [`credex_settlement::create_trade`].
    pub fn create_trade(
        &mut self,
        creator: UserId,
        from_token: TokenType,
        to_token: TokenType,
        exchange_rate: Decimal,
        amount: Decimal,
        validate_rate: bool,
    ) -> Result<Trade> {
        create_trade(
            &self.ledger,
            &self.oracle,
            &self.feed,
            &mut self.desk,
            creator,
            from_token,
            to_token,
            exchange_rate,
            amount,
            validate_rate,
        )
    }

    /// Settle an active trade as `executor`.
    ///
    /// # Errors
    /// See [`credex_settlement::execute_trade`].
    pub fn execute_trade(&mut self, trade_id: TradeId, executor: UserId) -> Result<Trade> {
        execute_trade(
            &mut self.ledger,
            &mut self.oracle,
            &self.feed,
            &mut self.desk,
            trade_id,
            executor,
        )
    }

    /// Cancel an active trade. Only its creator may cancel.
    ///
    /// # Errors
    /// `TradeNotFound`, `Forbidden`, `TradeNotActive`.
    pub fn cancel_trade(&mut self, trade_id: TradeId, actor: UserId) -> Result<Trade> {
        self.desk.cancel(trade_id, actor)
    }

    #[must_use]
    pub fn trade(&self, trade_id: TradeId) -> Option<&Trade> {
        self.desk.get(trade_id)
    }

    /// Active trades created by other users, available to `viewer`.
    #[must_use]
    pub fn open_trades(&self, viewer: UserId) -> Vec<Trade> {
        self.desk.open_trades(viewer)
    }

    #[must_use]
    pub fn trades_of(&self, user_id: UserId) -> Vec<Trade> {
        self.desk.trades_of(user_id)
    }

    // --- orders ---

    /// Submit an order; match immediately when possible, rest otherwise.
    ///
    /// # Errors
    /// See [`matcher::submit_order`].
    pub fn submit_order(
        &mut self,
        user_id: UserId,
        from_token: TokenType,
        to_token: TokenType,
        amount: Decimal,
        exchange_rate: Decimal,
    ) -> Result<(Order, Option<Trade>)> {
        matcher::submit_order(
            &mut self.ledger,
            &mut self.oracle,
            &self.feed,
            &mut self.desk,
            &mut self.book,
            user_id,
            from_token,
            to_token,
            amount,
            exchange_rate,
            self.policy.match_tolerance,
        )
    }

    /// Cancel a pending order. Only its owner may cancel.
    ///
    /// # Errors
    /// `OrderNotFound`, `Forbidden`, `OrderNotPending`.
    pub fn cancel_order(&mut self, order_id: OrderId, owner: UserId) -> Result<Order> {
        self.book.cancel(order_id, owner)
    }

    #[must_use]
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.book.get(order_id)
    }

    #[must_use]
    pub fn orders_of(&self, user_id: UserId) -> Vec<Order> {
        self.book.orders_of(user_id)
    }

    fn check_positive(amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(CredexError::InvalidAmount {
                reason: format!("amount must be positive, got {amount}"),
            });
        }
        Ok(())
    }
}
