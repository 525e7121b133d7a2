//! Trade creation and atomic settlement.
//!
//! Settlement is the only path that moves value, and it always moves it
//! through a single [`LedgerTxn`]: four deltas, all or nothing. Statistics
//! and snapshots run after the commit and are never allowed to fail a
//! settled trade.

use chrono::Utc;
use credex_ledger::{Ledger, LedgerTxn};
use credex_oracle::{PriceFeed, RateOracle};
use credex_types::{
    CredexError, EntryKind, Order, OrderStatus, Result, TokenType, Trade, TradeId, UserId,
};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::desk::TradeDesk;

/// Create an active trade awaiting an executor. Creation never moves
/// balances; it only checks that the creator could fund the send side.
///
/// # Errors
/// `InvalidPair`, `InvalidAmount`, `InsufficientBalance`, and (when
/// `validate_rate` is set) `PriceUnavailable` / `RateOutOfBand`.
pub fn create_trade(
    ledger: &Ledger,
    oracle: &RateOracle,
    feed: &PriceFeed,
    desk: &mut TradeDesk,
    creator: UserId,
    from_token: TokenType,
    to_token: TokenType,
    exchange_rate: Decimal,
    amount: Decimal,
    validate_rate: bool,
) -> Result<Trade> {
    check_terms(from_token, to_token, exchange_rate, amount)?;

    let available = ledger.balance(creator, from_token);
    if available < amount {
        return Err(CredexError::InsufficientBalance {
            needed: amount,
            available,
        });
    }

    if validate_rate {
        let market = oracle.market_rate(feed, from_token, to_token)?;
        oracle.validate_rate(exchange_rate, market)?;
    }

    let trade = Trade::new(creator, from_token, to_token, exchange_rate, amount);
    info!(trade = %trade.id, %from_token, %to_token, %amount, "trade created");
    desk.insert(trade.clone());
    Ok(trade)
}

/// Settle an active trade against an executor.
///
/// Performs exactly four ledger deltas in one unit of work:
/// 1. debit creator `from_token` by `amount`
/// 2. credit creator `to_token` by `amount * rate`
/// 3. debit executor `to_token` by `amount * rate`
/// 4. credit executor `from_token` by `amount`
///
/// Any delta failure aborts the whole operation: balances stay unchanged
/// and the trade stays `active`.
///
/// # Errors
/// `TradeNotFound`, `TradeNotActive`, `SelfExecution`, `InsufficientBalance`.
pub fn execute_trade(
    ledger: &mut Ledger,
    oracle: &mut RateOracle,
    feed: &PriceFeed,
    desk: &mut TradeDesk,
    trade_id: TradeId,
    executor: UserId,
) -> Result<Trade> {
    let trade = desk
        .get(trade_id)
        .ok_or(CredexError::TradeNotFound(trade_id))?
        .clone();
    if !trade.is_active() {
        return Err(CredexError::TradeNotActive(trade_id));
    }
    if executor == trade.creator_id {
        return Err(CredexError::SelfExecution(trade_id));
    }

    let counter_amount = trade.required_to_amount();
    let available = ledger.balance(executor, trade.to_token);
    if available < counter_amount {
        return Err(CredexError::InsufficientBalance {
            needed: counter_amount,
            available,
        });
    }

    let mut txn = ledger.begin();
    stage_exchange(
        &mut txn,
        trade_id,
        trade.creator_id,
        executor,
        trade.from_token,
        trade.to_token,
        trade.amount,
        counter_amount,
    )?;
    txn.commit();

    let settled = desk.mark_completed(trade_id, executor)?;
    info!(trade = %trade_id, %executor, "trade settled");

    finish_settlement(
        ledger,
        oracle,
        feed,
        trade.creator_id,
        executor,
        trade.from_token,
        trade.to_token,
        trade.exchange_rate,
        trade.amount,
    );
    Ok(settled)
}

/// Settle two matched resting orders. The submitted order's rate is
/// authoritative; `fill` is in the submitted order's `from_token` units.
///
/// Re-validates that both orders are still pending inside the settlement
/// boundary — a stale side surfaces as `ConcurrentModification` so the
/// matcher can retry its search.
///
/// # Errors
/// `ConcurrentModification` on a stale order, `InsufficientBalance` if
/// either side cannot fund its leg.
pub fn settle_matched_orders(
    ledger: &mut Ledger,
    oracle: &mut RateOracle,
    feed: &PriceFeed,
    desk: &mut TradeDesk,
    order: &mut Order,
    counter: &mut Order,
    fill: Decimal,
) -> Result<Trade> {
    if !order.is_pending() {
        return Err(CredexError::ConcurrentModification(order.id));
    }
    if !counter.is_pending() {
        return Err(CredexError::ConcurrentModification(counter.id));
    }

    let counter_amount = fill * order.exchange_rate;
    let trade = Trade::new(
        order.user_id,
        order.from_token,
        order.to_token,
        order.exchange_rate,
        fill,
    );
    let trade_id = trade.id;

    let mut txn = ledger.begin();
    stage_exchange(
        &mut txn,
        trade_id,
        order.user_id,
        counter.user_id,
        order.from_token,
        order.to_token,
        fill,
        counter_amount,
    )?;
    txn.commit();

    desk.insert(trade);
    let settled = desk.mark_completed(trade_id, counter.user_id)?;

    let now = Utc::now();
    order.status = OrderStatus::Completed;
    order.matched_order = Some(counter.id);
    order.matched_at = Some(now);
    counter.status = OrderStatus::Completed;
    counter.matched_order = Some(order.id);
    counter.matched_at = Some(now);

    info!(
        trade = %trade_id,
        order = %order.id,
        counter = %counter.id,
        %fill,
        "matched orders settled"
    );

    finish_settlement(
        ledger,
        oracle,
        feed,
        order.user_id,
        counter.user_id,
        order.from_token,
        order.to_token,
        order.exchange_rate,
        fill,
    );
    Ok(settled)
}

/// Shared validation for trade and order terms.
pub fn check_terms(
    from_token: TokenType,
    to_token: TokenType,
    exchange_rate: Decimal,
    amount: Decimal,
) -> Result<()> {
    if from_token == to_token {
        return Err(CredexError::InvalidPair(from_token));
    }
    if amount <= Decimal::ZERO {
        return Err(CredexError::InvalidAmount {
            reason: format!("amount must be positive, got {amount}"),
        });
    }
    if exchange_rate <= Decimal::ZERO {
        return Err(CredexError::InvalidAmount {
            reason: format!("exchange rate must be positive, got {exchange_rate}"),
        });
    }
    Ok(())
}

/// Stage the four-delta exchange pattern into an open transaction.
#[allow(clippy::too_many_arguments)]
fn stage_exchange(
    txn: &mut LedgerTxn<'_>,
    trade_id: TradeId,
    sender: UserId,
    receiver: UserId,
    from_token: TokenType,
    to_token: TokenType,
    amount: Decimal,
    counter_amount: Decimal,
) -> Result<()> {
    txn.stage_delta(
        sender,
        from_token,
        -amount,
        EntryKind::TradeSend,
        Some(trade_id),
        Some(format!("Trade {trade_id}: sent {amount} {from_token}")),
    )?;
    txn.stage_delta(
        sender,
        to_token,
        counter_amount,
        EntryKind::TradeReceive,
        Some(trade_id),
        Some(format!(
            "Trade {trade_id}: received {counter_amount} {to_token}"
        )),
    )?;
    txn.stage_delta(
        receiver,
        to_token,
        -counter_amount,
        EntryKind::TradeSend,
        Some(trade_id),
        Some(format!(
            "Trade {trade_id}: sent {counter_amount} {to_token}"
        )),
    )?;
    txn.stage_delta(
        receiver,
        from_token,
        amount,
        EntryKind::TradeReceive,
        Some(trade_id),
        Some(format!("Trade {trade_id}: received {amount} {from_token}")),
    )?;
    Ok(())
}

/// Post-commit side effects: statistics and daily snapshots. Best-effort —
/// a failure here must never report a settled trade as failed.
#[allow(clippy::too_many_arguments)]
fn finish_settlement(
    ledger: &mut Ledger,
    oracle: &mut RateOracle,
    feed: &PriceFeed,
    creator: UserId,
    executor: UserId,
    from_token: TokenType,
    to_token: TokenType,
    rate: Decimal,
    amount: Decimal,
) {
    if let Err(err) = oracle.record_executed_trade(feed, from_token, to_token, rate, amount) {
        warn!(%from_token, %to_token, %err, "rate statistics update skipped");
    }
    let today = Utc::now().date_naive();
    ledger.snapshot_daily(creator, today);
    ledger.snapshot_daily(executor, today);
}
