//! Order submission and first-fit matching.
//!
//! A submitted order is settled against the oldest compatible resting
//! counter-order, or rests in the book when none exists. Partial fills
//! reissue the unconsumed remainder of each side as a fresh pending order,
//! so no quantity is ever silently dropped.

use std::collections::HashSet;

use credex_ledger::Ledger;
use credex_oracle::{PriceFeed, RateOracle};
use credex_settlement::{TradeDesk, check_terms, settle_matched_orders};
use credex_types::{CredexError, Order, Result, TokenType, Trade, UserId};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::book::OrderBook;

/// Submit an order and try to match it immediately.
///
/// Returns the order as stored (completed if it matched, pending if it
/// rests) together with the settlement trade, if any. Counter-orders that
/// turn out stale or underfunded are skipped and the next candidate is
/// tried; the submitter is never failed by a counterparty's ledger state.
///
/// # Errors
/// `InvalidPair` / `InvalidAmount` on bad terms, `InsufficientBalance` if
/// the submitter cannot fund the offered amount.
#[allow(clippy::too_many_arguments)]
pub fn submit_order(
    ledger: &mut Ledger,
    oracle: &mut RateOracle,
    feed: &PriceFeed,
    desk: &mut TradeDesk,
    book: &mut OrderBook,
    user_id: UserId,
    from_token: TokenType,
    to_token: TokenType,
    amount: Decimal,
    exchange_rate: Decimal,
    tolerance: Decimal,
) -> Result<(Order, Option<Trade>)> {
    check_terms(from_token, to_token, exchange_rate, amount)?;

    let available = ledger.balance(user_id, from_token);
    if available < amount {
        return Err(CredexError::InsufficientBalance {
            needed: amount,
            available,
        });
    }

    let mut order = Order::new(user_id, from_token, to_token, amount, exchange_rate);
    info!(order = %order.id, %from_token, %to_token, %amount, "order submitted");

    let mut skip: HashSet<_> = HashSet::new();
    loop {
        let Some(counter_id) = book.find_match(&order, tolerance, &skip) else {
            // No compatible counter-order: rest in the book.
            book.insert(order.clone());
            return Ok((order, None));
        };
        let Some(mut counter) = book.take(counter_id) else {
            skip.insert(counter_id);
            continue;
        };

        // Fill is capped by what the counter-order can absorb, measured in
        // the submitted order's from_token units.
        let fill = order.amount.min(counter.amount / counter.exchange_rate);

        match settle_matched_orders(ledger, oracle, feed, desk, &mut order, &mut counter, fill) {
            Ok(trade) => {
                let order_remainder = order.amount - fill;
                let counter_remainder = counter.amount - fill * order.exchange_rate;

                book.insert(counter.clone());
                book.insert(order.clone());
                reissue_remainder(book, &order, order_remainder);
                reissue_remainder(book, &counter, counter_remainder);

                return Ok((order, Some(trade)));
            }
            Err(
                err @ (CredexError::ConcurrentModification(_)
                | CredexError::InsufficientBalance { .. }),
            ) => {
                // A stale or underfunded counter-order loses its turn;
                // keep it on record and try the next candidate.
                debug!(counter = %counter.id, %err, "counter-order skipped");
                book.insert(counter);
                skip.insert(counter_id);
            }
            Err(err) => {
                book.insert(counter);
                return Err(err);
            }
        }
    }
}

/// Reissue the unfilled portion of a settled order as a new pending order
/// at the same terms.
fn reissue_remainder(book: &mut OrderBook, settled: &Order, remainder: Decimal) {
    if remainder <= Decimal::ZERO {
        return;
    }
    let reissued = Order::new(
        settled.user_id,
        settled.from_token,
        settled.to_token,
        remainder,
        settled.exchange_rate,
    );
    info!(
        settled = %settled.id,
        reissued = %reissued.id,
        %remainder,
        "remainder reissued"
    );
    book.insert(reissued);
}
