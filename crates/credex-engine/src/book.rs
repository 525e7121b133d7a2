//! The order book — every order ever submitted, resting or settled.
//!
//! Keys are UUIDv7, so `pending` iteration visits orders in submission
//! order; the matcher's first-fit search is therefore deterministic.

use std::collections::{BTreeMap, HashSet};

use credex_types::{CredexError, Order, OrderId, OrderStatus, Result, UserId};
use rust_decimal::Decimal;
use tracing::info;

/// Store of resting and settled orders.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: BTreeMap<OrderId, Order>,
}

impl OrderBook {
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: BTreeMap::new(),
        }
    }

    /// Record an order (any status).
    pub fn insert(&mut self, order: Order) {
        self.orders.insert(order.id, order);
    }

    #[must_use]
    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    /// Remove an order from the book (for settlement); reinsert on failure.
    pub(crate) fn take(&mut self, order_id: OrderId) -> Option<Order> {
        self.orders.remove(&order_id)
    }

    /// A user's orders, most recent first.
    #[must_use]
    pub fn orders_of(&self, user_id: UserId) -> Vec<Order> {
        self.orders
            .values()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Number of orders currently resting.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.orders.values().filter(|o| o.is_pending()).count()
    }

    /// Cancel a pending order. Only the owner may cancel, only while pending.
    ///
    /// # Errors
    /// `OrderNotFound`, `Forbidden` (not the owner), or `OrderNotPending`.
    pub fn cancel(&mut self, order_id: OrderId, owner: UserId) -> Result<Order> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(CredexError::OrderNotFound(order_id))?;
        if order.user_id != owner {
            return Err(CredexError::Forbidden {
                reason: format!("user {owner} does not own order {order_id}"),
            });
        }
        if !order.is_pending() {
            return Err(CredexError::OrderNotPending(order_id));
        }
        order.status = OrderStatus::Cancelled;
        info!(order = %order_id, "order cancelled by owner");
        Ok(order.clone())
    }

    /// First pending counter-order compatible with `order`, in submission
    /// order, skipping any IDs the caller has already found unusable.
    ///
    /// A counter-order qualifies when its pair is the mirror of `order`'s,
    /// it belongs to another user, and its rate sits within `tolerance` of
    /// the reciprocal of `order`'s rate.
    #[must_use]
    pub fn find_match(
        &self,
        order: &Order,
        tolerance: Decimal,
        skip: &HashSet<OrderId>,
    ) -> Option<OrderId> {
        self.orders
            .values()
            .filter(|other| other.is_pending())
            .filter(|other| !skip.contains(&other.id))
            .filter(|other| {
                other.from_token == order.to_token
                    && other.to_token == order.from_token
                    && other.user_id != order.user_id
            })
            .find(|other| rates_compatible(order.exchange_rate, other.exchange_rate, tolerance))
            .map(|other| other.id)
    }
}

/// Whether a counter-order's rate lies within `tolerance` of the reciprocal
/// of the submitted order's rate:
/// `|1/rate − counter_rate| / (1/rate) <= tolerance`.
#[must_use]
pub fn rates_compatible(order_rate: Decimal, counter_rate: Decimal, tolerance: Decimal) -> bool {
    if order_rate <= Decimal::ZERO {
        return false;
    }
    let expected = Decimal::ONE / order_rate;
    (expected - counter_rate).abs() / expected <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use credex_types::TokenType;

    fn order(user: UserId, from: TokenType, to: TokenType, rate: Decimal) -> Order {
        Order::new(user, from, to, Decimal::new(100, 0), rate)
    }

    #[test]
    fn compatible_rates_are_near_reciprocal() {
        let tol = Decimal::new(5, 2); // 5%
        assert!(rates_compatible(Decimal::TWO, Decimal::new(5, 1), tol));
        assert!(rates_compatible(Decimal::TWO, Decimal::new(51, 2), tol));
        assert!(!rates_compatible(Decimal::TWO, Decimal::new(6, 1), tol));
    }

    #[test]
    fn find_match_requires_mirrored_pair() {
        let mut book = OrderBook::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let skip = HashSet::new();
        let tol = Decimal::new(5, 2);

        let submitted = order(alice, TokenType::Openai, TokenType::Anthropic, Decimal::ONE);

        // Same direction: not a counter.
        book.insert(order(bob, TokenType::Openai, TokenType::Anthropic, Decimal::ONE));
        assert!(book.find_match(&submitted, tol, &skip).is_none());

        // Mirrored pair at a reciprocal-compatible rate: matches.
        let counter = order(bob, TokenType::Anthropic, TokenType::Openai, Decimal::ONE);
        book.insert(counter.clone());
        assert_eq!(book.find_match(&submitted, tol, &skip), Some(counter.id));
    }

    #[test]
    fn find_match_skips_own_orders() {
        let mut book = OrderBook::new();
        let alice = UserId::new();
        let skip = HashSet::new();

        let submitted = order(alice, TokenType::Openai, TokenType::Anthropic, Decimal::ONE);
        book.insert(order(alice, TokenType::Anthropic, TokenType::Openai, Decimal::ONE));
        assert!(book.find_match(&submitted, Decimal::new(5, 2), &skip).is_none());
    }

    #[test]
    fn find_match_is_first_fit_in_submission_order() {
        let mut book = OrderBook::new();
        let alice = UserId::new();
        let skip = HashSet::new();

        let first = order(UserId::new(), TokenType::Anthropic, TokenType::Openai, Decimal::ONE);
        let second = order(UserId::new(), TokenType::Anthropic, TokenType::Openai, Decimal::ONE);
        book.insert(first.clone());
        book.insert(second);

        let submitted = order(alice, TokenType::Openai, TokenType::Anthropic, Decimal::ONE);
        assert_eq!(
            book.find_match(&submitted, Decimal::new(5, 2), &skip),
            Some(first.id)
        );
    }

    #[test]
    fn find_match_honors_skip_set() {
        let mut book = OrderBook::new();
        let alice = UserId::new();

        let first = order(UserId::new(), TokenType::Anthropic, TokenType::Openai, Decimal::ONE);
        let second = order(UserId::new(), TokenType::Anthropic, TokenType::Openai, Decimal::ONE);
        book.insert(first.clone());
        book.insert(second.clone());

        let submitted = order(alice, TokenType::Openai, TokenType::Anthropic, Decimal::ONE);
        let skip: HashSet<OrderId> = [first.id].into_iter().collect();
        assert_eq!(
            book.find_match(&submitted, Decimal::new(5, 2), &skip),
            Some(second.id)
        );
    }

    #[test]
    fn cancel_owner_and_state_checks() {
        let mut book = OrderBook::new();
        let alice = UserId::new();
        let bob = UserId::new();
        let o = order(alice, TokenType::Openai, TokenType::Google, Decimal::ONE);
        book.insert(o.clone());

        let err = book.cancel(o.id, bob).unwrap_err();
        assert!(matches!(err, CredexError::Forbidden { .. }));

        let cancelled = book.cancel(o.id, alice).unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let err = book.cancel(o.id, alice).unwrap_err();
        assert!(matches!(err, CredexError::OrderNotPending(id) if id == o.id));
    }

    #[test]
    fn cancel_unknown_order() {
        let mut book = OrderBook::new();
        let err = book.cancel(OrderId::new(), UserId::new()).unwrap_err();
        assert!(matches!(err, CredexError::OrderNotFound(_)));
    }

    #[test]
    fn pending_count_ignores_settled() {
        let mut book = OrderBook::new();
        let mut o = order(UserId::new(), TokenType::Openai, TokenType::Google, Decimal::ONE);
        book.insert(o.clone());
        assert_eq!(book.pending_count(), 1);

        o.status = OrderStatus::Completed;
        book.insert(o);
        assert_eq!(book.pending_count(), 0);
    }
}
