//! Policy configuration for rate validation, matching, and history queries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Tunable policy knobs for the marketplace core.
///
/// These are operational policy, not business law: the spread bound and
/// match tolerance are expected to be tuned per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatePolicy {
    /// Maximum |proposed − market| / market × 100 accepted when validating
    /// a proposed trade rate.
    pub max_spread_pct: Decimal,
    /// Relative tolerance between a counter-order's rate and the reciprocal
    /// of the submitted order's rate (e.g. 0.05 = 5%).
    pub match_tolerance: Decimal,
    /// Default limit for transaction-history queries.
    pub default_history_limit: usize,
    /// Default day window for balance-history queries.
    pub default_history_days: usize,
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self {
            max_spread_pct: Decimal::from(constants::DEFAULT_MAX_SPREAD_PCT),
            match_tolerance: Decimal::new(i64::from(constants::DEFAULT_MATCH_TOLERANCE_BPS), 4),
            default_history_limit: constants::DEFAULT_HISTORY_LIMIT,
            default_history_days: constants::DEFAULT_HISTORY_DAYS,
        }
    }
}
