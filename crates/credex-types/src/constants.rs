//! System-wide constants for the Credex marketplace core.

/// Maximum spread from the market rate a proposed trade rate may carry,
/// in percent. Policy default; override via [`crate::RatePolicy`].
pub const DEFAULT_MAX_SPREAD_PCT: u32 = 15;

/// Relative tolerance when checking a counter-order's rate against the
/// reciprocal of the submitted order's rate (5%).
pub const DEFAULT_MATCH_TOLERANCE_BPS: u32 = 500;

/// Default number of ledger entries returned by history queries.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Default day window for balance-history queries.
pub const DEFAULT_HISTORY_DAYS: usize = 30;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Credex";
