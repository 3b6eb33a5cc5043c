//! Vertex Bonding Curve Client
//!
//! Vertex sells its token along a linear bonding curve: each token costs more
//! than the last, and the contract buys tokens back along the same line. This
//! crate turns typed amounts into quotes against the live curve and drives
//! buy/sell transactions with a slippage bound through to confirmation.

pub mod amount;
pub mod calculator;
pub mod constants;
pub mod debounce;
pub mod notify;
pub mod quote;
pub mod session;
pub mod state;
pub mod trade;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use amount::{format_amount, parse_amount};
pub use calculator::{
    curve_points, estimate_token_amount, integer_sqrt, max_eth_cost, min_eth_return,
    spot_price_at, CurvePoint,
};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use notify::{LogNotifier, NotificationKind, Notifier, TradeNotification};
pub use quote::{derive_token_amount, draft_quote, watch_quotes, QuoteEngine, QuoteFeed, Read};
pub use session::QuoteSession;
pub use state::{ChainState, CurveState, Quote, TradeExecution, TradePhase};
pub use trade::{TradeCoordinator, TradeOrder};
