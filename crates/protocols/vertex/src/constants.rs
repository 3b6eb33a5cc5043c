//! Vertex Constants
//!
//! Curve parameters and slippage bounds.

/// Price slope of the linear curve `price(supply) = SLOPE * supply / 10^18`
pub const SLOPE: u64 = 1_000_000_000_000_000;

/// Fixed-point scale keeping the curve inversion integral (10^36)
pub const SCALE_EXP: u32 = 36;

/// One whole token / ETH in smallest units (10^18)
pub const UNIT_EXP: u32 = vertex_core::constants::TOKEN_DECIMALS;

/// Slippage bounds, as percent of the quoted price
pub mod slippage {
    /// Buy ceiling numerator: max cost = quote * 105 / 100
    pub const BUY_CEILING_PCT: u64 = 105;
    /// Sell floor numerator: min return = quote * 95 / 100
    pub const SELL_FLOOR_PCT: u64 = 95;
    pub const PCT_DENOM: u64 = 100;
}

/// Number of points sampled for the curve chart
pub const CURVE_CHART_POINTS: usize = 20;

/// Chart range when the supply is zero, in whole tokens
pub const EMPTY_CURVE_CHART_TOKENS: u64 = 100;
