//! Vertex Calculator
//!
//! Pure integer math for the linear bonding curve. No async, no RPC.
//!
//! The curve prices a whole token at `SLOPE * supply / 10^18` wei, so the cost
//! of moving supply from `s0` to `s1` is the integral
//!   cost = SLOPE * (s1² - s0²) / (2 * 10^36)
//!
//! Inverting it gives the tokens bought for `eth` wei:
//!   s1 = sqrt(s0² + 2 * 10^36 * eth / SLOPE)

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::constants::{slippage, SCALE_EXP, SLOPE, UNIT_EXP};
use vertex_core::Wei;

/// Floor of the square root, by Newton iteration starting from `value / 2`.
///
/// Negative input returns 0.
pub fn integer_sqrt(value: &BigInt) -> BigInt {
    if value.is_negative() {
        return BigInt::zero();
    }
    if *value < BigInt::from(2) {
        return value.clone();
    }

    let mut x0: BigInt = value / 2;
    let mut x1: BigInt = (&x0 + value / &x0) / 2;
    while x1 < x0 {
        x0 = x1;
        x1 = (&x0 + value / &x0) / 2;
    }
    x0
}

/// Tokens received for spending `eth_amount` wei at the current `total_supply`.
///
/// Client-side estimate of what the contract computes; the result is fed back
/// into `getBuyPrice` for the authoritative cost. Returns 0 if `eth_amount <= 0`.
pub fn estimate_token_amount(eth_amount: &Wei, total_supply: &Wei) -> Wei {
    if !eth_amount.is_positive() {
        return BigInt::zero();
    }

    let scale = BigInt::from(10).pow(SCALE_EXP);
    let radicand = total_supply * total_supply + (BigInt::from(2) * scale * eth_amount) / SLOPE;
    integer_sqrt(&radicand) - total_supply
}

/// Highest ETH a buy may cost: `quote * 105 / 100`, truncating.
pub fn max_eth_cost(quote_price: &Wei) -> Wei {
    quote_price * slippage::BUY_CEILING_PCT / slippage::PCT_DENOM
}

/// Lowest ETH a sell may return: `quote * 95 / 100`, truncating.
pub fn min_eth_return(quote_price: &Wei) -> Wei {
    quote_price * slippage::SELL_FLOOR_PCT / slippage::PCT_DENOM
}

/// Marginal price of one whole token at `supply`
pub fn spot_price_at(supply: &Wei) -> Wei {
    supply * SLOPE / BigInt::from(10).pow(UNIT_EXP)
}

/// A sampled point on the price curve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurvePoint {
    pub supply: Wei,
    pub price: Wei,
}

/// Sample `points` evenly spaced prices from zero supply to 1.5x `total_supply`.
///
/// With no supply the range is `empty_range_tokens` whole tokens instead.
pub fn curve_points(total_supply: &Wei, points: usize, empty_range_tokens: u64) -> Vec<CurvePoint> {
    if points == 0 {
        return Vec::new();
    }

    let max_view = if total_supply.is_positive() {
        total_supply * 3 / 2
    } else {
        BigInt::from(empty_range_tokens) * BigInt::from(10).pow(UNIT_EXP)
    };

    let last = (points - 1).max(1);
    (0..points)
        .map(|i| {
            let supply = &max_view * i / last;
            let price = spot_price_at(&supply);
            CurvePoint { supply, price }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eth(whole: u64) -> BigInt {
        BigInt::from(whole) * BigInt::from(10).pow(18)
    }

    #[test]
    fn test_integer_sqrt_small_values() {
        assert_eq!(integer_sqrt(&BigInt::from(0)), BigInt::from(0));
        assert_eq!(integer_sqrt(&BigInt::from(1)), BigInt::from(1));
        assert_eq!(integer_sqrt(&BigInt::from(2)), BigInt::from(1));
        assert_eq!(integer_sqrt(&BigInt::from(3)), BigInt::from(1));
        assert_eq!(integer_sqrt(&BigInt::from(4)), BigInt::from(2));
        assert_eq!(integer_sqrt(&BigInt::from(99)), BigInt::from(9));
        assert_eq!(integer_sqrt(&BigInt::from(100)), BigInt::from(10));
    }

    #[test]
    fn test_integer_sqrt_negative_guard() {
        assert_eq!(integer_sqrt(&BigInt::from(-16)), BigInt::from(0));
    }

    #[test]
    fn test_integer_sqrt_beyond_u128() {
        // (10^40)² = 10^80, well past 256 bits of headroom
        let root = BigInt::from(10).pow(40);
        let square = &root * &root;
        assert_eq!(integer_sqrt(&square), root);
        assert_eq!(integer_sqrt(&(&square - 1)), &root - 1);
    }

    proptest! {
        #[test]
        fn prop_integer_sqrt_is_floor(hi in any::<u64>(), lo in any::<u128>()) {
            let n = (BigInt::from(hi) << 128) + BigInt::from(lo);
            let r = integer_sqrt(&n);
            prop_assert!(&r * &r <= n);
            let next = &r + 1;
            prop_assert!(n < &next * &next);
        }
    }

    #[test]
    fn test_estimate_zero_and_negative() {
        assert_eq!(estimate_token_amount(&BigInt::from(0), &eth(1000)), BigInt::from(0));
        assert_eq!(estimate_token_amount(&BigInt::from(-1), &eth(1000)), BigInt::from(0));
        assert_eq!(estimate_token_amount(&BigInt::from(-1), &BigInt::from(0)), BigInt::from(0));
    }

    #[test]
    fn test_estimate_from_empty_supply() {
        let spend = eth(1);
        let expected = integer_sqrt(&(BigInt::from(2) * BigInt::from(10).pow(36) * &spend / SLOPE));
        assert_eq!(estimate_token_amount(&spend, &BigInt::from(0)), expected);
        // sqrt(2 * 10^39) ≈ 44.72 tokens
        assert_eq!(expected, BigInt::from(44_721_359_549_995_793_928u128));
    }

    #[test]
    fn test_estimate_matches_curve_integral() {
        // From 100 tokens, buying up to 200 tokens costs SLOPE * (200² - 100²) / 2 in whole-token units
        // = 10^15 * 30000 / 2 wei-per-token-squared = 15 ETH
        let supply = eth(100);
        let tokens = estimate_token_amount(&eth(15), &supply);
        assert_eq!(tokens, eth(100));
    }

    #[test]
    fn test_estimate_decreases_as_supply_grows() {
        let spend = eth(1);
        let early = estimate_token_amount(&spend, &eth(10));
        let late = estimate_token_amount(&spend, &eth(10_000));
        assert!(early > late);
        assert!(late > BigInt::from(0));
    }

    #[test]
    fn test_slippage_bounds() {
        assert_eq!(max_eth_cost(&BigInt::from(1000)), BigInt::from(1050));
        assert_eq!(min_eth_return(&BigInt::from(1000)), BigInt::from(950));
        // truncating
        assert_eq!(max_eth_cost(&BigInt::from(19)), BigInt::from(19));
        assert_eq!(min_eth_return(&BigInt::from(19)), BigInt::from(18));
    }

    #[test]
    fn test_spot_price_at() {
        // one whole token of supply prices at 0.001 ETH
        assert_eq!(spot_price_at(&eth(1)), BigInt::from(10).pow(15));
        assert_eq!(spot_price_at(&BigInt::from(0)), BigInt::from(0));
    }

    #[test]
    fn test_curve_points() {
        let points = curve_points(&eth(200), 20, 100);
        assert_eq!(points.len(), 20);
        assert_eq!(points[0].supply, BigInt::from(0));
        assert_eq!(points[19].supply, eth(300));
        assert_eq!(points[19].price, spot_price_at(&eth(300)));
        assert!(points.windows(2).all(|w| w[0].price <= w[1].price));

        let empty = curve_points(&BigInt::from(0), 20, 100);
        assert_eq!(empty[19].supply, eth(100));

        assert!(curve_points(&eth(1), 0, 100).is_empty());
    }
}
