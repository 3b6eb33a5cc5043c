//! Amount parsing and display
//!
//! User text is turned into an 18-decimal fixed-point integer. Anything that
//! is not a plain unsigned decimal maps to zero rather than an error, since the
//! parser sits directly on the input path.

use std::sync::OnceLock;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use regex::Regex;

use crate::constants::UNIT_EXP;
use vertex_core::Wei;

fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+(\.\d+)?$").expect("static amount pattern"))
}

/// Parse decimal text (e.g. `"1.5"`) into smallest units.
///
/// Returns 0 for empty text, anything other than digits with an optional
/// single fractional part, or more than 18 fractional digits.
pub fn parse_amount(text: &str) -> Wei {
    if text.is_empty() || !amount_pattern().is_match(text) {
        return BigInt::zero();
    }
    to_fixed_point(text, UNIT_EXP).unwrap_or_else(BigInt::zero)
}

fn to_fixed_point(text: &str, decimals: u32) -> Option<Wei> {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (text, ""),
    };
    if fraction.len() > decimals as usize {
        return None;
    }

    let padded = format!("{}{:0<width$}", whole, fraction, width = decimals as usize);
    BigInt::parse_bytes(padded.as_bytes(), 10)
}

/// Render smallest units as decimal text, trimming trailing zeros.
///
/// With `precision`, the fraction is cut (not rounded) to that many digits and
/// padded to exactly that width.
pub fn format_amount(amount: &Wei, precision: Option<usize>) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let digits = amount.abs().to_string();
    let decimals = UNIT_EXP as usize;

    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);

    let fraction = match precision {
        Some(p) => format!("{:0<p$}", &fraction[..p.min(decimals)], p = p),
        None => fraction.trim_end_matches('0').to_string(),
    };

    if fraction.is_empty() {
        format!("{}{}", sign, whole)
    } else {
        format!("{}{}.{}", sign, whole, fraction)
    }
}
