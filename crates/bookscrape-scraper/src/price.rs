//! Price text parsing and currency conversion.
//!
//! Listing prices arrive as display strings such as `"£51.77"`. Pages served
//! with the wrong charset render the pound sign as `"Â£51.77"`, so parsing
//! keeps only ASCII digits and the decimal point rather than matching a
//! specific currency symbol.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::PriceParseError;
use crate::exchange_rate::ExchangeRate;

static NON_NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("valid price regex"));

/// Parses a display price into a non-negative decimal.
///
/// # Errors
///
/// Returns [`PriceParseError`] if nothing parseable remains after stripping
/// non-numeric characters (empty input, `"invalid"`, `"1.2.3"`).
pub fn clean_price(raw: &str) -> Result<Decimal, PriceParseError> {
    let stripped = NON_NUMERIC_RE.replace_all(raw, "");
    Decimal::from_str(&stripped).map_err(|_| PriceParseError {
        raw: raw.to_owned(),
    })
}

/// Converts `price` with `rate`, rounded to 2 dp (midpoint away from zero).
///
/// Returns `None` only if the multiplication overflows.
#[must_use]
pub fn convert_price(price: Decimal, rate: ExchangeRate) -> Option<Decimal> {
    price
        .checked_mul(rate.value())
        .map(|v| v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

#[cfg(test)]
#[path = "price_test.rs"]
mod tests;
