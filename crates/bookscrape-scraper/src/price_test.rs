use super::*;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ---------------------------------------------------------------------------
// clean_price
// ---------------------------------------------------------------------------

#[test]
fn clean_price_strips_pound_sign() {
    assert_eq!(clean_price("£51.77").unwrap(), dec("51.77"));
}

#[test]
fn clean_price_handles_mojibake_pound_sign() {
    assert_eq!(clean_price("Â£53.74").unwrap(), dec("53.74"));
}

#[test]
fn clean_price_zero() {
    let price = clean_price("£0.00").unwrap();
    assert_eq!(price, Decimal::ZERO);
    assert_eq!(price.to_string(), "0.00");
}

#[test]
fn clean_price_keeps_integer_amounts() {
    assert_eq!(clean_price(" £12 ").unwrap(), dec("12"));
}

#[test]
fn clean_price_ignores_minus_sign() {
    assert_eq!(clean_price("-£5.00").unwrap(), dec("5.00"));
}

#[test]
fn clean_price_rejects_text() {
    let err = clean_price("invalid").unwrap_err();
    assert_eq!(err.raw, "invalid");
}

#[test]
fn clean_price_rejects_empty() {
    assert!(clean_price("").is_err());
    assert!(clean_price("£").is_err());
}

#[test]
fn clean_price_rejects_multiple_decimal_points() {
    assert!(clean_price("1.2.3").is_err());
}

#[test]
fn clean_price_rejects_non_ascii_digits() {
    assert!(clean_price("£٥١").is_err());
}

// ---------------------------------------------------------------------------
// convert_price
// ---------------------------------------------------------------------------

#[test]
fn convert_price_rounds_to_two_places() {
    let rate = ExchangeRate::new(dec("1.30")).unwrap();
    assert_eq!(convert_price(dec("51.77"), rate), Some(dec("67.30")));
}

#[test]
fn convert_price_rounds_midpoint_away_from_zero() {
    let rate = ExchangeRate::new(dec("1.5")).unwrap();
    // 0.15 * 1.5 = 0.225
    assert_eq!(convert_price(dec("0.15"), rate), Some(dec("0.23")));
}

#[test]
fn convert_price_of_zero_is_zero() {
    let rate = ExchangeRate::new(dec("1.27")).unwrap();
    assert_eq!(convert_price(Decimal::ZERO, rate), Some(Decimal::ZERO));
}

#[test]
fn convert_price_overflow_is_none() {
    let rate = ExchangeRate::new(dec("10")).unwrap();
    assert_eq!(convert_price(Decimal::MAX, rate), None);
}
