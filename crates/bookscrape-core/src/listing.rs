use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One catalogue listing, flattened for export.
///
/// `url` is the canonical identity of a listing: two records with the same
/// `url` describe the same product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub title: String,
    /// Price in the site's currency. `0` when the price could not be read.
    pub price_source: Decimal,
    /// Price in the target currency, rounded to 2 dp. Only set when
    /// conversion is enabled for the run.
    pub price_converted: Option<Decimal>,
    /// Star rating 1–5, or `0` when the rating is absent or unrecognized.
    pub rating: u8,
    /// Stock status text as shown by the site, e.g. `"In stock"`.
    pub availability: String,
    /// Absolute product page URL.
    pub url: String,
}

impl ListingRecord {
    /// Returns `true` when every text field is non-empty and, if
    /// `expect_converted` is set, a converted price is present.
    #[must_use]
    pub fn is_complete(&self, expect_converted: bool) -> bool {
        !self.title.trim().is_empty()
            && !self.availability.trim().is_empty()
            && !self.url.trim().is_empty()
            && (!expect_converted || self.price_converted.is_some())
    }
}

/// Maps the site's star-rating class token (`"One"`..`"Five"`) to 1–5.
///
/// Any other token maps to `0`.
#[must_use]
pub fn rating_from_token(token: &str) -> u8 {
    match token {
        "One" => 1,
        "Two" => 2,
        "Three" => 3,
        "Four" => 4,
        "Five" => 5,
        _ => 0,
    }
}
