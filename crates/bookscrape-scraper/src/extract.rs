//! Listing card → [`ListingRecord`] extraction.
//!
//! ## Card markup
//!
//! ```html
//! <article class="product_pod">
//!   <p class="star-rating Three"></p>
//!   <h3><a href="../../../a-light-in-the-attic_1000/index.html"
//!          title="A Light in the Attic">A Light in the ...</a></h3>
//!   <div class="product_price">
//!     <p class="price_color">£51.77</p>
//!     <p class="instock availability"><i class="icon-ok"></i> In stock</p>
//!   </div>
//! </article>
//! ```
//!
//! The link text is truncated by the site, so the `title` attribute is
//! preferred. `href` is relative to the page the card appeared on.

use std::sync::LazyLock;

use bookscrape_core::{rating_from_token, ListingRecord};
use reqwest::Url;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractionError;
use crate::exchange_rate::ExchangeRate;
use crate::price::{clean_price, convert_price};
use crate::types::ListingCard;

static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("h3 a"));
static PRICE_CONTAINER: LazyLock<Selector> = LazyLock::new(|| selector("div.product_price"));
static PRICE_TEXT: LazyLock<Selector> = LazyLock::new(|| selector("p.price_color"));
static AVAILABILITY: LazyLock<Selector> = LazyLock::new(|| selector("p.availability"));
static STAR_RATING: LazyLock<Selector> = LazyLock::new(|| selector("p.star-rating"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid card selector")
}

/// Extracts one listing card.
///
/// A missing or unparseable price does not fail the card: the price becomes
/// `0` and a warning is logged. An unrecognized rating becomes `0`.
///
/// # Errors
///
/// Returns [`ExtractionError`] if the title link, its `href`, the price
/// container, or the availability block is missing, or if the `href` cannot
/// be resolved against `page_url`.
pub fn extract_record(
    card: &ListingCard,
    page_url: &Url,
    rate: Option<ExchangeRate>,
) -> Result<ListingRecord, ExtractionError> {
    let fragment = Html::parse_fragment(&card.html);
    let fail = |reason: &str| ExtractionError {
        reason: reason.to_owned(),
        raw_card: card.html.clone(),
    };

    let link = fragment
        .select(&TITLE_LINK)
        .next()
        .ok_or_else(|| fail("missing title link"))?;

    let title = link
        .value()
        .attr("title")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(|| element_text(link), str::to_owned);
    if title.is_empty() {
        return Err(fail("empty title"));
    }

    let href = link
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| fail("title link has no href"))?;
    let url = canonical_url(page_url, href)
        .map(String::from)
        .ok_or_else(|| fail(&format!("href \"{href}\" does not resolve against {page_url}")))?;

    let price_block = fragment
        .select(&PRICE_CONTAINER)
        .next()
        .ok_or_else(|| fail("missing price container"))?;

    let availability = price_block
        .select(&AVAILABILITY)
        .next()
        .map(element_text)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| fail("missing availability"))?;

    let price_source = read_price(price_block, &url);
    let price_converted = rate.and_then(|r| convert_price(price_source, r));

    let rating = fragment
        .select(&STAR_RATING)
        .next()
        .and_then(|p| p.value().classes().find(|c| *c != "star-rating"))
        .map_or(0, rating_from_token);

    Ok(ListingRecord {
        title,
        price_source,
        price_converted,
        rating,
        availability,
        url,
    })
}

fn read_price(price_block: ElementRef<'_>, url: &str) -> Decimal {
    let Some(element) = price_block.select(&PRICE_TEXT).next() else {
        tracing::warn!(url, "listing has no price element, recording price as 0");
        return Decimal::ZERO;
    };
    let raw = element_text(element);
    match clean_price(&raw) {
        Ok(price) => price,
        Err(e) => {
            tracing::warn!(url, error = %e, "recording price as 0");
            Decimal::ZERO
        }
    }
}

/// Resolves `href` against `base` and drops any `#fragment`.
///
/// Returns `None` when the result is not an http(s) URL. Every link the
/// crawler follows or records goes through here.
pub(crate) fn canonical_url(base: &Url, href: &str) -> Option<Url> {
    let mut url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

/// Concatenated descendant text with runs of whitespace collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
