//! Per-category page walking.
//!
//! A category is walked from its entry page by following the pager's
//! `li.next > a` link. Pager links are page-relative (`page-2.html`), so each
//! one is resolved against the page it was found on, never against the
//! category root.
//!
//! ## Failure containment
//!
//! - A page that cannot be fetched ends the walk for this category only.
//!   Records from earlier pages are kept.
//! - A card that cannot be extracted is skipped; the rest of the page is
//!   still processed.
//!
//! Each contained failure produces one log event and one [`CrawlFailure`].

use std::collections::HashSet;
use std::time::Duration;

use bookscrape_core::ListingRecord;
use reqwest::Url;

use crate::exchange_rate::ExchangeRate;
use crate::extract::{canonical_url, extract_record};
use crate::fetch::PageFetcher;
use crate::types::{CrawlFailure, FailureKind};

/// Upper bound on pages walked per category. Guards against pagers that
/// never terminate; the real site has at most 50 pages per listing.
pub const MAX_PAGES_PER_CATEGORY: usize = 200;

/// Everything one category walk produced, in page order.
#[derive(Debug)]
pub struct CategoryOutcome {
    pub entry_url: Url,
    pub records: Vec<ListingRecord>,
    pub failures: Vec<CrawlFailure>,
    pub pages_fetched: usize,
}

/// Walks one category from `entry_url` until the last page or the first
/// fetch failure.
///
/// `inter_request_delay_ms` is slept before every page request except the
/// first.
pub async fn walk_category(
    fetcher: &PageFetcher,
    entry_url: &Url,
    rate: Option<ExchangeRate>,
    inter_request_delay_ms: u64,
) -> CategoryOutcome {
    let mut outcome = CategoryOutcome {
        entry_url: entry_url.clone(),
        records: Vec::new(),
        failures: Vec::new(),
        pages_fetched: 0,
    };
    let mut visited: HashSet<Url> = HashSet::new();
    let mut current = entry_url.clone();

    loop {
        if outcome.pages_fetched >= MAX_PAGES_PER_CATEGORY {
            tracing::warn!(
                category = %entry_url,
                url = %current,
                max_pages = MAX_PAGES_PER_CATEGORY,
                "page limit reached, abandoning category"
            );
            outcome.failures.push(CrawlFailure::new(
                current.as_str(),
                FailureKind::Pagination,
                format!("exceeded {MAX_PAGES_PER_CATEGORY} pages"),
            ));
            break;
        }

        if outcome.pages_fetched > 0 && inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(inter_request_delay_ms)).await;
        }
        visited.insert(current.clone());

        let page = match fetcher.fetch_page(&current).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(
                    category = %entry_url,
                    url = %e.url,
                    error = %e.cause,
                    "page fetch failed, abandoning remaining pages in category"
                );
                outcome.failures.push(CrawlFailure::new(
                    e.url,
                    FailureKind::Fetch,
                    e.cause.to_string(),
                ));
                break;
            }
        };
        outcome.pages_fetched += 1;

        for card in &page.cards {
            match extract_record(card, &page.url, rate) {
                Ok(record) => outcome.records.push(record),
                Err(e) => {
                    tracing::warn!(
                        url = %page.url,
                        reason = %e.reason,
                        card = %e.raw_card,
                        "skipping listing card"
                    );
                    outcome.failures.push(CrawlFailure::new(
                        page.url.as_str(),
                        FailureKind::Extraction,
                        e.reason,
                    ));
                }
            }
        }

        let Some(href) = page.next_href else {
            break;
        };
        match next_page_url(&page.url, &href) {
            Some(next) if visited.contains(&next) => {
                tracing::warn!(
                    url = %page.url,
                    next = %next,
                    "pager links back to a visited page, stopping category"
                );
                outcome.failures.push(CrawlFailure::new(
                    page.url.as_str(),
                    FailureKind::Pagination,
                    format!("next link {next} was already visited"),
                ));
                break;
            }
            Some(next) => current = next,
            None => {
                tracing::warn!(
                    url = %page.url,
                    href = %href,
                    "next link does not resolve, stopping category"
                );
                outcome.failures.push(CrawlFailure::new(
                    page.url.as_str(),
                    FailureKind::Pagination,
                    format!("unresolvable next link \"{href}\""),
                ));
                break;
            }
        }
    }

    tracing::debug!(
        category = %entry_url,
        pages = outcome.pages_fetched,
        records = outcome.records.len(),
        failures = outcome.failures.len(),
        "category walk finished"
    );
    outcome
}

/// Resolves a pager `href` against the directory of `current`.
///
/// Returns `None` for hrefs that do not resolve to an http(s) URL.
#[must_use]
pub fn next_page_url(current: &Url, href: &str) -> Option<Url> {
    canonical_url(current, href)
}
