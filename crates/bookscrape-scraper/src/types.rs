//! Page-level and crawl-level values passed between the crawl stages.

use chrono::{DateTime, Utc};
use reqwest::Url;

/// Markup of one `article.product_pod` element, detached from its page.
///
/// Cards are owned strings rather than tree references so that pages can be
/// dropped before the next request is awaited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCard {
    pub html: String,
}

impl ListingCard {
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

/// A fetched and parsed listing page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested. Relative links on the page resolve
    /// against it.
    pub url: Url,
    pub cards: Vec<ListingCard>,
    /// Raw `href` of the pager's "next" link, if the page has one.
    pub next_href: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Fetch,
    Extraction,
    Pagination,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Fetch => write!(f, "fetch"),
            FailureKind::Extraction => write!(f, "extraction"),
            FailureKind::Pagination => write!(f, "pagination"),
        }
    }
}

/// One contained failure, kept on the crawl state for reporting.
#[derive(Debug, Clone)]
pub struct CrawlFailure {
    /// Page or category URL the failure happened on.
    pub url: String,
    pub kind: FailureKind,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

impl CrawlFailure {
    pub(crate) fn new(url: impl Into<String>, kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind,
            reason: reason.into(),
            occurred_at: Utc::now(),
        }
    }
}
