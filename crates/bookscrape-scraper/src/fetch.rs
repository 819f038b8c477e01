//! Single-request page fetching for catalogue pages.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::{Client, Url};
use scraper::{Html, Selector};

use crate::error::{CrawlError, FetchCause, FetchError};
use crate::types::{FetchedPage, ListingCard};

static LISTING_CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article.product_pod").expect("valid card selector"));
static NEXT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.next > a[href]").expect("valid pager selector"));

/// HTTP client for catalogue pages.
///
/// Issues exactly one GET per call. Non-2xx statuses and transport failures
/// are returned as [`FetchError`]; nothing is retried. Redirects follow the
/// transport's default policy.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Creates a `PageFetcher` with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches a listing page and returns its cards and "next" link.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure, a non-2xx status, or an
    /// unreadable body.
    pub async fn fetch_page(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let body = self.fetch_html(url).await?;
        Ok(parse_listing_page(&body, url.clone()))
    }

    /// Fetches a page and returns its body unparsed.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure, a non-2xx status, or an
    /// unreadable body.
    pub async fn fetch_html(&self, url: &Url) -> Result<String, FetchError> {
        let fail = |cause: FetchCause| FetchError {
            url: url.to_string(),
            cause,
        };

        let response = self
            .client
            .get(url.clone())
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| fail(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(FetchCause::UnexpectedStatus(status.as_u16())));
        }

        response.text().await.map_err(|e| fail(e.into()))
    }
}

/// Parses a listing page body into owned cards and the pager's "next" href.
///
/// The markup tree does not outlive this call.
#[must_use]
pub fn parse_listing_page(body: &str, url: Url) -> FetchedPage {
    let document = Html::parse_document(body);

    let cards = document
        .select(&LISTING_CARD)
        .map(|card| ListingCard::new(card.html()))
        .collect();

    let next_href = document
        .select(&NEXT_LINK)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_owned);

    FetchedPage {
        url,
        cards,
        next_href,
    }
}
