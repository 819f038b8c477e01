//! Whole-site crawl: discover categories, walk each one, collect listings.
//!
//! Categories are walked in discovery order. With
//! `max_concurrent_categories > 1` several walks run at once on the calling
//! task, but their outcomes are still merged in discovery order, so the
//! collected records (and which duplicate wins) are identical to a
//! sequential run.

use bookscrape_core::ListingRecord;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Url;

use crate::collector::Collector;
use crate::discovery::{crawl_targets, discover_categories};
use crate::error::CrawlError;
use crate::exchange_rate::ExchangeRate;
use crate::fetch::PageFetcher;
use crate::pagination::{walk_category, CategoryOutcome};
use crate::types::CrawlFailure;

#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Catalogue root. Must end in `/`.
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_categories: usize,
    pub inter_request_delay_ms: u64,
    pub include_full_catalogue: bool,
}

/// Accumulated result of one crawl run. Owned by the caller once
/// [`Crawler::run`] returns.
#[derive(Debug)]
pub struct CrawlState {
    pub started_at: DateTime<Utc>,
    pub exchange_rate: Option<ExchangeRate>,
    pub targets: Vec<Url>,
    pub failures: Vec<CrawlFailure>,
    pub pages_fetched: usize,
    collector: Collector,
}

impl CrawlState {
    fn new(exchange_rate: Option<ExchangeRate>) -> Self {
        Self {
            started_at: Utc::now(),
            exchange_rate,
            targets: Vec::new(),
            failures: Vec::new(),
            pages_fetched: 0,
            collector: Collector::new(),
        }
    }

    /// Merges one category walk into the state.
    fn absorb(&mut self, outcome: CategoryOutcome) {
        self.pages_fetched += outcome.pages_fetched;
        self.failures.extend(outcome.failures);
        for record in outcome.records {
            self.collector.accept(record);
        }
    }

    /// Collected records, unique by URL, in first-seen order.
    #[must_use]
    pub fn records(&self) -> &[ListingRecord] {
        self.collector.records()
    }

    #[must_use]
    pub fn record_count(&self) -> usize {
        self.collector.len()
    }

    #[must_use]
    pub fn duplicates_discarded(&self) -> usize {
        self.collector.duplicates()
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ListingRecord> {
        self.collector.into_records()
    }
}

pub struct Crawler {
    fetcher: PageFetcher,
    root: Url,
    settings: CrawlSettings,
}

impl Crawler {
    /// # Errors
    ///
    /// - [`CrawlError::InvalidBaseUrl`]: `base_url` is not an absolute URL.
    /// - [`CrawlError::Client`]: the HTTP client cannot be built.
    pub fn new(settings: CrawlSettings) -> Result<Self, CrawlError> {
        let root = Url::parse(&settings.base_url).map_err(|e| CrawlError::InvalidBaseUrl {
            url: settings.base_url.clone(),
            reason: e.to_string(),
        })?;
        if root.cannot_be_a_base() {
            return Err(CrawlError::InvalidBaseUrl {
                url: settings.base_url.clone(),
                reason: "URL cannot be used as a base for relative links".to_owned(),
            });
        }
        let fetcher = PageFetcher::new(settings.request_timeout_secs, &settings.user_agent)?;
        Ok(Self {
            fetcher,
            root,
            settings,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Discovers the crawl targets (sidebar categories, then the full
    /// catalogue when enabled) without walking them.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::RootFetch`] if the root page cannot be fetched.
    /// The error is not logged here; the caller reports it.
    pub async fn targets(&self) -> Result<Vec<Url>, CrawlError> {
        let categories = discover_categories(&self.fetcher, &self.root)
            .await
            .map_err(CrawlError::RootFetch)?;
        Ok(crawl_targets(
            categories,
            &self.root,
            self.settings.include_full_catalogue,
        ))
    }

    /// Crawls the whole catalogue.
    ///
    /// Failures below the root (pages, cards, prices) are contained and
    /// recorded on the returned state.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::RootFetch`] if the root page cannot be fetched.
    pub async fn run(&self, exchange_rate: Option<ExchangeRate>) -> Result<CrawlState, CrawlError> {
        let mut state = CrawlState::new(exchange_rate);
        state.targets = self.targets().await?;

        tracing::info!(
            targets = state.targets.len(),
            max_concurrent = self.settings.max_concurrent_categories.max(1),
            "starting catalogue crawl"
        );

        let delay_ms = self.settings.inter_request_delay_ms;
        let outcomes: Vec<CategoryOutcome> = stream::iter(&state.targets)
            .map(|target| walk_category(&self.fetcher, target, exchange_rate, delay_ms))
            .buffered(self.settings.max_concurrent_categories.max(1))
            .collect()
            .await;

        for outcome in outcomes {
            state.absorb(outcome);
        }

        tracing::info!(
            records = state.record_count(),
            duplicates = state.duplicates_discarded(),
            pages = state.pages_fetched,
            failures = state.failures.len(),
            "catalogue crawl finished"
        );
        Ok(state)
    }
}
