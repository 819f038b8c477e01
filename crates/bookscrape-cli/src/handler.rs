//! Invocation entry point: one event in, one status/body response out.

use anyhow::Context;
use bookscrape_core::AppConfig;
use bookscrape_scraper::{
    CrawlSettings, Crawler, ExchangeRate, ExchangeRateProvider, FALLBACK_RATE,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::Instrument;

use crate::export::{export_csv, output_file_name, PriceColumns};

const DEFAULT_SCRAPER_NAME: &str = "default_scraper";
const UNKNOWN: &str = "unknown";

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InvocationEvent {
    #[serde(default)]
    pub scraper_input: Option<ScraperInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ScraperInput {
    #[serde(default)]
    pub scraper_name: Option<String>,
    #[serde(default)]
    pub run_scraper_id: Option<String>,
}

impl InvocationEvent {
    pub(crate) fn new(scraper_name: Option<String>, run_scraper_id: Option<String>) -> Self {
        Self {
            scraper_input: Some(ScraperInput {
                scraper_name,
                run_scraper_id,
            }),
        }
    }

    fn input(&self) -> ScraperInput {
        self.scraper_input.clone().unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON document serialized to a string.
    pub body: String,
}

impl InvocationResponse {
    pub(crate) fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

struct RunSummary {
    total_books_scraped: usize,
    /// File name inside the configured output directory.
    output_file: String,
}

pub(crate) fn crawl_settings(config: &AppConfig) -> CrawlSettings {
    CrawlSettings {
        base_url: config.base_url.clone(),
        request_timeout_secs: config.request_timeout_secs,
        user_agent: config.user_agent.clone(),
        max_concurrent_categories: config.max_concurrent_categories,
        inter_request_delay_ms: config.inter_request_delay_ms,
        include_full_catalogue: config.include_full_catalogue,
    }
}

/// The rate a run converts prices with, or `None` when conversion is off.
pub(crate) async fn resolve_exchange_rate(config: &AppConfig) -> Option<ExchangeRate> {
    if !config.convert_currency {
        return None;
    }
    let provider = match ExchangeRateProvider::new(
        config.request_timeout_secs,
        &config.user_agent,
        &config.exchange_rate_url,
        &config.target_currency,
    ) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::warn!(
                error = %e,
                fallback = %FALLBACK_RATE,
                "rate client unavailable, using fallback rate"
            );
            return Some(FALLBACK_RATE);
        }
    };
    Some(provider.current_rate().await)
}

/// Runs one scrape and reports the outcome. Never returns an error: every
/// failure becomes a `500` response.
pub(crate) async fn handle_invocation(
    event: &InvocationEvent,
    config: &AppConfig,
) -> InvocationResponse {
    let input = event.input();
    let span = tracing::info_span!(
        "scrape_run",
        scraper_name = input.scraper_name.as_deref().unwrap_or(DEFAULT_SCRAPER_NAME),
        run_scraper_id = input.run_scraper_id.as_deref().unwrap_or(UNKNOWN),
    );

    async move {
        let scraper_name = input
            .scraper_name
            .clone()
            .unwrap_or_else(|| DEFAULT_SCRAPER_NAME.to_owned());
        let run_scraper_id = input
            .run_scraper_id
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_owned());

        match run_scrape(&scraper_name, &run_scraper_id, config).await {
            Ok(summary) => {
                tracing::info!(
                    total_books_scraped = summary.total_books_scraped,
                    output_file = %summary.output_file,
                    "book scraping completed"
                );
                respond(
                    200,
                    &json!({
                        "message": "Book scraping completed successfully",
                        "scraper_name": scraper_name,
                        "run_scraper_id": run_scraper_id,
                        "total_books_scraped": summary.total_books_scraped,
                        "output_file": summary.output_file,
                        "status": "success",
                    }),
                )
            }
            Err(e) => {
                let error = format!("{e:#}");
                tracing::error!(error = %error, "book scraping failed");
                respond(
                    500,
                    &json!({
                        "message": "Book scraping failed",
                        "scraper_name": input.scraper_name.as_deref().unwrap_or(UNKNOWN),
                        "run_scraper_id": input.run_scraper_id.as_deref().unwrap_or(UNKNOWN),
                        "error": error,
                        "status": "failed",
                    }),
                )
            }
        }
    }
    .instrument(span)
    .await
}

async fn run_scrape(
    scraper_name: &str,
    run_scraper_id: &str,
    config: &AppConfig,
) -> anyhow::Result<RunSummary> {
    let crawler = Crawler::new(crawl_settings(config)).context("failed to build crawler")?;
    let exchange_rate = resolve_exchange_rate(config).await;

    let state = crawler.run(exchange_rate).await?;
    let total_books_scraped = state.record_count();
    let columns = exchange_rate.map(|_| PriceColumns {
        source: config.source_currency.clone(),
        target: config.target_currency.clone(),
    });
    let file_name = output_file_name(scraper_name, run_scraper_id);
    let path = config.output_dir.join(&file_name);
    export_csv(&path, state.records(), columns.as_ref())?;

    Ok(RunSummary {
        total_books_scraped,
        output_file: file_name,
    })
}

fn respond(status_code: u16, body: &serde_json::Value) -> InvocationResponse {
    InvocationResponse {
        status_code,
        body: body.to_string(),
    }
}

#[cfg(test)]
#[path = "handler_test.rs"]
mod tests;
