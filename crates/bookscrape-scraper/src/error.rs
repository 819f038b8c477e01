use thiserror::Error;

/// Failure to retrieve one page. Contained by the pagination walker.
#[derive(Debug, Error)]
#[error("failed to fetch {url}")]
pub struct FetchError {
    pub url: String,
    #[source]
    pub cause: FetchCause,
}

#[derive(Debug, Error)]
pub enum FetchCause {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),
}

/// A listing card that is missing a required element.
///
/// Carries the card's markup so the failure can be diagnosed from the log.
#[derive(Debug, Error)]
#[error("listing card could not be extracted: {reason}")]
pub struct ExtractionError {
    pub reason: String,
    pub raw_card: String,
}

/// Price text that does not contain a parseable decimal.
#[derive(Debug, Error)]
#[error("could not parse price from \"{raw}\"")]
pub struct PriceParseError {
    pub raw: String,
}

/// Exchange rate lookup failure. Always replaced by the fallback rate.
#[derive(Debug, Error)]
pub enum RateFetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate for {currency} missing from response")]
    MissingRate { currency: String },

    #[error("rate for {currency} is not a positive decimal: {value}")]
    InvalidRate { currency: String, value: String },
}

/// Errors that end a crawl without output.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("HTTP client could not be built")]
    Client(#[from] reqwest::Error),

    #[error("invalid catalogue URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("catalogue root unreachable")]
    RootFetch(#[source] FetchError),
}
