pub mod collector;
pub mod crawl;
pub mod discovery;
pub mod error;
pub mod exchange_rate;
pub mod extract;
pub mod fetch;
pub mod pagination;
pub mod price;
pub mod types;

pub use collector::Collector;
pub use crawl::{CrawlSettings, CrawlState, Crawler};
pub use error::{
    CrawlError, ExtractionError, FetchCause, FetchError, PriceParseError, RateFetchError,
};
pub use exchange_rate::{ExchangeRate, ExchangeRateProvider, FALLBACK_RATE};
pub use extract::extract_record;
pub use fetch::PageFetcher;
pub use pagination::{walk_category, CategoryOutcome};
pub use price::{clean_price, convert_price};
pub use types::{CrawlFailure, FailureKind, FetchedPage, ListingCard};
