use std::path::PathBuf;

/// Runtime settings for one scrape run, resolved from `BOOKSCRAPE_*`
/// environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Diagnostic log destination. `None` logs to stderr.
    pub log_file: Option<PathBuf>,
    /// Catalogue root, always ending in `/` so relative links resolve under it.
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Number of categories walked at once. `1` is fully sequential.
    pub max_concurrent_categories: usize,
    /// Pause between page requests inside a category.
    pub inter_request_delay_ms: u64,
    /// Also walk the full catalogue listing after the sidebar categories.
    pub include_full_catalogue: bool,
    pub convert_currency: bool,
    pub exchange_rate_url: String,
    pub source_currency: String,
    pub target_currency: String,
    pub output_dir: PathBuf,
}
