use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a pure
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_flag = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        parse_bool(&raw).ok_or_else(|| invalid(var, format!("expected a boolean, got \"{raw}\"")))
    };

    let currency = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default).trim().to_ascii_uppercase();
        if raw.len() == 3 && raw.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(raw)
        } else {
            Err(invalid(var, format!("expected a 3-letter currency code, got \"{raw}\"")))
        }
    };

    let log_level = or_default("BOOKSCRAPE_LOG_LEVEL", "info");
    let log_file = lookup("BOOKSCRAPE_LOG_FILE")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from);

    let base_url = normalize_base_url(&or_default(
        "BOOKSCRAPE_BASE_URL",
        "http://books.toscrape.com/",
    ))
    .map_err(|reason| invalid("BOOKSCRAPE_BASE_URL", reason))?;

    let request_timeout_secs = parse_u64("BOOKSCRAPE_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "BOOKSCRAPE_REQUEST_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }
    let user_agent = or_default("BOOKSCRAPE_USER_AGENT", "bookscrape/0.1 (catalogue-crawler)");
    let max_concurrent_categories = parse_usize("BOOKSCRAPE_MAX_CONCURRENT_CATEGORIES", "1")?;
    let inter_request_delay_ms = parse_u64("BOOKSCRAPE_INTER_REQUEST_DELAY_MS", "0")?;
    let include_full_catalogue = parse_flag("BOOKSCRAPE_INCLUDE_FULL_CATALOGUE", "true")?;

    let convert_currency = parse_flag("BOOKSCRAPE_CONVERT_CURRENCY", "true")?;
    let exchange_rate_url = or_default(
        "BOOKSCRAPE_EXCHANGE_RATE_URL",
        "https://api.exchangerate-api.com/v4/latest/GBP",
    );
    let source_currency = currency("BOOKSCRAPE_SOURCE_CURRENCY", "GBP")?;
    let target_currency = currency("BOOKSCRAPE_TARGET_CURRENCY", "USD")?;

    let output_dir = PathBuf::from(or_default("BOOKSCRAPE_OUTPUT_DIR", "."));

    Ok(AppConfig {
        log_level,
        log_file,
        base_url,
        request_timeout_secs,
        user_agent,
        max_concurrent_categories,
        inter_request_delay_ms,
        include_full_catalogue,
        convert_currency,
        exchange_rate_url,
        source_currency,
        target_currency,
        output_dir,
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Requires an http(s) scheme and a host, and appends a trailing `/` so the
/// root behaves as a directory when relative links are resolved against it.
fn normalize_base_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| format!("\"{trimmed}\" must start with http:// or https://"))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(format!("\"{trimmed}\" has no host"));
    }
    if trimmed.ends_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/"))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
