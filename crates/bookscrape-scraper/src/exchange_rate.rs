//! Best-effort currency rate lookup.
//!
//! The rate is fetched once per run from an unauthenticated JSON endpoint
//! shaped like `{"base": "GBP", "rates": {"USD": 1.27, ...}}`. Any failure
//! falls back to [`FALLBACK_RATE`]; a run never fails because of the rate.

use std::str::FromStr;
use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::RateFetchError;

/// Rate used when the lookup fails: 1.30 target units per source unit.
pub const FALLBACK_RATE: ExchangeRate = ExchangeRate(Decimal::from_parts(130, 0, 0, false, 2));

/// A positive multiplier converting source-currency amounts to the target
/// currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    /// Returns `None` unless `value` is strictly positive.
    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        (value > Decimal::ZERO).then_some(Self(value))
    }

    #[must_use]
    pub fn value(self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

pub struct ExchangeRateProvider {
    client: Client,
    endpoint: String,
    target_currency: String,
}

impl ExchangeRateProvider {
    /// # Errors
    ///
    /// Returns [`RateFetchError::Http`] if the HTTP client cannot be built.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        endpoint: &str,
        target_currency: &str,
    ) -> Result<Self, RateFetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_owned(),
            target_currency: target_currency.to_ascii_uppercase(),
        })
    }

    /// Returns the live rate, or [`FALLBACK_RATE`] if the lookup fails for
    /// any reason.
    pub async fn current_rate(&self) -> ExchangeRate {
        match self.fetch_rate().await {
            Ok(rate) => {
                tracing::info!(
                    target_currency = %self.target_currency,
                    %rate,
                    "fetched exchange rate"
                );
                rate
            }
            Err(e) => {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    error = %e,
                    fallback = %FALLBACK_RATE,
                    "exchange rate lookup failed, using fallback rate"
                );
                FALLBACK_RATE
            }
        }
    }

    /// Fetches the rate for the configured target currency.
    ///
    /// # Errors
    ///
    /// - [`RateFetchError::Http`]: network or TLS failure.
    /// - [`RateFetchError::UnexpectedStatus`]: any non-2xx status.
    /// - [`RateFetchError::Deserialize`]: body is not JSON.
    /// - [`RateFetchError::MissingRate`]: no `rates.<TARGET>` entry.
    /// - [`RateFetchError::InvalidRate`]: the entry is not a positive decimal.
    pub async fn fetch_rate(&self) -> Result<ExchangeRate, RateFetchError> {
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RateFetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let body = response.text().await?;
        let parsed: Value =
            serde_json::from_str(&body).map_err(|e| RateFetchError::Deserialize {
                context: format!("exchange rates from {}", self.endpoint),
                source: e,
            })?;

        parse_rate(&parsed, &self.target_currency)
    }
}

/// Reads `rates.<currency>` from a rate-lookup response. Accepts JSON
/// numbers and numeric strings.
fn parse_rate(body: &Value, currency: &str) -> Result<ExchangeRate, RateFetchError> {
    let raw = body
        .get("rates")
        .and_then(|rates| rates.get(currency))
        .ok_or_else(|| RateFetchError::MissingRate {
            currency: currency.to_owned(),
        })?;

    let text = match raw {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_owned(),
        other => other.to_string(),
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
        .and_then(ExchangeRate::new)
        .ok_or_else(|| RateFetchError::InvalidRate {
            currency: currency.to_owned(),
            value: text,
        })
}
