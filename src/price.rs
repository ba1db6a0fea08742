use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// A successfully retrieved spot price for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub symbol: String,
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Non-2xx response from the price API.
    Status(u16),
    /// The shared tick deadline elapsed before a response arrived.
    Timeout,
    /// Transport-level failure (connect, DNS, body read).
    Network,
    /// 2xx response whose body could not be parsed.
    Malformed,
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchErrorKind::Status(code) => write!(f, "status {code}"),
            FetchErrorKind::Timeout => write!(f, "timeout"),
            FetchErrorKind::Network => write!(f, "network"),
            FetchErrorKind::Malformed => write!(f, "malformed"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchError {
    pub symbol: String,
    pub kind: FetchErrorKind,
    pub message: String,
}

/// Per-symbol result of one fetch. Failures are values, never propagated
/// errors, so one symbol's outcome cannot abort another's.
pub type FetchOutcome = Result<Quote, FetchError>;

#[async_trait]
pub trait SpotPriceClient: Send + Sync {
    async fn fetch_spot(&self, symbol: &str, deadline: Instant) -> FetchOutcome;
}

/// Coinbase-style spot price client: `GET {base_url}/v2/prices/{SYM}-{QUOTE}/spot`
/// with the required `CB-VERSION` header.
pub struct CoinbaseClient {
    base_url: String,
    api_version: String,
    quote_currency: String,
    client: reqwest::Client,
}

impl CoinbaseClient {
    pub fn new(base_url: &str, api_version: &str, quote_currency: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("cointile/0.1")
            .build()?;
        Ok(CoinbaseClient {
            base_url: base_url.to_string(),
            api_version: api_version.to_string(),
            quote_currency: quote_currency.to_string(),
            client,
        })
    }

    async fn request_spot(&self, symbol: &str) -> FetchOutcome {
        let url = format!(
            "{}/v2/prices/{}-{}/spot",
            self.base_url, symbol, self.quote_currency
        );
        debug!("Requesting spot price from {}", url);

        let response = self
            .client
            .get(&url)
            .header("CB-VERSION", &self.api_version)
            .send()
            .await
            .map_err(|e| FetchError {
                symbol: symbol.to_string(),
                kind: FetchErrorKind::Network,
                message: format!("Request error: {e} for URL: {url}"),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| FetchError {
            symbol: symbol.to_string(),
            kind: FetchErrorKind::Network,
            message: format!("Failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(FetchError {
                symbol: symbol.to_string(),
                kind: FetchErrorKind::Status(status.as_u16()),
                message: format!("HTTP error: {status}, response body: {body}"),
            });
        }

        let parsed: SpotResponse = serde_json::from_str(&body).map_err(|e| FetchError {
            symbol: symbol.to_string(),
            kind: FetchErrorKind::Malformed,
            message: format!("Failed to parse spot response: {e}. Response: '{body}'"),
        })?;

        Ok(Quote {
            symbol: symbol.to_string(),
            amount: parsed.data.amount,
            currency: parsed.data.currency,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SpotResponse {
    data: SpotData,
}

#[derive(Debug, Deserialize)]
struct SpotData {
    amount: Decimal,
    currency: String,
}

#[async_trait]
impl SpotPriceClient for CoinbaseClient {
    #[instrument(name = "SpotFetch", skip(self, deadline), fields(symbol = %symbol))]
    async fn fetch_spot(&self, symbol: &str, deadline: Instant) -> FetchOutcome {
        // timeout_at drops the in-flight request once the shared deadline
        // elapses; the fetch must not outlive the tick's time budget.
        match tokio::time::timeout_at(deadline, self.request_spot(symbol)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError {
                symbol: symbol.to_string(),
                kind: FetchErrorKind::Timeout,
                message: "Fetch abandoned: tick deadline elapsed".to_string(),
            }),
        }
    }
}
