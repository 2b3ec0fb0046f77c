// =============================================================================
// Feed REST client
// =============================================================================
//
// One HTTP client against a configurable upstream that serves OHLCV history
// as JSON rows. The upstream endpoints are public (no signing, no token),
// so the client carries nothing but a base URL and a request timeout.
//
// `period` and `interval` use the upstream's own vocabulary (e.g. "1mo",
// "1y", "1d") and are passed through untouched; the core never interprets
// them.
// =============================================================================

use tracing::{debug, instrument};

use crate::error::FeedError;
use crate::series::RawPricePoint;

/// Default request timeout for upstream calls.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// REST client for the market-data upstream.
#[derive(Clone)]
pub struct FeedClient {
    base_url: String,
    client: reqwest::Client,
}

impl FeedClient {
    /// Create a new client for the given upstream base URL (no trailing
    /// slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("failed to build reqwest client");

        debug!(base_url = %base_url, "FeedClient initialised");

        Self { base_url, client }
    }

    /// Fetch the raw OHLCV history for `symbol`.
    ///
    /// The returned rows may be unordered, contain duplicate dates, or carry
    /// missing fields; callers are expected to pass them through
    /// `Series::normalize`.
    ///
    /// # Errors
    /// - `UnknownSymbol` when the upstream answers 404.
    /// - `Upstream` for any other non-success status.
    /// - `Transport` for connection, timeout, or decode failures.
    #[instrument(skip(self), name = "feed::fetch_series")]
    pub async fn fetch_series(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<RawPricePoint>, FeedError> {
        let resp = self.history_request(symbol, period, interval).send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FeedError::UnknownSymbol(symbol.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FeedError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<RawPricePoint> = resp.json().await?;
        debug!(symbol, rows = rows.len(), "fetched raw series");
        Ok(rows)
    }

    /// Build the history request. Query parameters go through reqwest's
    /// encoder so symbols containing reserved characters cannot corrupt the
    /// query string.
    fn history_request(&self, symbol: &str, period: &str, interval: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/history", self.base_url))
            .query(&[("symbol", symbol), ("period", period), ("interval", interval)])
    }
}
