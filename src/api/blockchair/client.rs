use reqwest::Client as HttpClient;
use super::models::{FetchError, TransactionBatch};
use crate::config::Config;
use tracing::{debug, info, warn};

/// Read-only client for the Blockchair block explorer
pub struct BlockchairClient {
    http_client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl BlockchairClient {
    const DEFAULT_BASE_URL: &'static str = "https://api.blockchair.com";

    /// Create a new client against the public Blockchair API
    pub fn new() -> Self {
        Self::with_base_url(Self::DEFAULT_BASE_URL.to_string())
    }

    /// Create a new client with custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = match &config.blockchair_base_url {
            Some(url) => Self::with_base_url(url.clone()),
            None => Self::new(),
        };
        client.with_api_key(config.blockchair_api_key.clone())
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// GET /bitcoin/transactions?q=time(YYYY-MM-DD)
    fn transactions_url(&self, date: &str) -> String {
        let mut url = format!("{}/bitcoin/transactions?q=time({})", self.base_url, date);
        if let Some(key) = &self.api_key {
            url.push_str("&key=");
            url.push_str(key);
        }
        url
    }

    /// Map a non-2xx response onto a failure class
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> FetchError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        match status_code {
            429 => FetchError::RateLimited(body_text),
            500..=599 => FetchError::ServerError(status_code, body_text),
            _ => FetchError::HttpError(status_code, body_text),
        }
    }

    /// Fetch all transactions the explorer reports for `date`.
    ///
    /// One request, no retry, no timeout override. `date` is expected to be a
    /// validated `YYYY-MM-DD` string.
    ///
    /// # Returns
    /// * `Ok(TransactionBatch)` - Parsed response body
    /// * `Err(FetchError)` - Which way the request failed
    pub async fn try_fetch_transactions(&self, date: &str) -> Result<TransactionBatch, FetchError> {
        let url = self.transactions_url(date);
        debug!("GET {}", url);

        let response = self.http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let batch = response
            .json::<TransactionBatch>()
            .await
            .map_err(|e| FetchError::DeserializationError(format!("Failed to parse response: {}", e)))?;

        match &batch.data {
            Some(txs) => info!("Fetched {} transactions for {}", txs.len(), date),
            None => warn!("Response for {} has no data field", date),
        }
        Ok(batch)
    }

    /// Same request as [`try_fetch_transactions`](Self::try_fetch_transactions),
    /// with every failure collapsed to `None` after logging it.
    pub async fn fetch_transactions(&self, date: &str) -> Option<TransactionBatch> {
        match self.try_fetch_transactions(date).await {
            Ok(batch) => Some(batch),
            Err(e) => {
                warn!("Blockchair fetch for {} failed: {}", date, e);
                None
            }
        }
    }
}

impl Default for BlockchairClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::test_support::serve_once;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_fetch_parses_transactions_in_order() {
        let body = r#"{"data": [{"hash": "a1", "time": 1274522400, "fee": 0},
                                {"hash": "b2", "time": "2010-05-22 18:16:31"}],
                       "context": {"code": 200}}"#;
        let (base_url, server) = serve_once("200 OK", body).await;
        let client = BlockchairClient::with_base_url(base_url);

        let batch = client.fetch_transactions("2010-05-22").await.expect("batch");
        let txs = batch.data.expect("data");
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].hash(), "a1");
        assert_eq!(txs[1].hash(), "b2");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /bitcoin/transactions?q=time(2010-05-22) HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_api_key_is_appended() {
        let (base_url, server) = serve_once("200 OK", r#"{"data": []}"#).await;
        let client = BlockchairClient::with_base_url(base_url).with_api_key(Some("secret".to_string()));

        let batch = client.fetch_transactions("2011-01-01").await.expect("batch");
        assert_eq!(batch.data.map(|d| d.len()), Some(0));

        let request = server.await.unwrap();
        assert!(request.contains("q=time(2011-01-01)&key=secret"));
    }

    #[tokio::test]
    async fn test_rate_limited_collapses_to_none() {
        let (base_url, _server) = serve_once("429 Too Many Requests", r#"{"error": "slow down"}"#).await;
        let client = BlockchairClient::with_base_url(base_url);
        assert!(client.fetch_transactions("2010-05-22").await.is_none());
    }

    #[tokio::test]
    async fn test_rate_limited_is_classified() {
        let (base_url, _server) = serve_once("429 Too Many Requests", "slow down").await;
        let client = BlockchairClient::with_base_url(base_url);
        match client.try_fetch_transactions("2010-05-22").await {
            Err(FetchError::RateLimited(body)) => assert_eq!(body, "slow down"),
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_classified() {
        let (base_url, _server) = serve_once("503 Service Unavailable", "down").await;
        let client = BlockchairClient::with_base_url(base_url);
        assert!(matches!(
            client.try_fetch_transactions("2010-05-22").await,
            Err(FetchError::ServerError(503, _))
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_classified() {
        let (base_url, _server) = serve_once("200 OK", "<html>oops</html>").await;
        let client = BlockchairClient::with_base_url(base_url);
        assert!(matches!(
            client.try_fetch_transactions("2010-05-22").await,
            Err(FetchError::DeserializationError(_))
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_collapses_to_none() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = BlockchairClient::with_base_url(format!("http://{}", addr));
        assert!(matches!(
            client.try_fetch_transactions("2010-05-22").await,
            Err(FetchError::RequestError(_))
        ));
        assert!(client.fetch_transactions("2010-05-22").await.is_none());
    }
}
