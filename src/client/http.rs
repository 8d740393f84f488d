use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

use super::{ClientError, ClientResult, HistoryClient, HistoryQuery};

pub struct HttpHistoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpHistoryClient {
    pub fn new(
        base_url: &str,
        api_token: Option<String>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::ConfigError(format!(
                "API url must start with http:// or https://, got {}",
                base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::ConfigError(format!("invalid API token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        tracing::info!("History API at {}", base_url);

        Ok(Self { client, base_url })
    }

    fn history_url(&self, query: &HistoryQuery) -> ClientResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ClientError::ConfigError(format!("invalid API url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::ConfigError("API url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend([
                "api",
                "base",
                query.identity.base_id.as_str(),
                "table",
                query.identity.table_id.as_str(),
                "record",
                query.identity.record_id.as_str(),
                "history",
            ]);
        url.query_pairs_mut()
            .append_pair("page", &query.page.to_string())
            .append_pair("pageSize", &query.page_size.to_string());
        Ok(url)
    }
}

#[async_trait]
impl HistoryClient for HttpHistoryClient {
    async fn fetch_history(&self, query: &HistoryQuery) -> ClientResult<serde_json::Value> {
        let url = self.history_url(query)?;
        tracing::debug!(page = query.page, "GET {}", url);

        let response = self.client.get(url).send().await.map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, record = %query.identity, "history request rejected");
            return Err(ClientError::RequestFailed(format!("status {}", status)));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }
}

fn http_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else if err.is_connect() {
        ClientError::ConnectionError(err.to_string())
    } else {
        ClientError::RequestFailed(err.to_string())
    }
}
