//! Search endpoint client.

use std::future::Future;

use modhub_config::ApiConfig;
use modhub_core::http::{authorize, build_client, check_response, endpoint, transport_error};
use modhub_core::{ApiError, SearchEntry};
use reqwest::StatusCode;

use crate::controller::PageRequest;

const SEARCH_PATH: &str = "/public_api/search";

/// Executes page requests.
pub trait SearchService: Send + Sync {
    fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = Result<Vec<SearchEntry>, ApiError>> + Send;
}

/// `GET /public_api/search`. A 204 is an empty page.
pub struct HttpSearchService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSearchService {
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_client(&config.client_options())?,
            base_url: config.base().to_string(),
        })
    }
}

impl SearchService for HttpSearchService {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Vec<SearchEntry>, ApiError> {
        let params = request.params();
        let pairs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let url = endpoint(&self.base_url, SEARCH_PATH, &pairs)?;
        tracing::debug!(%url, authorized = request.credential().is_some(), "search request");

        let resp = authorize(self.client.get(url), request.credential())
            .send()
            .await
            .map_err(|e| transport_error(SEARCH_PATH, &e))?;
        decode_page(check_response(resp).await?).await
    }
}

async fn decode_page(resp: reqwest::Response) -> Result<Vec<SearchEntry>, ApiError> {
    if resp.status() == StatusCode::NO_CONTENT {
        return Ok(Vec::new());
    }
    let body = resp
        .text()
        .await
        .map_err(|e| ApiError::Decode(format!("failed to read search page: {e}")))?;
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(format!("search page: {e}")))
}
