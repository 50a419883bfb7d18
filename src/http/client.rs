use std::time::{Duration, Instant};

use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::environment::{ProbeConfig, Variables};
use crate::error::{ProbeError, Result};

use super::request::RequestSpec;
use super::response::ProbeResponse;

/// Path prefix every GhostChart route lives under.
const API_PREFIX: &str = "api";

/// Thin JSON client bound to one `<base>/api` root.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(ProbeError::Transport)?;

        Ok(Self {
            client,
            api_url: format!("{}/{API_PREFIX}", config.base_url.trim_end_matches('/')),
            timeout: config.timeout,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Full URL for `request`, with placeholders resolved and query
    /// parameters appended.
    pub fn url_for(&self, request: &RequestSpec, vars: &Variables) -> Result<Url> {
        let endpoint = vars.interpolate(&request.endpoint);
        let raw = if endpoint.is_empty() {
            format!("{}/", self.api_url)
        } else {
            format!("{}/{}", self.api_url, endpoint.trim_start_matches('/'))
        };

        let mut url = Url::parse(&raw).map_err(|e| ProbeError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        if !request.params.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &request.params {
                query_pairs.append_pair(key, &vars.interpolate(value));
            }
        }

        Ok(url)
    }

    pub async fn send(&self, request: &RequestSpec, url: Url) -> Result<ProbeResponse> {
        let mut req_builder = self.client.request(request.method.into(), url);
        if request.method.carries_body() {
            if let Some(body) = &request.body {
                req_builder = req_builder.json(body);
            }
        }

        let started = Instant::now();
        let response = req_builder
            .send()
            .await
            .map_err(|e| ProbeError::from_send(e, self.timeout))?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(ProbeError::ReadBody)?;
        let duration_ms = started.elapsed().as_millis();

        Ok(ProbeResponse {
            status,
            duration_ms,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

pub fn default_timeout() -> Duration {
    Duration::from_secs(10)
}
