//! HTTP client for the upstream scholarly-metadata API.
//!
//! # Responsibilities
//! - Perform one HTTP GET per [`EndpointRequest`]
//! - Attach the configured credential headers (API key, institution token,
//!   optional auth token)
//! - Enforce the configured request deadline
//! - Parse successful bodies as JSON
//!
//! No retries: a failed attempt is a final failure for that call.

use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::{ConfigError, UpstreamConfig};
use crate::upstream::error::UpstreamError;
use crate::upstream::request::EndpointRequest;

const API_KEY_HEADER: &str = "X-ELS-APIKey";
const INST_TOKEN_HEADER: &str = "X-ELS-Insttoken";
const AUTH_TOKEN_HEADER: &str = "X-ELS-Authtoken";

/// Stateless client for the upstream API. Cheap to clone, safe to share.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base: Url,
    config: UpstreamConfig,
}

impl UpstreamClient {
    /// Build a client from configuration. Fails on an unusable base URL,
    /// which is a startup error rather than a request error.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ConfigError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ConfigError::Invalid(format!("upstream.base_url: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "upstream.base_url `{}` cannot serve as a base URL",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("upstream HTTP client: {e}")))?;

        Ok(Self {
            http,
            base,
            config: config.clone(),
        })
    }

    /// Base URL all endpoint paths are resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Perform the call described by `request` and parse the body as JSON.
    pub async fn fetch(&self, request: &EndpointRequest) -> Result<Value, UpstreamError> {
        let endpoint = request.url().path().to_string();
        tracing::debug!(endpoint = %endpoint, "upstream fetch");

        let mut call = self
            .http
            .get(request.url().clone())
            .query(request.query_pairs());
        for (name, value) in request.headers() {
            call = call.header(name, value);
        }
        call = call.header(API_KEY_HEADER, &self.config.api_key);
        if !self.config.inst_token.is_empty() {
            call = call.header(INST_TOKEN_HEADER, &self.config.inst_token);
        }
        if let Some(token) = &self.config.auth_token {
            call = call.header(AUTH_TOKEN_HEADER, token);
        }

        let response = call
            .send()
            .await
            .map_err(|e| self.transport_error(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = %endpoint, status = %status, "upstream returned error status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                endpoint,
            });
        }

        response.json::<Value>().await.map_err(|e| {
            UpstreamError::Malformed(format!("body of {endpoint} is not JSON: {e}"))
        })
    }

    fn transport_error(&self, endpoint: &str, err: reqwest::Error) -> UpstreamError {
        if err.is_timeout() {
            UpstreamError::Timeout {
                endpoint: endpoint.to_string(),
                timeout_secs: self.config.timeout_secs,
            }
        } else if err.status().is_some() {
            // Should not occur for plain GETs, but keep the kind faithful.
            UpstreamError::Status {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                endpoint: endpoint.to_string(),
            }
        } else {
            UpstreamError::Unavailable(err.to_string())
        }
    }
}
