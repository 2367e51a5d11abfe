//! Transport contract and the reqwest-backed implementation

use crate::diagnostics::{DiagnosticSink, RecordedExchange};
use crate::errors::HttpError;
use crate::spec::{RawResponse, RequestSpec};
use async_trait::async_trait;
use chrono::Utc;
use crudcheck_config::HttpConfig;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Executes finalized requests
///
/// Implementations must return an error (never a sentinel response) when the
/// request could not be completed, and must record every call, successful or
/// not, in their [`DiagnosticSink`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, spec: RequestSpec) -> Result<RawResponse, HttpError>;

    /// Sink this transport records into
    fn diagnostics(&self) -> &DiagnosticSink;

    fn last_request_description(&self) -> Option<String> {
        self.diagnostics().last_request_description()
    }

    fn last_response_description(&self) -> Option<String> {
        self.diagnostics().last_response_description()
    }
}

/// Transport performing real HTTP calls with a shared reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    default_headers: BTreeMap<String, String>,
    diagnostics: DiagnosticSink,
}

impl ReqwestTransport {
    /// Build a transport from configuration, with a fresh diagnostic sink
    pub fn new(config: &HttpConfig) -> Result<Self, HttpError> {
        Self::with_diagnostics(config, DiagnosticSink::new())
    }

    pub fn with_diagnostics(
        config: &HttpConfig,
        diagnostics: DiagnosticSink,
    ) -> Result<Self, HttpError> {
        debug!(
            "Creating ReqwestTransport for {} with {}s timeout",
            config.base_url,
            config.timeout.as_secs()
        );

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .redirect(reqwest::redirect::Policy::limited(
                config.max_redirects as usize,
            ))
            .build()?;

        Ok(Self {
            client,
            base_url,
            default_headers: config.default_headers.clone(),
            diagnostics,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn header_map(&self, spec: &RequestSpec) -> Result<HeaderMap, HttpError> {
        let mut header_map = HeaderMap::new();
        // Request headers are applied last so they override the defaults
        for (key, value) in self.default_headers.iter().chain(spec.headers.iter()) {
            let name = HeaderName::from_str(key)
                .map_err(|_| HttpError::InvalidHeaderName(key.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| HttpError::InvalidHeaderValue(key.to_string()))?;
            header_map.insert(name, value);
        }
        Ok(header_map)
    }

    async fn send(&self, spec: &RequestSpec, url: Url) -> Result<RawResponse, HttpError> {
        let mut request = self
            .client
            .request(reqwest::Method::from(spec.method), url)
            .headers(self.header_map(spec)?);

        if let Some(ref body) = spec.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status_code = response.status().as_u16();

        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect();

        let body_text = response.text().await?;

        Ok(RawResponse {
            status_code,
            headers,
            body_text,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, spec: RequestSpec) -> Result<RawResponse, HttpError> {
        let started_at = Utc::now();
        let clock = Instant::now();

        let resolved = spec.resolve_url(&self.base_url);
        let url = resolved.as_ref().ok().map(|u| u.to_string());
        let outcome = match resolved {
            Ok(resolved) => {
                info!("Making HTTP request: {} {}", spec.method, resolved);
                self.send(&spec, resolved).await
            }
            Err(e) => Err(e),
        };

        let duration_ms = clock.elapsed().as_millis() as u64;
        let (response, error) = match outcome {
            Ok(ref response) => {
                info!(
                    "HTTP response received: {} in {} ms",
                    response.status_code, duration_ms
                );
                (Some(response.clone()), None)
            }
            Err(ref e) => {
                warn!("HTTP request {} {} failed: {}", spec.method, spec.path, e);
                (None, Some(e.to_string()))
            }
        };

        self.diagnostics.record(RecordedExchange {
            url,
            request: spec,
            response,
            error,
            started_at,
            duration_ms,
        });

        outcome
    }

    fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }
}
