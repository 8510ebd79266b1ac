//! TruVerifi HTTP client.

use backon::Retryable;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::fmt::Formatter;
use url::Url;

use super::types::{ChangeServiceRequest, ChangeServiceResponse, LineResponse};
use crate::errors::ProviderError;
use crate::utils::retry::RetryConfig;

#[cfg(feature = "tracing")]
use tracing::debug;

pub(crate) const PROVIDER: &str = "truverifi";

/// Default TruVerifi API URL.
pub const DEFAULT_API_URL: &str = "https://app.truverifi.com/api/";

/// TruVerifi HTTP client.
///
/// The vendor rate-limits aggressively; 429 responses are retried on a
/// fixed delay, bounded by the configured [`RetryConfig`].
#[derive(Clone)]
pub struct TruVerifi {
    http_client: ClientWithMiddleware,
    api_key: SecretString,
    endpoint: Url,
    retry_config: RetryConfig,
}

impl std::fmt::Debug for TruVerifi {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TruVerifi")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

impl TruVerifi {
    /// Create a new client against a custom endpoint.
    pub fn new(endpoint: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let endpoint = Url::parse(endpoint.as_ref()).map_err(|e| ProviderError::Request {
            provider: PROVIDER,
            message: e.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::Request {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        Ok(Self {
            http_client: ClientBuilder::new(client).build(),
            api_key: SecretString::from(api_key.into()),
            endpoint,
            retry_config: RetryConfig::default(),
        })
    }

    /// Create a new client with the default API URL.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::new(DEFAULT_API_URL, api_key)
    }

    /// Swap in a custom HTTP client with middleware.
    pub fn with_http_client(mut self, client: ClientWithMiddleware) -> Self {
        self.http_client = client;
        self
    }

    /// Override the rate-limit retry policy.
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    fn join(&self, path: &str) -> Result<Url, ProviderError> {
        self.endpoint.join(path).map_err(|e| ProviderError::Request {
            provider: PROVIDER,
            message: e.to_string(),
        })
    }

    fn apply_headers(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("content-type", "application/json")
            .header("x-api-key", self.api_key.expose_secret())
    }

    /// Send a request, retrying rate-limited attempts on a fixed delay.
    async fn send_with_retry<T, F>(&self, make_request: F) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let attempt = || async {
            let response =
                make_request()
                    .send()
                    .await
                    .map_err(|source| ProviderError::Http {
                        provider: PROVIDER,
                        source,
                    })?;

            let status = response.status();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(ProviderError::RateLimited { provider: PROVIDER });
            }
            if status.as_u16() > 299 {
                if status == reqwest::StatusCode::UNAUTHORIZED {
                    return Err(ProviderError::Unauthorized);
                }
                return Err(ProviderError::Vendor {
                    provider: PROVIDER,
                    message: format!(
                        "{} {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("")
                    ),
                });
            }

            let text = response.text().await.map_err(|source| ProviderError::Http {
                provider: PROVIDER,
                source: source.into(),
            })?;

            serde_json::from_str(&text).map_err(|source| ProviderError::Decode {
                provider: PROVIDER,
                source,
            })
        };

        attempt
            .retry(self.retry_config.build_strategy())
            .when(|err: &ProviderError| matches!(err, ProviderError::RateLimited { .. }))
            .notify(|_err, _duration| {
                #[cfg(feature = "tracing")]
                debug!(
                    retry_after_secs = %_duration.as_secs_f64(),
                    "rate limited, retrying"
                );
            })
            .await
    }

    /// Point the account line at a service.
    ///
    /// Returns the raw phone string of the line.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "TruVerifi::change_service",
            skip_all,
            fields(service = %service)
        )
    )]
    pub async fn change_service(&self, service: &str) -> Result<String, ProviderError> {
        let url = self.join("line/changeService")?;
        let body = ChangeServiceRequest {
            services: vec![service.to_string()],
        };

        let resp: ChangeServiceResponse = self
            .send_with_retry(|| self.apply_headers(self.http_client.post(url.clone())).json(&body))
            .await?;

        if !resp.error.is_empty() {
            return Err(ProviderError::Vendor {
                provider: PROVIDER,
                message: resp.error,
            });
        }

        Ok(resp.phone_number)
    }

    /// Fetch the current state of the account line, including every SMS
    /// it has received.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "TruVerifi::get_line", skip_all)
    )]
    pub(crate) async fn get_line(&self) -> Result<LineResponse, ProviderError> {
        let url = self.join("line")?;
        self.send_with_retry(|| self.apply_headers(self.http_client.get(url.clone())))
            .await
    }
}
