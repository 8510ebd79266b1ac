//! TextVerified HTTP client and the bearer keep-alive loop.

use chrono::Utc;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::fmt::Formatter;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::auth::AuthState;
use super::types::{AuthDetails, CreateVerificationRequest, VerificationDetails};
use crate::errors::ProviderError;

#[cfg(feature = "tracing")]
use opentelemetry::trace::Status;
#[cfg(feature = "tracing")]
use tracing::{Span, warn};
#[cfg(feature = "tracing")]
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub(crate) const PROVIDER: &str = "textverified";

/// Default TextVerified API URL.
pub const DEFAULT_API_URL: &str = "https://www.textverified.com/api/";

/// Fixed delay between re-authentication attempts after a transient failure.
const AUTH_RETRY_DELAY: Duration = Duration::from_secs(5);

/// TextVerified HTTP client.
///
/// Clones share one authentication session: the bearer token obtained by
/// [`authenticate`](TextVerified::authenticate) (and kept fresh by
/// [`keep_auth_alive`](TextVerified::keep_auth_alive)) is visible to every
/// clone through a shared watch cell.
#[derive(Clone)]
pub struct TextVerified {
    http_client: ClientWithMiddleware,
    api_key: SecretString,
    endpoint: Url,
    auth: watch::Sender<AuthState>,
}

impl std::fmt::Debug for TextVerified {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextVerified")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl TextVerified {
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

        let (auth, _) = watch::channel(AuthState::default());

        Ok(Self {
            http_client: ClientBuilder::new(client).build(),
            api_key: SecretString::from(api_key.into()),
            endpoint,
            auth,
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

    fn join(&self, path: &str) -> Result<Url, ProviderError> {
        self.endpoint.join(path).map_err(|e| ProviderError::Request {
            provider: PROVIDER,
            message: e.to_string(),
        })
    }

    /// Current bearer header, failing fast once the session is dead.
    fn bearer_header(&self) -> Result<Option<String>, ProviderError> {
        match &*self.auth.borrow() {
            AuthState::Failed => Err(ProviderError::Unauthorized),
            AuthState::Bearer { token, .. } => {
                Ok(Some(format!("Bearer {}", token.expose_secret())))
            }
            AuthState::Anonymous => Ok(None),
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        if status.as_u16() > 299 {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(ProviderError::Unauthorized);
            }
            return Err(ProviderError::Vendor {
                provider: PROVIDER,
                message: format!("{} {}", status.as_u16(), status_text(status.as_u16())),
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
    }

    fn apply_headers(
        &self,
        request: RequestBuilder,
        bearer: Option<String>,
    ) -> RequestBuilder {
        let request = request
            .header("content-type", "application/json")
            .header("x-simple-api-access-token", self.api_key.expose_secret());
        match bearer {
            Some(value) => request.header("authorization", value),
            None => request,
        }
    }

    /// Obtain a fresh bearer token and publish it to every clone.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "TextVerified::authenticate", skip_all)
    )]
    pub async fn authenticate(&self) -> Result<AuthDetails, ProviderError> {
        let url = self.join("SimpleAuthentication")?;
        let request = self.apply_headers(self.http_client.post(url), None);
        let details: AuthDetails = self.send_json(request).await?;

        self.auth.send_replace(AuthState::Bearer {
            token: SecretString::from(details.bearer_token.clone()),
            expires_at: details.expiration,
        });

        #[cfg(feature = "tracing")]
        {
            Span::current()
                .record("expiration", details.expiration.to_rfc3339().as_str())
                .set_status(Status::Ok);
        }

        Ok(details)
    }

    /// Delay until the current token is due for a refresh, one minute
    /// before it lapses.
    fn refresh_delay(&self) -> Duration {
        match &*self.auth.borrow() {
            AuthState::Bearer { expires_at, .. } => {
                (*expires_at - Utc::now() - chrono::Duration::seconds(60))
                    .to_std()
                    .unwrap_or(Duration::ZERO)
            }
            _ => Duration::ZERO,
        }
    }

    /// Keep the bearer token fresh until cancelled.
    ///
    /// Runs as an independent task: spawn it with its own cancellation
    /// token, detached from any single verification attempt. Transient
    /// re-authentication failures are retried on a fixed delay. When the
    /// vendor confirms the credentials are bad, the shared state is marked
    /// failed so dependent requests fail fast, and the error is returned.
    /// Cancellation ends the loop with `Ok(())`.
    pub async fn keep_auth_alive(&self, cancel: CancellationToken) -> Result<(), ProviderError> {
        loop {
            let refresh_in = self.refresh_delay();
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(refresh_in) => {}
            }

            loop {
                match self.authenticate().await {
                    Ok(_) => break,
                    Err(ProviderError::Unauthorized) => {
                        self.auth.send_replace(AuthState::Failed);
                        return Err(ProviderError::Unauthorized);
                    }
                    Err(_err) => {
                        #[cfg(feature = "tracing")]
                        warn!(error = %_err, "re-authentication failed, retrying");
                        tokio::select! {
                            _ = cancel.cancelled() => return Ok(()),
                            _ = tokio::time::sleep(AUTH_RETRY_DELAY) => {}
                        }
                    }
                }
            }
        }
    }

    /// Create a verification for a numeric vendor target id.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "TextVerified::create_verification",
            skip_all,
            fields(target_id = %target_id)
        )
    )]
    pub(crate) async fn create_verification(
        &self,
        target_id: i64,
    ) -> Result<VerificationDetails, ProviderError> {
        let bearer = self.bearer_header()?;
        let url = self.join("Verifications")?;
        let request = self
            .apply_headers(self.http_client.post(url), bearer)
            .json(&CreateVerificationRequest { id: target_id });

        self.send_json(request).await
    }

    /// Fetch the current state of a verification.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "TextVerified::get_verification",
            skip_all,
            fields(verification_id = %id)
        )
    )]
    pub(crate) async fn get_verification(
        &self,
        id: &str,
    ) -> Result<VerificationDetails, ProviderError> {
        let bearer = self.bearer_header()?;
        let url = self.join(&format!("Verifications/{id}"))?;
        let request = self.apply_headers(self.http_client.get(url), bearer);

        self.send_json(request).await
    }
}

/// Vendor-specific readings of otherwise generic HTTP statuses.
fn status_text(code: u16) -> &'static str {
    match code {
        400 => "Create failure",
        402 => "Insufficient credits",
        429 => {
            "Too many pending verifications. Complete the pending verifications before creating additional ones."
        }
        _ => reqwest::StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or(""),
    }
}
