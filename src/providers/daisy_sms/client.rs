//! Daisy SMS HTTP client.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use secrecy::{ExposeSecret, SecretString};
use std::fmt::{Display, Formatter};
use url::Url;

use crate::errors::ProviderError;

#[cfg(feature = "tracing")]
use opentelemetry::trace::Status;
#[cfg(feature = "tracing")]
use tracing::Span;
#[cfg(feature = "tracing")]
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub(crate) const PROVIDER: &str = "daisysms";

/// Default Daisy SMS API URL.
pub const DEFAULT_API_URL: &str = "https://daisysms.com/stubs/handler_api.php";

/// Status codes accepted by the vendor's `setStatus` action.
///
/// The vendor bills abandoned and completed activations differently, so
/// releasing a number picks the code from whether a message was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationStatus {
    /// Finalize an activation whose code was used (status 6).
    FinishActivation,
    /// Abandon an activation that never received a code (status 8).
    CancelActivation,
}

impl ActivationStatus {
    /// Numeric code sent on the wire.
    pub fn code(&self) -> u8 {
        match self {
            Self::FinishActivation => 6,
            Self::CancelActivation => 8,
        }
    }

    /// Sentinel the vendor answers with on success.
    fn expected_response(&self) -> &'static str {
        match self {
            Self::FinishActivation => "ACCESS_ACTIVATION",
            Self::CancelActivation => "ACCESS_CANCEL",
        }
    }
}

impl Display for ActivationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FinishActivation => write!(f, "FinishActivation(6)"),
            Self::CancelActivation => write!(f, "CancelActivation(8)"),
        }
    }
}

/// Daisy SMS HTTP client.
///
/// Every call is a GET against `handler_api.php` with an `action` query
/// parameter; responses are plain text sentinels, colon-delimited where
/// they carry data.
#[derive(Clone)]
pub struct DaisySms {
    http_client: ClientWithMiddleware,
    api_key: SecretString,
    endpoint: Url,
}

impl std::fmt::Debug for DaisySms {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaisySms")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl DaisySms {
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

    fn build_request_url(&self, action: &str, additional: &[(&str, &str)]) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", self.api_key.expose_secret());
            pairs.append_pair("action", action);
            for (key, value) in additional {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    async fn send_request(&self, url: Url) -> Result<String, ProviderError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                provider: PROVIDER,
                source,
            })?;

        response.text().await.map_err(|source| ProviderError::Http {
            provider: PROVIDER,
            source: source.into(),
        })
    }

    /// Lease a number for a vendor service code.
    ///
    /// Returns the activation id and the raw phone string.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "DaisySms::get_number",
            skip_all,
            fields(service = %service)
        )
    )]
    pub async fn get_number(&self, service: &str) -> Result<(String, String), ProviderError> {
        let url = self.build_request_url("getNumber", &[("service", service)]);
        let text = self.send_request(url).await?;

        if let Some(err) = classify_error(&text) {
            return Err(err);
        }

        if !text.starts_with("ACCESS_NUMBER") {
            return Err(ProviderError::Vendor {
                provider: PROVIDER,
                message: text,
            });
        }

        // ACCESS_NUMBER:{id}:{number}
        let mut parts = text.splitn(3, ':');
        parts.next();
        let (Some(id), Some(raw_number)) = (parts.next(), parts.next()) else {
            return Err(ProviderError::Vendor {
                provider: PROVIDER,
                message: format!("invalid phone format {text:?}"),
            });
        };

        #[cfg(feature = "tracing")]
        {
            Span::current()
                .record("activation_id", id)
                .record("phone_number", raw_number)
                .set_status(Status::Ok);
        }

        Ok((id.to_string(), raw_number.to_string()))
    }

    /// Poll the current status of an activation.
    ///
    /// Returns `None` while the vendor is still waiting for a message.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "DaisySms::get_status",
            skip_all,
            fields(activation_id = %id)
        )
    )]
    pub async fn get_status(&self, id: &str) -> Result<Option<String>, ProviderError> {
        let url = self.build_request_url("getStatus", &[("id", id)]);
        let text = self.send_request(url).await?;

        if text == "STATUS_WAIT_CODE" {
            return Ok(None);
        }

        if let Some(err) = classify_error(&text) {
            return Err(err);
        }

        if !text.starts_with("STATUS_OK") {
            return Err(ProviderError::Vendor {
                provider: PROVIDER,
                message: format!("failed to get messages: {text:?}"),
            });
        }

        // STATUS_OK:{code}
        let Some((_, code)) = text.split_once(':') else {
            return Err(ProviderError::Vendor {
                provider: PROVIDER,
                message: format!("invalid messages {text:?}"),
            });
        };

        Ok(Some(code.to_string()))
    }

    /// Set the terminal status of an activation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "DaisySms::set_status",
            skip_all,
            fields(activation_id = %id, status = %status)
        )
    )]
    pub async fn set_status(
        &self,
        id: &str,
        status: ActivationStatus,
    ) -> Result<(), ProviderError> {
        let code = status.code().to_string();
        let url = self.build_request_url("setStatus", &[("status", &code), ("id", id)]);
        let text = self.send_request(url).await?;

        if text != status.expected_response() {
            return Err(ProviderError::Vendor {
                provider: PROVIDER,
                message: format!("failed to cancel {text:?}"),
            });
        }

        Ok(())
    }
}

/// Map the vendor's plain-text error sentinels onto the lifecycle model.
fn classify_error(text: &str) -> Option<ProviderError> {
    match text.trim() {
        "NO_NUMBERS" => Some(ProviderError::NoNumbers),
        "BAD_KEY" => Some(ProviderError::Unauthorized),
        _ => None,
    }
}
