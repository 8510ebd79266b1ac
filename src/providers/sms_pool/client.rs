//! SMSPool HTTP client.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Formatter;
use url::Url;

use super::types::{CheckResponse, OrderQuery, PurchaseQuery, PurchaseResponse};
use crate::errors::ProviderError;

pub(crate) const PROVIDER: &str = "smspool";

/// Default SMSPool API URL.
pub const DEFAULT_API_URL: &str = "https://api.smspool.net/";

/// SMSPool HTTP client.
#[derive(Clone)]
pub struct SmsPool {
    http_client: ClientWithMiddleware,
    api_key: SecretString,
    endpoint: Url,
}

impl std::fmt::Debug for SmsPool {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsPool")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl SmsPool {
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

    async fn get_json<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ProviderError> {
        let mut url = self
            .endpoint
            .join(path)
            .map_err(|e| ProviderError::Request {
                provider: PROVIDER,
                message: e.to_string(),
            })?;
        url.set_query(Some(&serde_urlencoded::to_string(query).map_err(|e| {
            ProviderError::Request {
                provider: PROVIDER,
                message: e.to_string(),
            }
        })?));

        let response = self
            .http_client
            .get(url)
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
    }

    /// Purchase a number for a numeric vendor service id.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsPool::purchase_sms",
            skip_all,
            fields(service = %service, country = %country)
        )
    )]
    pub async fn purchase_sms(
        &self,
        service: i64,
        country: &str,
    ) -> Result<PurchaseResponse, ProviderError> {
        let resp: PurchaseResponse = self
            .get_json(
                "purchase/sms",
                &PurchaseQuery {
                    key: self.api_key.expose_secret(),
                    country,
                    service,
                },
            )
            .await?;

        if resp.success == 0 {
            return Err(ProviderError::Vendor {
                provider: PROVIDER,
                message: resp.message,
            });
        }

        Ok(resp)
    }

    /// Poll the current state of an order.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsPool::check_sms",
            skip_all,
            fields(order_id = %order_id)
        )
    )]
    pub async fn check_sms(&self, order_id: &str) -> Result<CheckResponse, ProviderError> {
        let resp: CheckResponse = self
            .get_json(
                "sms/check",
                &OrderQuery {
                    key: self.api_key.expose_secret(),
                    orderid: order_id,
                },
            )
            .await?;

        if resp.success == 0 {
            return Err(ProviderError::Vendor {
                provider: PROVIDER,
                message: resp.message,
            });
        }

        Ok(resp)
    }

    /// Cancel an order that never received a message.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsPool::cancel_sms",
            skip_all,
            fields(order_id = %order_id)
        )
    )]
    pub async fn cancel_sms(&self, order_id: &str) -> Result<(), ProviderError> {
        let resp: CheckResponse = self
            .get_json(
                "sms/cancel",
                &OrderQuery {
                    key: self.api_key.expose_secret(),
                    orderid: order_id,
                },
            )
            .await?;

        if resp.success == 0 {
            return Err(ProviderError::Vendor {
                provider: PROVIDER,
                message: resp.message,
            });
        }

        Ok(())
    }
}
