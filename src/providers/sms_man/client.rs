//! SMS-Man HTTP client.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::fmt::{Display, Formatter};
use url::Url;

use super::types::{ErrorEnvelope, GetNumberResponse, GetSmsResponse};
use crate::errors::ProviderError;

pub(crate) const PROVIDER: &str = "smsman";

/// Default SMS-Man API URL.
pub const DEFAULT_API_URL: &str = "http://api.sms-man.com/control/";

/// Request statuses accepted by the vendor's `set-status` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// Reject the number: abandon an activation that received nothing.
    Reject,
    /// Confirm the activation went through.
    Ok,
}

impl RequestStatus {
    fn wire(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Ok => "ok",
        }
    }
}

impl Display for RequestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire())
    }
}

/// SMS-Man HTTP client.
#[derive(Clone)]
pub struct SmsMan {
    http_client: ClientWithMiddleware,
    api_key: SecretString,
    endpoint: Url,
}

impl std::fmt::Debug for SmsMan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsMan")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl SmsMan {
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

    async fn get_json<T: DeserializeOwned>(
        &self,
        action: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let mut url = self
            .endpoint
            .join(action)
            .map_err(|e| ProviderError::Request {
                provider: PROVIDER,
                message: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("token", self.api_key.expose_secret());
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                provider: PROVIDER,
                source,
            })?;

        let text = response.text().await.map_err(|source| ProviderError::Http {
            provider: PROVIDER,
            source: source.into(),
        })?;

        serde_json::from_str(&text).map_err(|source| ProviderError::Decode {
            provider: PROVIDER,
            source,
        })
    }

    /// Lease a number for a vendor application id.
    ///
    /// Returns the request id and the raw phone string.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsMan::get_number",
            skip_all,
            fields(application_id = %application_id, country_id = %country_id)
        )
    )]
    pub async fn get_number(
        &self,
        application_id: &str,
        country_id: &str,
    ) -> Result<(String, String), ProviderError> {
        let resp: GetNumberResponse = self
            .get_json(
                "get-number",
                &[
                    ("country_id", country_id),
                    ("application_id", application_id),
                ],
            )
            .await?;

        if let Some(err) = resp.error.failure() {
            return Err(err);
        }

        let request_id = resp.request_id.ok_or_else(|| ProviderError::Vendor {
            provider: PROVIDER,
            message: "get-number response missing request_id".to_string(),
        })?;
        let number = resp.number.ok_or_else(|| ProviderError::Vendor {
            provider: PROVIDER,
            message: "get-number response missing number".to_string(),
        })?;

        Ok((request_id.to_string(), number))
    }

    /// Poll for the SMS code of a request.
    ///
    /// Returns `None` while the vendor is still waiting.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsMan::get_sms",
            skip_all,
            fields(request_id = %request_id)
        )
    )]
    pub async fn get_sms(&self, request_id: &str) -> Result<Option<String>, ProviderError> {
        let resp: GetSmsResponse = self
            .get_json("get-sms", &[("request_id", request_id)])
            .await?;

        if let Some(err) = resp.error.failure() {
            return Err(err);
        }

        Ok(resp.sms_code.filter(|code| !code.is_empty()))
    }

    /// Set the terminal status of a request.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsMan::set_status",
            skip_all,
            fields(request_id = %request_id, status = %status)
        )
    )]
    pub async fn set_status(
        &self,
        request_id: &str,
        status: RequestStatus,
    ) -> Result<(), ProviderError> {
        let resp: ErrorEnvelope = self
            .get_json(
                "set-status",
                &[("status", status.wire()), ("request_id", request_id)],
            )
            .await?;

        if let Some(err) = resp.failure() {
            return Err(err);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_number_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get-number"))
            .and(query_param("token", "test_key"))
            .and(query_param("application_id", "59"))
            .and(query_param("country_id", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "request_id": 940,
                "number": "79001234567"
            })))
            .mount(&mock_server)
            .await;

        let client = SmsMan::new(mock_server.uri(), "test_key").unwrap();
        let (request_id, number) = client.get_number("59", "5").await.unwrap();

        assert_eq!(request_id, "940");
        assert_eq!(number, "79001234567");
    }

    #[tokio::test]
    async fn test_get_number_error_envelope() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get-number"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error_code": "balance",
                "error_msg": "not enough funds"
            })))
            .mount(&mock_server)
            .await;

        let client = SmsMan::new(mock_server.uri(), "test_key").unwrap();
        let err = client.get_number("59", "5").await.unwrap_err();

        assert!(matches!(err, ProviderError::Vendor { .. }));
    }

    #[tokio::test]
    async fn test_get_sms_still_waiting() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get-sms"))
            .and(query_param("request_id", "940"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error_code": "wait_sms",
                "error_msg": "wait sms"
            })))
            .mount(&mock_server)
            .await;

        let client = SmsMan::new(mock_server.uri(), "test_key").unwrap();
        assert_eq!(client.get_sms("940").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_sms_code_received() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/get-sms"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"sms_code": "482913"})),
            )
            .mount(&mock_server)
            .await;

        let client = SmsMan::new(mock_server.uri(), "test_key").unwrap();
        assert_eq!(
            client.get_sms("940").await.unwrap(),
            Some("482913".to_string())
        );
    }

    #[tokio::test]
    async fn test_set_status_reject() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/set-status"))
            .and(query_param("status", "reject"))
            .and(query_param("request_id", "940"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let client = SmsMan::new(mock_server.uri(), "test_key").unwrap();
        client
            .set_status("940", RequestStatus::Reject)
            .await
            .unwrap();
    }
}
