//! SMSPVA HTTP client.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::fmt::Formatter;
use url::Url;

use super::types::{GetNumberResponse, GetSmsResponse};
use crate::errors::ProviderError;

pub(crate) const PROVIDER: &str = "smspva";

/// Default SMSPVA API URL.
pub const DEFAULT_API_URL: &str = "https://smspva.com/priemnik.php";

/// SMSPVA HTTP client.
#[derive(Clone)]
pub struct SmsPva {
    http_client: ClientWithMiddleware,
    api_key: SecretString,
    endpoint: Url,
}

impl std::fmt::Debug for SmsPva {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsPva")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl SmsPva {
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
        metod: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("metod", metod);
            pairs.append_pair("apikey", self.api_key.expose_secret());
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

    /// Lease a number for a vendor service code.
    ///
    /// Returns the order id and the raw phone string (calling code and
    /// national part concatenated, as the vendor reports them).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsPva::get_number",
            skip_all,
            fields(service = %service, country = %country)
        )
    )]
    pub async fn get_number(
        &self,
        service: &str,
        country: &str,
    ) -> Result<(String, String), ProviderError> {
        let resp: GetNumberResponse = self
            .get_json("get_number", &[("country", country), ("service", service)])
            .await?;

        if resp.response != "1" {
            return Err(ProviderError::Vendor {
                provider: PROVIDER,
                message: format!("get_number bad response {:?}", resp.response),
            });
        }

        let raw_number = format!("{}{}", resp.country_code, resp.number);
        Ok((resp.id.to_string(), raw_number))
    }

    /// Poll for the message of an order.
    ///
    /// Returns `None` while the vendor is still waiting (`response == "2"`).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsPva::get_sms",
            skip_all,
            fields(order_id = %id)
        )
    )]
    pub async fn get_sms(
        &self,
        id: &str,
        service: &str,
        country: &str,
    ) -> Result<Option<String>, ProviderError> {
        let resp: GetSmsResponse = self
            .get_json(
                "get_sms",
                &[("country", country), ("service", service), ("id", id)],
            )
            .await?;

        if resp.response == "2" {
            // sms: null (no messages yet)
            return Ok(None);
        }

        if resp.response != "1" {
            return Err(ProviderError::Vendor {
                provider: PROVIDER,
                message: format!("get_sms bad response {:?}", resp.response),
            });
        }

        Ok(Some(resp.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_number_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("metod", "get_number"))
            .and(query_param("apikey", "test_key"))
            .and(query_param("service", "opt4"))
            .and(query_param("country", "ru"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "1",
                "number": "9001234567",
                "CountryCode": "+7",
                "id": 1830
            })))
            .mount(&mock_server)
            .await;

        let client = SmsPva::new(mock_server.uri(), "test_key").unwrap();
        let (id, number) = client.get_number("opt4", "ru").await.unwrap();

        assert_eq!(id, "1830");
        assert_eq!(number, "+79001234567");
    }

    #[tokio::test]
    async fn test_get_number_bad_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "5"})),
            )
            .mount(&mock_server)
            .await;

        let client = SmsPva::new(mock_server.uri(), "test_key").unwrap();
        let err = client.get_number("opt4", "ru").await.unwrap_err();

        assert!(matches!(err, ProviderError::Vendor { .. }));
    }

    #[tokio::test]
    async fn test_get_sms_waiting() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("metod", "get_sms"))
            .and(query_param("id", "1830"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "2"})),
            )
            .mount(&mock_server)
            .await;

        let client = SmsPva::new(mock_server.uri(), "test_key").unwrap();
        assert_eq!(client.get_sms("1830", "opt4", "ru").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_sms_received() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("metod", "get_sms"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "1",
                "number": "9001234567",
                "text": "Your code is 482913"
            })))
            .mount(&mock_server)
            .await;

        let client = SmsPva::new(mock_server.uri(), "test_key").unwrap();
        assert_eq!(
            client.get_sms("1830", "opt4", "ru").await.unwrap(),
            Some("Your code is 482913".to_string())
        );
    }
}
