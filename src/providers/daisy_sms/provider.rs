//! Daisy SMS provider implementation.

use super::client::{ActivationStatus, DaisySms, PROVIDER};
use crate::errors::ProviderError;
use crate::provider::Provider;
use crate::types::{Metadata, PhoneNumber};

#[cfg(feature = "tracing")]
use tracing::debug;

/// Daisy-side handle for a leased number.
#[derive(Debug, Clone)]
pub struct DaisyActivation {
    pub(crate) id: String,
}

/// Daisy SMS provider implementation.
///
/// Wraps [`DaisySms`] behind the generic [`Provider`] contract. Daisy
/// numbers support a reuse window: after a code has been consumed,
/// [`reuse_phone_number`](Provider::reuse_phone_number) suppresses the
/// stale code so the next poll only reports a fresh one.
#[derive(Debug, Clone)]
pub struct DaisySmsProvider {
    client: DaisySms,
}

impl DaisySmsProvider {
    /// Create a new Daisy SMS provider.
    pub fn new(client: DaisySms) -> Self {
        Self { client }
    }

    /// Get reference to the inner client.
    pub fn client(&self) -> &DaisySms {
        &self.client
    }

    fn activation<'a>(&self, number: &'a PhoneNumber) -> Result<&'a DaisyActivation, ProviderError> {
        match number.metadata() {
            Metadata::DaisySms(activation) => Ok(activation),
            _ => Err(ProviderError::MetadataMismatch { provider: PROVIDER }),
        }
    }
}

impl Provider for DaisySmsProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "DaisySmsProvider::get_phone_number",
            skip_all,
            fields(service = %service)
        )
    )]
    async fn get_phone_number(
        &self,
        service: &str,
        _country: &str,
    ) -> Result<PhoneNumber, ProviderError> {
        // Daisy's pool is US-only; the country hint carries no weight here.
        let (id, raw_number) = self.client.get_number(service).await?;

        PhoneNumber::parse(&raw_number, Metadata::DaisySms(DaisyActivation { id })).map_err(
            |source| ProviderError::NumberParse {
                raw: raw_number,
                source,
            },
        )
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "DaisySmsProvider::get_messages",
            skip_all,
            fields(number = %number)
        )
    )]
    async fn get_messages(&self, number: &mut PhoneNumber) -> Result<Vec<String>, ProviderError> {
        let id = self.activation(number)?.id.clone();

        match self.client.get_status(&id).await? {
            None => Ok(vec![]),
            Some(code) => {
                if number.observe_code(&code) {
                    Ok(vec![code])
                } else {
                    // Stale redelivery of a code that was already consumed.
                    Ok(vec![])
                }
            }
        }
    }

    async fn cancel_phone_number(&self, number: &mut PhoneNumber) -> Result<(), ProviderError> {
        if number.cancelled() {
            return Ok(());
        }

        let id = self.activation(number)?.id.clone();
        let status = if number.used() {
            ActivationStatus::FinishActivation
        } else {
            ActivationStatus::CancelActivation
        };

        self.client.set_status(&id, status).await?;
        number.mark_cancelled();

        #[cfg(feature = "tracing")]
        debug!(activation_id = %id, status = %status, "activation released");

        Ok(())
    }

    fn supports_reuse(&self) -> bool {
        true
    }

    async fn reuse_phone_number(&self, number: &mut PhoneNumber) -> Result<(), ProviderError> {
        self.activation(number)?;
        number.begin_reuse();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_provider(mock_server: &MockServer) -> DaisySmsProvider {
        let client = DaisySms::new(mock_server.uri(), "test_key").unwrap();
        DaisySmsProvider::new(client)
    }

    async fn leased_number(mock_server: &MockServer) -> (DaisySmsProvider, PhoneNumber) {
        Mock::given(method("GET"))
            .and(query_param("action", "getNumber"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("ACCESS_NUMBER:12345:13476086155"),
            )
            .mount(mock_server)
            .await;

        let provider = create_test_provider(mock_server);
        let number = provider.get_phone_number("wa", "US").await.unwrap();
        (provider, number)
    }

    #[tokio::test]
    async fn test_get_phone_number() {
        let mock_server = MockServer::start().await;
        let (_, number) = leased_number(&mock_server).await;

        assert_eq!(number.e164(), "+13476086155");
        assert!(!number.used());
        assert!(!number.cancelled());
    }

    #[tokio::test]
    async fn test_get_messages_waiting_leaves_number_unused() {
        let mock_server = MockServer::start().await;
        let (provider, mut number) = leased_number(&mock_server).await;

        Mock::given(method("GET"))
            .and(query_param("action", "getStatus"))
            .respond_with(ResponseTemplate::new(200).set_body_string("STATUS_WAIT_CODE"))
            .mount(&mock_server)
            .await;

        let messages = provider.get_messages(&mut number).await.unwrap();
        assert!(messages.is_empty());
        assert!(!number.used());
    }

    #[tokio::test]
    async fn test_get_messages_code_marks_used() {
        let mock_server = MockServer::start().await;
        let (provider, mut number) = leased_number(&mock_server).await;

        Mock::given(method("GET"))
            .and(query_param("action", "getStatus"))
            .respond_with(ResponseTemplate::new(200).set_body_string("STATUS_OK:482913"))
            .mount(&mock_server)
            .await;

        let messages = provider.get_messages(&mut number).await.unwrap();
        assert_eq!(messages, vec!["482913".to_string()]);
        assert!(number.used());
    }

    #[tokio::test]
    async fn test_cancel_unused_number_abandons_activation() {
        let mock_server = MockServer::start().await;
        let (provider, mut number) = leased_number(&mock_server).await;

        Mock::given(method("GET"))
            .and(query_param("action", "setStatus"))
            .and(query_param("status", "8"))
            .and(query_param("id", "12345"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ACCESS_CANCEL"))
            .expect(1)
            .mount(&mock_server)
            .await;

        provider.cancel_phone_number(&mut number).await.unwrap();
        assert!(number.cancelled());

        // Second cancel is a no-op: the mock's expectation of exactly one
        // request verifies no further vendor call happens.
        provider.cancel_phone_number(&mut number).await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_used_number_finalizes_activation() {
        let mock_server = MockServer::start().await;
        let (provider, mut number) = leased_number(&mock_server).await;
        number.mark_used();

        Mock::given(method("GET"))
            .and(query_param("action", "setStatus"))
            .and(query_param("status", "6"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ACCESS_ACTIVATION"))
            .expect(1)
            .mount(&mock_server)
            .await;

        provider.cancel_phone_number(&mut number).await.unwrap();
        assert!(number.cancelled());
    }

    #[tokio::test]
    async fn test_reuse_suppresses_stale_code() {
        let mock_server = MockServer::start().await;
        let (provider, mut number) = leased_number(&mock_server).await;

        Mock::given(method("GET"))
            .and(query_param("action", "getStatus"))
            .respond_with(ResponseTemplate::new(200).set_body_string("STATUS_OK:482913"))
            .mount(&mock_server)
            .await;

        assert_eq!(
            provider.get_messages(&mut number).await.unwrap(),
            vec!["482913".to_string()]
        );

        assert!(provider.supports_reuse());
        provider.reuse_phone_number(&mut number).await.unwrap();

        // The vendor still reports the old code; the adapter must not
        // re-return it.
        assert!(provider.get_messages(&mut number).await.unwrap().is_empty());
        assert!(number.used());
    }

    #[cfg(feature = "tru-verifi")]
    #[tokio::test]
    async fn test_foreign_metadata_is_rejected() {
        let mock_server = MockServer::start().await;
        let provider = create_test_provider(&mock_server);

        let mut foreign = PhoneNumber::parse("+380501234567", Metadata::TruVerifi).unwrap();

        let err = provider.get_messages(&mut foreign).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::MetadataMismatch {
                provider: "daisysms"
            }
        ));
    }
}
