//! TruVerifi provider implementation.

use super::client::{PROVIDER, TruVerifi};
use crate::errors::ProviderError;
use crate::provider::Provider;
use crate::types::{Metadata, PhoneNumber};

/// TruVerifi provider implementation.
///
/// One account, one line: polling reads the line's whole inbox instead of
/// a per-order mailbox, so numbers carry no vendor metadata beyond the
/// ownership tag.
#[derive(Debug, Clone)]
pub struct TruVerifiProvider {
    client: TruVerifi,
}

impl TruVerifiProvider {
    /// Create a new TruVerifi provider.
    pub fn new(client: TruVerifi) -> Self {
        Self { client }
    }

    /// Get reference to the inner client.
    pub fn client(&self) -> &TruVerifi {
        &self.client
    }

    fn check_ownership(&self, number: &PhoneNumber) -> Result<(), ProviderError> {
        match number.metadata() {
            Metadata::TruVerifi => Ok(()),
            _ => Err(ProviderError::MetadataMismatch { provider: PROVIDER }),
        }
    }
}

impl Provider for TruVerifiProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "TruVerifiProvider::get_phone_number",
            skip_all,
            fields(service = %service)
        )
    )]
    async fn get_phone_number(
        &self,
        service: &str,
        _country: &str,
    ) -> Result<PhoneNumber, ProviderError> {
        let raw_number = self.client.change_service(service).await?;

        PhoneNumber::parse(&raw_number, Metadata::TruVerifi).map_err(|source| {
            ProviderError::NumberParse {
                raw: raw_number,
                source,
            }
        })
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "TruVerifiProvider::get_messages",
            skip_all,
            fields(number = %number)
        )
    )]
    async fn get_messages(&self, number: &mut PhoneNumber) -> Result<Vec<String>, ProviderError> {
        self.check_ownership(number)?;

        let line = self.client.get_line().await?;
        let messages: Vec<String> = line.sms.into_iter().map(|sms| sms.text).collect();

        if !messages.is_empty() {
            number.mark_used();
        }

        Ok(messages)
    }

    async fn cancel_phone_number(&self, number: &mut PhoneNumber) -> Result<(), ProviderError> {
        // truverifi does not support cancelling
        self.check_ownership(number)?;
        number.mark_cancelled();
        Ok(())
    }

    async fn report_phone_number(&self, number: &mut PhoneNumber) -> Result<(), ProviderError> {
        // truverifi does not support reporting
        self.check_ownership(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn leased_number(mock_server: &MockServer) -> (TruVerifiProvider, PhoneNumber) {
        Mock::given(method("POST"))
            .and(path("/line/changeService"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "phoneNumber": "13476086155"
            })))
            .mount(mock_server)
            .await;

        let client = TruVerifi::new(mock_server.uri(), "test_key").unwrap();
        let provider = TruVerifiProvider::new(client);
        let number = provider.get_phone_number("example", "US").await.unwrap();
        (provider, number)
    }

    #[tokio::test]
    async fn test_get_phone_number() {
        let mock_server = MockServer::start().await;
        let (_, number) = leased_number(&mock_server).await;

        assert_eq!(number.e164(), "+13476086155");
    }

    #[tokio::test]
    async fn test_get_messages_empty_line() {
        let mock_server = MockServer::start().await;
        let (provider, mut number) = leased_number(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/line"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "phoneNumber": "13476086155",
                "status": "ACTIVE",
                "sms": []
            })))
            .mount(&mock_server)
            .await;

        assert!(provider.get_messages(&mut number).await.unwrap().is_empty());
        assert!(!number.used());
    }

    #[tokio::test]
    async fn test_get_messages_collects_line_inbox() {
        let mock_server = MockServer::start().await;
        let (provider, mut number) = leased_number(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/line"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "phoneNumber": "13476086155",
                "status": "ACTIVE",
                "sms": [
                    {"id": 1, "type": "sms", "text": "Your code is 482913"},
                    {"id": 2, "type": "sms", "text": "Your code is 771204"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let messages = provider.get_messages(&mut number).await.unwrap();
        assert_eq!(
            messages,
            vec![
                "Your code is 482913".to_string(),
                "Your code is 771204".to_string()
            ]
        );
        assert!(number.used());
    }

    #[tokio::test]
    async fn test_cancel_and_report_are_no_ops() {
        let mock_server = MockServer::start().await;
        let (provider, mut number) = leased_number(&mock_server).await;

        provider.cancel_phone_number(&mut number).await.unwrap();
        assert!(number.cancelled());
        provider.cancel_phone_number(&mut number).await.unwrap();

        provider.report_phone_number(&mut number).await.unwrap();
    }

    #[cfg(feature = "daisy-sms")]
    #[tokio::test]
    async fn test_foreign_metadata_is_rejected() {
        let mock_server = MockServer::start().await;
        let (provider, _) = leased_number(&mock_server).await;

        let mut foreign = PhoneNumber::parse(
            "+13476086155",
            Metadata::DaisySms(crate::providers::daisy_sms::DaisyActivation {
                id: "12345".to_string(),
            }),
        )
        .unwrap();

        assert!(matches!(
            provider.get_messages(&mut foreign).await.unwrap_err(),
            ProviderError::MetadataMismatch {
                provider: "truverifi"
            }
        ));
    }
}
