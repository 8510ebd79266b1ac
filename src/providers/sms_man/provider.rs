//! SMS-Man provider implementation.

use super::client::{PROVIDER, RequestStatus, SmsMan};
use crate::errors::ProviderError;
use crate::provider::Provider;
use crate::types::{Metadata, PhoneNumber};

/// SMS-Man-side handle for a leased number.
#[derive(Debug, Clone)]
pub struct SmsManRequest {
    pub(crate) request_id: String,
}

/// SMS-Man provider implementation.
///
/// The service identifier is the vendor's numeric `application_id` and the
/// country hint is its numeric `country_id`, both passed through opaquely.
#[derive(Debug, Clone)]
pub struct SmsManProvider {
    client: SmsMan,
}

impl SmsManProvider {
    /// Create a new SMS-Man provider.
    pub fn new(client: SmsMan) -> Self {
        Self { client }
    }

    /// Get reference to the inner client.
    pub fn client(&self) -> &SmsMan {
        &self.client
    }

    fn request<'a>(&self, number: &'a PhoneNumber) -> Result<&'a SmsManRequest, ProviderError> {
        match number.metadata() {
            Metadata::SmsMan(request) => Ok(request),
            _ => Err(ProviderError::MetadataMismatch { provider: PROVIDER }),
        }
    }
}

impl Provider for SmsManProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsManProvider::get_phone_number",
            skip_all,
            fields(service = %service, country = %country)
        )
    )]
    async fn get_phone_number(
        &self,
        service: &str,
        country: &str,
    ) -> Result<PhoneNumber, ProviderError> {
        let (request_id, raw_number) = self.client.get_number(service, country).await?;

        PhoneNumber::parse(&raw_number, Metadata::SmsMan(SmsManRequest { request_id })).map_err(
            |source| ProviderError::NumberParse {
                raw: raw_number,
                source,
            },
        )
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsManProvider::get_messages",
            skip_all,
            fields(number = %number)
        )
    )]
    async fn get_messages(&self, number: &mut PhoneNumber) -> Result<Vec<String>, ProviderError> {
        let request_id = self.request(number)?.request_id.clone();

        match self.client.get_sms(&request_id).await? {
            None => Ok(vec![]),
            Some(code) => {
                number.mark_used();
                Ok(vec![code])
            }
        }
    }

    async fn cancel_phone_number(&self, number: &mut PhoneNumber) -> Result<(), ProviderError> {
        // A delivered SMS cannot be rejected; the vendor settles it on its
        // own once the request completes.
        if number.used() || number.cancelled() {
            return Ok(());
        }

        let request_id = self.request(number)?.request_id.clone();
        self.client
            .set_status(&request_id, RequestStatus::Reject)
            .await?;
        number.mark_cancelled();

        Ok(())
    }

    async fn report_phone_number(&self, number: &mut PhoneNumber) -> Result<(), ProviderError> {
        let request_id = self.request(number)?.request_id.clone();
        self.client.set_status(&request_id, RequestStatus::Ok).await
    }
}
