//! SMSPool provider implementation.

use super::client::{PROVIDER, SmsPool};
use crate::errors::ProviderError;
use crate::provider::Provider;
use crate::types::{Metadata, PhoneNumber};

/// SMSPool order statuses reported by `sms/check`.
mod order_status {
    pub(super) const PENDING: i64 = 1;
    pub(super) const EXPIRED: i64 = 2;
    pub(super) const DELIVERED: i64 = 3;
    pub(super) const REPORTED: i64 = 4;
    pub(super) const CANCELLED: i64 = 5;
}

/// SMSPool-side handle for a leased number.
#[derive(Debug, Clone)]
pub struct SmsPoolOrder {
    pub(crate) order_id: String,
}

/// SMSPool provider implementation.
///
/// The service identifier is the vendor's numeric service id, as a string.
#[derive(Debug, Clone)]
pub struct SmsPoolProvider {
    client: SmsPool,
}

impl SmsPoolProvider {
    /// Create a new SMSPool provider.
    pub fn new(client: SmsPool) -> Self {
        Self { client }
    }

    /// Get reference to the inner client.
    pub fn client(&self) -> &SmsPool {
        &self.client
    }

    fn order<'a>(&self, number: &'a PhoneNumber) -> Result<&'a SmsPoolOrder, ProviderError> {
        match number.metadata() {
            Metadata::SmsPool(order) => Ok(order),
            _ => Err(ProviderError::MetadataMismatch { provider: PROVIDER }),
        }
    }
}

impl Provider for SmsPoolProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsPoolProvider::get_phone_number",
            skip_all,
            fields(service = %service)
        )
    )]
    async fn get_phone_number(
        &self,
        service: &str,
        country: &str,
    ) -> Result<PhoneNumber, ProviderError> {
        let service: i64 = service.parse().map_err(|_| ProviderError::Request {
            provider: PROVIDER,
            message: format!("invalid service id {service:?}"),
        })?;

        let resp = self.client.purchase_sms(service, country).await?;

        PhoneNumber::parse(
            &resp.number,
            Metadata::SmsPool(SmsPoolOrder {
                order_id: resp.order_id,
            }),
        )
        .map_err(|source| ProviderError::NumberParse {
            raw: resp.number,
            source,
        })
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "SmsPoolProvider::get_messages",
            skip_all,
            fields(number = %number)
        )
    )]
    async fn get_messages(&self, number: &mut PhoneNumber) -> Result<Vec<String>, ProviderError> {
        let order_id = self.order(number)?.order_id.clone();
        let resp = self.client.check_sms(&order_id).await?;

        match resp.status {
            order_status::PENDING => Ok(vec![]),
            order_status::EXPIRED => Err(ProviderError::VerificationExpired),
            order_status::DELIVERED => {
                number.mark_used();
                Ok(vec![resp.full_sms])
            }
            order_status::REPORTED => Err(ProviderError::Reported),
            order_status::CANCELLED => Err(ProviderError::Cancelled),
            other => Err(ProviderError::Vendor {
                provider: PROVIDER,
                message: format!("unknown status {other}"),
            }),
        }
    }

    async fn cancel_phone_number(&self, number: &mut PhoneNumber) -> Result<(), ProviderError> {
        // Delivered orders are settled; only pending ones can be refunded.
        if number.used() || number.cancelled() {
            return Ok(());
        }

        let order_id = self.order(number)?.order_id.clone();
        self.client.cancel_sms(&order_id).await?;
        number.mark_cancelled();

        Ok(())
    }
}
