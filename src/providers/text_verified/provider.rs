//! TextVerified provider implementation.

use super::client::{PROVIDER, TextVerified};
use crate::errors::ProviderError;
use crate::provider::Provider;
use crate::types::{Metadata, PhoneNumber};

/// TextVerified-side handle for a leased number.
#[derive(Debug, Clone)]
pub struct VerificationRef {
    pub(crate) id: String,
}

/// TextVerified provider implementation.
///
/// The service identifier is the vendor's numeric target id, as a string.
/// Call [`TextVerified::authenticate`] before the first lease and keep a
/// [`TextVerified::keep_auth_alive`] task running for long-lived sessions.
#[derive(Debug, Clone)]
pub struct TextVerifiedProvider {
    client: TextVerified,
}

impl TextVerifiedProvider {
    /// Create a new TextVerified provider.
    pub fn new(client: TextVerified) -> Self {
        Self { client }
    }

    /// Get reference to the inner client.
    pub fn client(&self) -> &TextVerified {
        &self.client
    }

    fn verification<'a>(&self, number: &'a PhoneNumber) -> Result<&'a VerificationRef, ProviderError> {
        match number.metadata() {
            Metadata::TextVerified(verification) => Ok(verification),
            _ => Err(ProviderError::MetadataMismatch { provider: PROVIDER }),
        }
    }
}

impl Provider for TextVerifiedProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "TextVerifiedProvider::get_phone_number",
            skip_all,
            fields(service = %service)
        )
    )]
    async fn get_phone_number(
        &self,
        service: &str,
        _country: &str,
    ) -> Result<PhoneNumber, ProviderError> {
        // US-only vendor; targets are addressed by numeric id.
        let target_id: i64 = service.parse().map_err(|_| ProviderError::Request {
            provider: PROVIDER,
            message: format!("invalid service id {service:?}"),
        })?;

        let details = self.client.create_verification(target_id).await?;

        PhoneNumber::parse(
            &details.number,
            Metadata::TextVerified(VerificationRef { id: details.id }),
        )
        .map_err(|source| ProviderError::NumberParse {
            raw: details.number,
            source,
        })
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "TextVerifiedProvider::get_messages",
            skip_all,
            fields(number = %number)
        )
    )]
    async fn get_messages(&self, number: &mut PhoneNumber) -> Result<Vec<String>, ProviderError> {
        let id = self.verification(number)?.id.clone();
        let details = self.client.get_verification(&id).await?;

        match details.status.as_str() {
            "Pending" => Ok(vec![]),
            "Timed Out" => Err(ProviderError::VerificationExpired),
            "Reported" => Err(ProviderError::Reported),
            "Cancelled" => Err(ProviderError::Cancelled),
            _ => {
                number.mark_used();
                Ok(vec![details.sms.unwrap_or_default()])
            }
        }
    }

    async fn cancel_phone_number(&self, number: &mut PhoneNumber) -> Result<(), ProviderError> {
        // Verifications lapse server-side once their window closes; there
        // is nothing to release.
        self.verification(number)?;
        number.mark_cancelled();
        Ok(())
    }
}
