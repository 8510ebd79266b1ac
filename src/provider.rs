//! Provider trait definition.

use std::future::Future;

use crate::errors::ProviderError;
use crate::types::PhoneNumber;

/// Uniform lifecycle contract implemented once per SMS vendor.
///
/// The contract is intentionally narrow (three required operations plus two
/// optional capabilities) because vendor APIs diverge enormously (JSON vs
/// colon-delimited text, polling statuses vs explicit terminal states,
/// different cancel-call economics for used vs unused numbers). An adapter
/// absorbs that divergence once, at this boundary.
///
/// # Concurrency
///
/// A single provider instance (one authenticated vendor session) may back
/// several simultaneous verification attempts, so implementations must be
/// safe for concurrent use. Within one attempt, calls for the same
/// [`PhoneNumber`] are strictly sequential; the exclusive borrows encode
/// that.
///
/// # Example
///
/// ```rust,ignore
/// use sms_verify::{Matcher, PhoneNumber, Provider};
/// use sms_verify::providers::daisy_sms::{DaisySms, DaisySmsProvider};
///
/// let client = DaisySms::with_api_key("your_api_key")?;
/// let provider = DaisySmsProvider::new(client);
///
/// let mut number = provider.get_phone_number("wa", "US").await?;
/// println!("Leased {}", number);
///
/// let matcher = Matcher::new(|message: &str| Some(message.to_string()));
/// let code = matcher.wait_for_message(&provider, &mut number).await?;
/// ```
pub trait Provider: Send + Sync {
    /// Stable adapter name, used in errors and logging.
    fn name(&self) -> &'static str;

    /// Lease a new number for a vendor-specific service code.
    ///
    /// # Arguments
    /// * `service` - vendor-specific opaque service code (not a human name)
    /// * `country` - vendor-specific country hint; adapters for vendors
    ///   without country selection ignore it
    ///
    /// # Returns
    /// A [`PhoneNumber`] carrying whatever vendor metadata is needed to
    /// later poll and release it.
    fn get_phone_number(
        &self,
        service: &str,
        country: &str,
    ) -> impl Future<Output = Result<PhoneNumber, ProviderError>> + Send;

    /// Poll the vendor for messages received on this number.
    ///
    /// Returns an empty vec, never an error, while the vendor is still
    /// waiting. A non-empty result marks the number used. Vendor-reported
    /// terminal states surface as
    /// [`VerificationExpired`](ProviderError::VerificationExpired),
    /// [`Reported`](ProviderError::Reported) or
    /// [`Cancelled`](ProviderError::Cancelled), all of which are fatal to
    /// the polling loop.
    fn get_messages(
        &self,
        number: &mut PhoneNumber,
    ) -> impl Future<Output = Result<Vec<String>, ProviderError>> + Send;

    /// Release the number back to the vendor.
    ///
    /// A no-op success when the number is already cancelled, so the wait
    /// engine's cleanup call is uniform across providers. Adapters for
    /// vendors that distinguish "abandon unused" from "finalize used" pick
    /// the right call from [`PhoneNumber::used`]; adapters for vendors
    /// without cancellation succeed without a vendor call.
    fn cancel_phone_number(
        &self,
        number: &mut PhoneNumber,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Flag the number as fraudulent/bad to the vendor.
    ///
    /// Optional capability; the default aliases [`cancel_phone_number`]
    /// for vendors without a dedicated report call.
    ///
    /// [`cancel_phone_number`]: Provider::cancel_phone_number
    fn report_phone_number(
        &self,
        number: &mut PhoneNumber,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send {
        self.cancel_phone_number(number)
    }

    /// Whether this provider offers a reuse window: the same number
    /// receiving another code for a different service without a new
    /// purchase. Query this before calling
    /// [`reuse_phone_number`](Provider::reuse_phone_number).
    fn supports_reuse(&self) -> bool {
        false
    }

    /// Prepare the number to receive another code.
    ///
    /// Suppresses the already-observed code so the next
    /// [`get_messages`](Provider::get_messages) does not re-return it.
    /// Leaves `used` and `cancelled` untouched. The default fails with
    /// [`Unsupported`](ProviderError::Unsupported).
    fn reuse_phone_number(
        &self,
        number: &mut PhoneNumber,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send {
        let _ = number;
        std::future::ready(Err(ProviderError::Unsupported {
            provider: self.name(),
            operation: "reuse",
        }))
    }
}
