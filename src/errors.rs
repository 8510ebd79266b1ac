//! The normalized error model shared by every vendor adapter.

use thiserror::Error;

use crate::utils::phone::PhoneParseError;

/// Error returned by provider operations.
///
/// Vendor APIs diverge enormously: JSON envelopes, colon-delimited text
/// sentinels, numeric order statuses, HTTP status conventions. Every adapter
/// maps its vendor's shapes into this one taxonomy at the boundary, so
/// callers and the wait engine never branch on vendor identity.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// The vendor reports the verification window expired before a message
    /// arrived. Terminal: the wait engine stops polling.
    #[error("verification expired")]
    VerificationExpired,

    /// The vendor reports the number was reported as fraudulent/bad.
    /// Terminal.
    #[error("verification was reported")]
    Reported,

    /// The vendor reports the verification was cancelled out-of-band (by
    /// the user through the vendor dashboard, or by the vendor itself).
    /// Terminal.
    #[error("verification was cancelled by user or system")]
    Cancelled,

    /// The vendor has no numbers available for the requested service and
    /// country.
    #[error("no numbers available")]
    NoNumbers,

    /// The vendor rejected the request's credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The vendor is rate limiting requests. Adapters retry this a bounded
    /// number of times internally before surfacing it.
    #[error("rate limited by {provider}")]
    RateLimited {
        /// Adapter that hit the limit.
        provider: &'static str,
    },

    /// A phone number was presented to a provider that did not issue it.
    /// Always a programming error at the call site.
    #[error("phone number metadata is not owned by {provider}")]
    MetadataMismatch {
        /// Adapter that rejected the metadata.
        provider: &'static str,
    },

    /// The provider does not implement an optional operation.
    #[error("{provider} does not support {operation}")]
    Unsupported {
        /// Adapter that lacks the capability.
        provider: &'static str,
        /// Operation that was requested.
        operation: &'static str,
    },

    /// The vendor returned a phone string that could not be normalized.
    /// Distinct from vendor-reported failures.
    #[error("parsing phone number {raw:?}: {source}")]
    NumberParse {
        /// Raw phone string as the vendor sent it.
        raw: String,
        #[source]
        source: PhoneParseError,
    },

    /// A client or request could not be constructed (bad endpoint URL,
    /// HTTP client build failure, query encoding).
    #[error("building {provider} request: {message}")]
    Request {
        /// Adapter whose request failed to build.
        provider: &'static str,
        /// What went wrong.
        message: String,
    },

    /// The HTTP request itself failed.
    #[error("sending request to {provider}: {source}")]
    Http {
        /// Adapter whose request failed.
        provider: &'static str,
        #[source]
        source: reqwest_middleware::Error,
    },

    /// The vendor response body could not be decoded.
    #[error("decoding {provider} response: {source}")]
    Decode {
        /// Adapter whose response failed to decode.
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Any other vendor-reported failure, carried verbatim.
    #[error("{provider}: {message}")]
    Vendor {
        /// Adapter that surfaced the failure.
        provider: &'static str,
        /// Vendor-supplied reason.
        message: String,
    },
}

impl ProviderError {
    /// Whether this error is a vendor-reported terminal verification state
    /// (expired, reported, or cancelled out-of-band). Terminal errors end
    /// the verification attempt; a fresh number may still succeed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::VerificationExpired | Self::Reported | Self::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_classification() {
        assert!(ProviderError::VerificationExpired.is_terminal());
        assert!(ProviderError::Reported.is_terminal());
        assert!(ProviderError::Cancelled.is_terminal());

        assert!(!ProviderError::NoNumbers.is_terminal());
        assert!(!ProviderError::Unauthorized.is_terminal());
        assert!(
            !ProviderError::MetadataMismatch {
                provider: "daisysms"
            }
            .is_terminal()
        );
    }

    #[test]
    fn test_display_carries_vendor_context() {
        let err = ProviderError::Vendor {
            provider: "smspool",
            message: "unknown status 9".to_string(),
        };
        assert_eq!(err.to_string(), "smspool: unknown status 9");

        let err = ProviderError::Unsupported {
            provider: "truverifi",
            operation: "reuse",
        };
        assert_eq!(err.to_string(), "truverifi does not support reuse");
    }
}
