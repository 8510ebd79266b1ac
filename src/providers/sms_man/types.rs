//! Wire types for the SMS-Man API.

use serde::Deserialize;

use super::client::PROVIDER;
use crate::errors::ProviderError;

/// Error envelope present on every SMS-Man response.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub(crate) error_code: Option<String>,
    #[serde(default)]
    pub(crate) error_msg: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    /// Interpret the envelope; `wait_sms` is the vendor's "no message yet"
    /// signal, not a failure.
    pub(crate) fn failure(&self) -> Option<ProviderError> {
        let code = self.error_code.as_deref()?;
        if code.is_empty() || code == "wait_sms" {
            return None;
        }

        Some(ProviderError::Vendor {
            provider: PROVIDER,
            message: match &self.error_msg {
                Some(msg) => format!("{msg} ({code})"),
                None => format!("({code})"),
            },
        })
    }
}

/// Response from `get-number`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GetNumberResponse {
    #[serde(flatten)]
    pub(crate) error: ErrorEnvelope,
    #[serde(default)]
    pub(crate) request_id: Option<i64>,
    #[serde(default)]
    pub(crate) number: Option<String>,
}

/// Response from `get-sms`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GetSmsResponse {
    #[serde(flatten)]
    pub(crate) error: ErrorEnvelope,
    #[serde(default)]
    pub(crate) sms_code: Option<String>,
}
