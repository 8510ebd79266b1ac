//! Wire types for the TextVerified API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response from `SimpleAuthentication`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthDetails {
    /// Short-lived bearer token for subsequent requests.
    pub bearer_token: String,
    /// When the token lapses.
    pub expiration: DateTime<Utc>,
    /// Vendor-side tick count for the expiration, unused here.
    #[serde(default)]
    pub ticks: i64,
}

/// Body for `POST Verifications`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateVerificationRequest {
    pub(crate) id: i64,
}

/// A verification as reported by `POST Verifications` and
/// `GET Verifications/{id}`. Unused vendor fields (target name, cost,
/// reuse window, action URIs) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VerificationDetails {
    #[serde(default)]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) number: String,
    #[serde(default)]
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) sms: Option<String>,
}
