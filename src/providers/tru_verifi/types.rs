//! Wire types for the TruVerifi API.

use serde::{Deserialize, Serialize};

/// Body for `POST line/changeService`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChangeServiceRequest {
    pub(crate) services: Vec<String>,
}

/// Response from `line/changeService`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChangeServiceResponse {
    #[serde(default)]
    pub(crate) error: String,
    #[serde(default)]
    pub(crate) phone_number: String,
}

/// Response from `GET line`. Unused vendor fields (line status, expiry,
/// current services) are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LineResponse {
    #[serde(default)]
    pub(crate) phone_number: String,
    #[serde(default)]
    pub(crate) sms: Vec<LineSms>,
}

/// One SMS on the account line. Only the body is consumed; sender and
/// timing metadata are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LineSms {
    #[serde(default)]
    pub(crate) text: String,
}
