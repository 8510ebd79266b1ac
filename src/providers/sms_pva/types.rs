//! Wire types for the SMSPVA API.

use serde::Deserialize;

/// Response from `metod=get_number`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GetNumberResponse {
    #[serde(default)]
    pub(crate) response: String,
    #[serde(default)]
    pub(crate) number: String,
    #[serde(default, rename = "CountryCode")]
    pub(crate) country_code: String,
    #[serde(default)]
    pub(crate) id: i64,
}

/// Response from `metod=get_sms`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GetSmsResponse {
    #[serde(default)]
    pub(crate) response: String,
    #[serde(default)]
    pub(crate) text: String,
}
