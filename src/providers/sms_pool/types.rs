//! Wire types for the SMSPool API.

use serde::{Deserialize, Serialize};

/// Query for `purchase/sms`.
#[derive(Debug, Serialize)]
pub(crate) struct PurchaseQuery<'a> {
    pub(crate) key: &'a str,
    pub(crate) country: &'a str,
    pub(crate) service: i64,
}

/// Query for `sms/check` and `sms/cancel`.
#[derive(Debug, Serialize)]
pub(crate) struct OrderQuery<'a> {
    pub(crate) key: &'a str,
    pub(crate) orderid: &'a str,
}

/// Response from `purchase/sms`. Unused vendor fields (country, pool,
/// cost, expiry) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PurchaseResponse {
    #[serde(default)]
    pub(crate) success: i64,
    #[serde(default)]
    pub(crate) number: String,
    #[serde(default)]
    pub(crate) order_id: String,
    #[serde(default)]
    pub(crate) message: String,
}

/// Response from `sms/check` and `sms/cancel`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CheckResponse {
    #[serde(default)]
    pub(crate) success: i64,
    #[serde(default)]
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) status: i64,
    #[serde(default)]
    pub(crate) full_sms: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_query_encoding() {
        let query = PurchaseQuery {
            key: "k",
            country: "US",
            service: 365,
        };
        assert_eq!(
            serde_urlencoded::to_string(&query).unwrap(),
            "key=k&country=US&service=365"
        );
    }

    #[test]
    fn test_check_response_defaults() {
        let resp: CheckResponse = serde_json::from_str(r#"{"success": 1, "status": 1}"#).unwrap();
        assert_eq!(resp.status, 1);
        assert!(resp.full_sms.is_empty());
    }
}
