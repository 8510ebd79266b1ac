//! SMS-Man adapter (<https://sms-man.com>).
//!
//! JSON API where every response may carry an `{error_code, error_msg}`
//! envelope; `error_code == "wait_sms"` means "still waiting" and is not a
//! failure. Services and countries are addressed by the vendor's numeric
//! ids, passed through as opaque strings.

mod client;
mod provider;
mod types;

pub use client::{DEFAULT_API_URL, RequestStatus, SmsMan};
pub use provider::{SmsManProvider, SmsManRequest};
