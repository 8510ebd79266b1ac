//! Daisy SMS adapter (<https://daisysms.com>).
//!
//! Colon-delimited text protocol over a single `handler_api.php` endpoint.
//! Daisy distinguishes finalizing a used number (status 6) from abandoning
//! an unused one (status 8), and offers a reuse window where the same
//! number can receive another code without repurchase.

mod client;
mod provider;

pub use client::{ActivationStatus, DEFAULT_API_URL, DaisySms};
pub use provider::{DaisyActivation, DaisySmsProvider};
