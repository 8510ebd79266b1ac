//! TruVerifi adapter (<https://truverifi.com>).
//!
//! JSON API built around a single account line: `line/changeService`
//! points the line at a service, and `GET line` returns every SMS it has
//! received. Rate-limited requests (HTTP 429) are retried a bounded number
//! of times on a fixed delay. The vendor supports neither cancellation nor
//! reporting; both are no-ops.

mod client;
mod provider;
mod types;

pub use client::{DEFAULT_API_URL, TruVerifi};
pub use provider::TruVerifiProvider;
