//! SMSPVA adapter (<https://smspva.com>).
//!
//! JSON over a single `priemnik.php` endpoint selected by a `metod` query
//! parameter. Polling for a message re-sends the service and country, so
//! the order metadata keeps both. The vendor has no cancellation call;
//! releasing a number is a no-op.

mod client;
mod provider;
mod types;

pub use client::{DEFAULT_API_URL, SmsPva};
pub use provider::{SmsPvaOrder, SmsPvaProvider};
