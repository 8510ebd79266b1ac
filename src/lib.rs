//! # SMS Verify
//!
//! Disposable phone number verification with interchangeable SMS providers.
//!
//! This library leases one-time phone numbers from third-party
//! SMS-verification vendors, polls for an incoming message matching an
//! application-supplied predicate, and releases the number back to the
//! vendor according to how the attempt ended (used, cancelled, reported,
//! expired).
//!
//! ## Supported Providers
//!
//! | Provider | Feature | Website |
//! |----------|---------|---------|
//! | Daisy SMS | `daisy-sms` | <https://daisysms.com> |
//! | SMS-Man | `sms-man` | <https://sms-man.com> |
//! | SMSPool | `sms-pool` | <https://smspool.net> |
//! | SMSPVA | `sms-pva` | <https://smspva.com> |
//! | TextVerified | `text-verified` | <https://www.textverified.com> |
//! | TruVerifi | `tru-verifi` | <https://truverifi.com> |
//!
//! All provider features are enabled by default.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sms_verify::{Matcher, Provider};
//! use sms_verify::providers::daisy_sms::{DaisySms, DaisySmsProvider};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DaisySms::with_api_key("your_api_key")?;
//!     let provider = DaisySmsProvider::new(client);
//!
//!     // Lease a number for the vendor's WhatsApp service code.
//!     let mut number = provider.get_phone_number("wa", "US").await?;
//!     println!("Got number: {}", number);
//!
//!     // Wait for a message carrying a six-digit code.
//!     let matcher = Matcher::new(|message: &str| {
//!         let code: String = message.chars().filter(|c| c.is_ascii_digit()).collect();
//!         (code.len() == 6).then_some(code)
//!     })
//!     .with_poll_interval(Duration::from_secs(3))
//!     .with_timeout(Duration::from_secs(120));
//!
//!     let code = matcher.wait_for_message(&provider, &mut number).await?;
//!     println!("Got code: {}", code);
//!
//!     // The engine releases the number on every failure path; a matched
//!     // number is finalized by the caller.
//!     provider.cancel_phone_number(&mut number).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Matcher  (polls, matches, enforces deadline + cleanup)
//!    │
//!    ▼
//! Provider (trait: DaisySmsProvider, SmsPoolProvider, ...)
//!    │
//!    ▼
//! vendor HTTP client  (one per adapter, owns the wire format)
//! ```
//!
//! A number's state lives only for the duration of one verification
//! attempt; nothing is persisted across processes.
//!
//! ## Features
//!
//! - one feature per provider (see table above), all on by default
//! - `tracing` - OpenTelemetry tracing instrumentation (enabled by default)

pub mod errors;
pub mod matcher;
pub mod provider;
pub mod providers;
pub mod types;
mod utils;

// Re-export commonly used types at the crate root
pub use errors::ProviderError;
pub use matcher::{Matcher, WaitError};
pub use provider::Provider;
pub use types::{DialCode, DialCodeError, Metadata, Number, NumberError, PhoneNumber};
pub use utils::phone::PhoneParseError;
pub use utils::retry::RetryConfig;

// Cancellation and country handling are part of the public surface.
pub use keshvar::Country;
pub use tokio_util::sync::CancellationToken;
