//! Vendor adapters implementing the [`Provider`](crate::provider::Provider)
//! contract.
//!
//! Each adapter owns its vendor's wire format end to end: URL scheme, JSON
//! vs delimited-text bodies, auth headers, and rate-limit handling. The
//! rest of the crate only ever sees the uniform lifecycle contract.

#[cfg(feature = "daisy-sms")]
pub mod daisy_sms;
#[cfg(feature = "sms-man")]
pub mod sms_man;
#[cfg(feature = "sms-pool")]
pub mod sms_pool;
#[cfg(feature = "sms-pva")]
pub mod sms_pva;
#[cfg(feature = "text-verified")]
pub mod text_verified;
#[cfg(feature = "tru-verifi")]
pub mod tru_verifi;
