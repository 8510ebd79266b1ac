//! Core types for phone number verification.

use keshvar::Country;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

use crate::utils::phone::{self, PhoneParseError};

// =============================================================================
// DialCode
// =============================================================================

/// Error when parsing a dial code.
#[derive(Debug, Clone, Error)]
pub enum DialCodeError {
    /// Dial code contains non-digit characters.
    #[error("dial code must contain only digits")]
    NonDigit,
    /// Dial code is empty.
    #[error("dial code cannot be empty")]
    Empty,
}

/// International calling code (e.g., "1" for USA, "380" for Ukraine).
///
/// Dial codes are stored without the leading '+' sign.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DialCode(String);

impl DialCode {
    /// Create a new DialCode from a string.
    ///
    /// The input can include a leading '+' which will be stripped.
    pub fn new(s: impl AsRef<str>) -> Result<Self, DialCodeError> {
        let n = s.as_ref().trim().trim_start_matches('+');
        if n.is_empty() {
            return Err(DialCodeError::Empty);
        }
        if !n.chars().all(|c| c.is_ascii_digit()) {
            return Err(DialCodeError::NonDigit);
        }
        Ok(Self(n.to_string()))
    }

    /// Get the dial code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DialCode {
    type Err = DialCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for DialCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Number
// =============================================================================

/// Error when validating a national number.
#[derive(Debug, Clone, Error)]
pub enum NumberError {
    /// Number contains non-digit characters.
    #[error("number must contain only digits")]
    NonDigit,
    /// Number has invalid length.
    #[error("number must be between 4 and 14 digits")]
    InvalidLength,
}

/// National phone number without the international calling code
/// (e.g., "5488242474").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Number(String);

impl Number {
    /// Create a new Number from a string.
    pub fn new(s: impl AsRef<str>) -> Result<Self, NumberError> {
        let s = s.as_ref().trim();
        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(NumberError::NonDigit);
        }
        if !(4..=14).contains(&s.len()) {
            return Err(NumberError::InvalidLength);
        }
        Ok(Self(s.to_string()))
    }

    /// Get the number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Number {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Metadata
// =============================================================================

/// Vendor-side bookkeeping attached to a leased phone number.
///
/// Each variant is owned exclusively by the provider that issued the number;
/// nothing else interprets its contents. Presenting a number to a provider
/// that does not own its variant fails with
/// [`ProviderError::MetadataMismatch`](crate::errors::ProviderError::MetadataMismatch).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Metadata {
    /// Daisy SMS activation handle.
    #[cfg(feature = "daisy-sms")]
    DaisySms(crate::providers::daisy_sms::DaisyActivation),
    /// SMS-Man request handle.
    #[cfg(feature = "sms-man")]
    SmsMan(crate::providers::sms_man::SmsManRequest),
    /// SMSPool order handle.
    #[cfg(feature = "sms-pool")]
    SmsPool(crate::providers::sms_pool::SmsPoolOrder),
    /// SMSPVA order handle.
    #[cfg(feature = "sms-pva")]
    SmsPva(crate::providers::sms_pva::SmsPvaOrder),
    /// TextVerified verification handle.
    #[cfg(feature = "text-verified")]
    TextVerified(crate::providers::text_verified::VerificationRef),
    /// TruVerifi leases a single line per account; there is nothing to track.
    #[cfg(feature = "tru-verifi")]
    TruVerifi,
}

// =============================================================================
// PhoneNumber
// =============================================================================

/// A leased verification number and its lifecycle state.
///
/// Created by a provider's `get_phone_number`, consumed by the wait engine
/// during polling, and released back to the provider via
/// `cancel_phone_number`. The state lives only for the duration of one
/// verification attempt.
#[derive(Debug, Clone)]
pub struct PhoneNumber {
    dial_code: DialCode,
    number: Number,
    country: Option<Country>,
    metadata: Metadata,
    used: bool,
    cancelled: bool,
    ignore_repeated_code: bool,
    last_observed_code: Option<String>,
}

impl PhoneNumber {
    /// Parse a raw vendor phone string into the structured form.
    ///
    /// The string is reduced to its digits and split into an international
    /// calling code and a national number by longest-prefix match against
    /// the known calling codes. The country is resolved when the calling
    /// code maps to exactly one country.
    pub fn parse(raw: &str, metadata: Metadata) -> Result<Self, PhoneParseError> {
        let parsed = phone::parse_full_number(raw)?;
        Ok(Self {
            dial_code: parsed.dial_code,
            number: parsed.number,
            country: parsed.country,
            metadata,
            used: false,
            cancelled: false,
            ignore_repeated_code: false,
            last_observed_code: None,
        })
    }

    /// International calling code of this number.
    pub fn dial_code(&self) -> &DialCode {
        &self.dial_code
    }

    /// National number without the calling code.
    pub fn number(&self) -> &Number {
        &self.number
    }

    /// Country the calling code resolved to, when unambiguous.
    pub fn country(&self) -> Option<&Country> {
        self.country.as_ref()
    }

    /// Full number in E.164 form (e.g., "+380501234567").
    pub fn e164(&self) -> String {
        format!("+{}{}", self.dial_code, self.number)
    }

    /// Whether a verification message has been received on this number.
    pub fn used(&self) -> bool {
        self.used
    }

    /// Whether the number has been released back to the vendor.
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    /// Mark the number as used. One-way: there is no un-marking.
    pub fn mark_used(&mut self) {
        self.used = true;
    }

    /// Mark the number as released. Terminal: no further vendor calls are
    /// made for a cancelled number.
    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub(crate) fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Record a code reported by the vendor.
    ///
    /// Returns `false` when the code is a repeat of the last observed one
    /// and repeats are currently suppressed (after a reuse), in which case
    /// the number is left untouched. Otherwise records the code, marks the
    /// number used and returns `true`.
    pub(crate) fn observe_code(&mut self, code: &str) -> bool {
        if self.ignore_repeated_code && self.last_observed_code.as_deref() == Some(code) {
            return false;
        }
        self.last_observed_code = Some(code.to_string());
        self.used = true;
        true
    }

    /// Suppress the last observed code so the next poll does not re-return
    /// it. Leaves `used` and `cancelled` untouched.
    pub(crate) fn begin_reuse(&mut self) {
        self.ignore_repeated_code = true;
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.e164())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dial_code_valid() {
        assert!(DialCode::new("1").is_ok());
        assert!(DialCode::new("380").is_ok());
        assert!(DialCode::new("44").is_ok());
    }

    #[test]
    fn test_dial_code_with_plus() {
        let dc = DialCode::new("+380").unwrap();
        assert_eq!(dc.as_str(), "380");
    }

    #[test]
    fn test_dial_code_empty() {
        assert!(matches!(DialCode::new(""), Err(DialCodeError::Empty)));
        assert!(matches!(DialCode::new("+"), Err(DialCodeError::Empty)));
    }

    #[test]
    fn test_dial_code_non_digit() {
        assert!(matches!(DialCode::new("12a"), Err(DialCodeError::NonDigit)));
    }

    #[test]
    fn test_number_valid() {
        assert!(Number::new("1234").is_ok());
        assert!(Number::new("5488242474").is_ok());
        assert!(Number::new("12345678901234").is_ok());
    }

    #[test]
    fn test_number_invalid_length() {
        assert!(matches!(Number::new("123"), Err(NumberError::InvalidLength)));
        assert!(matches!(
            Number::new("123456789012345"),
            Err(NumberError::InvalidLength)
        ));
    }

    #[test]
    fn test_number_non_digit() {
        assert!(matches!(Number::new("123a456"), Err(NumberError::NonDigit)));
    }

    #[cfg(feature = "tru-verifi")]
    mod lifecycle {
        use super::*;

        fn leased() -> PhoneNumber {
            PhoneNumber::parse("+380501234567", Metadata::TruVerifi).unwrap()
        }

        #[test]
        fn test_parse_splits_dial_code() {
            let number = leased();
            assert_eq!(number.dial_code().as_str(), "380");
            assert_eq!(number.number().as_str(), "501234567");
            assert_eq!(number.e164(), "+380501234567");
        }

        #[test]
        fn test_fresh_number_is_unused() {
            let number = leased();
            assert!(!number.used());
            assert!(!number.cancelled());
        }

        #[test]
        fn test_observe_code_marks_used() {
            let mut number = leased();
            assert!(number.observe_code("482913"));
            assert!(number.used());
        }

        #[test]
        fn test_repeated_code_not_suppressed_by_default() {
            let mut number = leased();
            assert!(number.observe_code("482913"));
            assert!(number.observe_code("482913"));
        }

        #[test]
        fn test_reuse_suppresses_stale_code_only() {
            let mut number = leased();
            assert!(number.observe_code("482913"));
            number.begin_reuse();
            // Same code again: a stale redelivery, suppressed.
            assert!(!number.observe_code("482913"));
            // A fresh code comes through.
            assert!(number.observe_code("771204"));
            // Reuse never resets the lifecycle flags.
            assert!(number.used());
            assert!(!number.cancelled());
        }

        #[test]
        fn test_mark_cancelled() {
            let mut number = leased();
            number.mark_cancelled();
            assert!(number.cancelled());
        }
    }
}
