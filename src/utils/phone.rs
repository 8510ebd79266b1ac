//! Splitting raw vendor phone strings into calling code + national number.
//!
//! Vendors return numbers in whatever shape their backend produces
//! ("+13476086155", "380501234567", "7 (900) 123-45-67"). The table of
//! international calling codes is built from `keshvar` at startup and the
//! longest matching prefix wins.

use keshvar::{Country, CountryIterator};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use thiserror::Error;

use crate::types::{DialCode, DialCodeError, Number, NumberError};

/// Error when a raw vendor phone string cannot be normalized.
#[derive(Debug, Clone, Error)]
pub enum PhoneParseError {
    /// The string contains no digits at all.
    #[error("phone number contains no digits")]
    Empty,
    /// No known international calling code prefixes the digits.
    #[error("no known calling code prefixes {digits:?}")]
    UnknownDialCode { digits: String },
    /// The national part failed validation.
    #[error(transparent)]
    Number(#[from] NumberError),
    /// The calling code failed validation.
    #[error(transparent)]
    DialCode(#[from] DialCodeError),
}

/// Calling code digits -> countries sharing that code.
/// Built from keshvar at startup.
static DIAL_CODE2COUNTRIES: Lazy<HashMap<String, Vec<Country>>> = Lazy::new(|| {
    let mut map: HashMap<String, Vec<Country>> = HashMap::new();
    for country in CountryIterator::new() {
        map.entry(country.country_code().to_string())
            .or_default()
            .push(country);
    }
    map
});

/// A raw phone string normalized into its structured parts.
#[derive(Debug, Clone)]
pub(crate) struct ParsedNumber {
    pub(crate) dial_code: DialCode,
    pub(crate) number: Number,
    pub(crate) country: Option<Country>,
}

/// Normalize a raw vendor phone string.
///
/// Non-digit characters are stripped, then the longest known calling-code
/// prefix is split off. The country is resolved only when the calling code
/// belongs to a single country (e.g. "380" is Ukraine, but "1" is shared
/// across the North American numbering plan).
pub(crate) fn parse_full_number(raw: &str) -> Result<ParsedNumber, PhoneParseError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(PhoneParseError::Empty);
    }

    let max_prefix = 4.min(digits.len().saturating_sub(1));
    for len in (1..=max_prefix).rev() {
        let (code, rest) = digits.split_at(len);
        let Some(countries) = DIAL_CODE2COUNTRIES.get(code) else {
            continue;
        };

        let dial_code = DialCode::new(code)?;
        let number = Number::new(rest)?;
        let country = match countries.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        };

        return Ok(ParsedNumber {
            dial_code,
            number,
            country,
        });
    }

    Err(PhoneParseError::UnknownDialCode { digits })
}

#[cfg(test)]
mod tests {
    use super::*;
    use keshvar::Alpha2;

    #[test]
    fn test_table_populated() {
        assert!(!DIAL_CODE2COUNTRIES.is_empty());
        assert!(DIAL_CODE2COUNTRIES.contains_key("1"));
        assert!(DIAL_CODE2COUNTRIES.contains_key("380"));
        assert!(DIAL_CODE2COUNTRIES.contains_key("44"));
    }

    #[test]
    fn test_parse_unambiguous_code() {
        let parsed = parse_full_number("380501234567").unwrap();
        assert_eq!(parsed.dial_code.as_str(), "380");
        assert_eq!(parsed.number.as_str(), "501234567");
        assert_eq!(parsed.country.map(|c| c.alpha2()), Some(Alpha2::UA));
    }

    #[test]
    fn test_parse_shared_code_leaves_country_open() {
        let parsed = parse_full_number("+13476086155").unwrap();
        assert_eq!(parsed.dial_code.as_str(), "1");
        assert_eq!(parsed.number.as_str(), "3476086155");
        // "+1" is the whole North American numbering plan.
        assert!(parsed.country.is_none());
    }

    #[test]
    fn test_parse_strips_formatting() {
        let parsed = parse_full_number("+44 7700 900123").unwrap();
        assert_eq!(parsed.dial_code.as_str(), "44");
        assert_eq!(parsed.number.as_str(), "7700900123");
    }

    #[test]
    fn test_parse_prefers_longest_prefix() {
        // "3" is not a calling code on its own; "380" must win over
        // falling back to shorter guesses.
        let parsed = parse_full_number("380957770001").unwrap();
        assert_eq!(parsed.dial_code.as_str(), "380");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            parse_full_number("not a number"),
            Err(PhoneParseError::Empty)
        ));
    }
}
