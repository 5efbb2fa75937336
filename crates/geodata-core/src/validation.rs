//! Shared validation utilities
//!
//! Small pure validation functions used by the store implementations
//! before any entity is persisted.

use thiserror::Error;

/// Errors that can occur during country code validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodeValidationError {
    #[error("Country code is required and cannot be empty")]
    Required,

    #[error("Country code can only contain letters")]
    InvalidFormat,
}

/// Errors that can occur during name validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NameValidationError {
    #[error("Name is required and cannot be empty")]
    Required,
}

/// Errors that can occur during IP address validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IpValidationError {
    #[error("IP address is required and cannot be empty")]
    Required,

    #[error("IP address is not a valid IPv4 or IPv6 literal")]
    InvalidFormat,
}

/// Validate a country code.
///
/// # Rules
/// - Must not be empty
/// - Must contain only letters
pub fn validate_country_code(code: &str) -> Result<(), CodeValidationError> {
    if code.is_empty() {
        return Err(CodeValidationError::Required);
    }

    if !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CodeValidationError::InvalidFormat);
    }

    Ok(())
}

/// Validate an entity display name. Must not be empty.
pub fn validate_name(name: &str) -> Result<(), NameValidationError> {
    if name.is_empty() {
        return Err(NameValidationError::Required);
    }

    Ok(())
}

/// Validate an IP address literal (v4 or v6).
pub fn validate_ip(ip: &str) -> Result<(), IpValidationError> {
    if ip.is_empty() {
        return Err(IpValidationError::Required);
    }

    ip.parse::<std::net::IpAddr>()
        .map(|_| ())
        .map_err(|_| IpValidationError::InvalidFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_country_code() {
        assert!(validate_country_code("SI").is_ok());
        assert!(validate_country_code("cz").is_ok());
        assert_eq!(
            validate_country_code(""),
            Err(CodeValidationError::Required)
        );
        assert_eq!(
            validate_country_code("S1"),
            Err(CodeValidationError::InvalidFormat)
        );
        assert_eq!(
            validate_country_code("S I"),
            Err(CodeValidationError::InvalidFormat)
        );
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Nepal").is_ok());
        assert_eq!(validate_name(""), Err(NameValidationError::Required));
    }

    #[test]
    fn test_validate_ip() {
        assert!(validate_ip("200.106.141.15").is_ok());
        assert!(validate_ip("2001:db8::1").is_ok());
        assert_eq!(validate_ip(""), Err(IpValidationError::Required));
        assert_eq!(
            validate_ip("not-an-ip"),
            Err(IpValidationError::InvalidFormat)
        );
        assert_eq!(
            validate_ip("999.0.0.1"),
            Err(IpValidationError::InvalidFormat)
        );
    }
}
