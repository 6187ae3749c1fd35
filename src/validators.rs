// ✅ Input Validators
// Pure predicates for consumer and bill fields, plus a typed error for
// callers that need to report which field was rejected

use serde::{Deserialize, Serialize};

/// Earliest billing year the register accepts
pub const YEAR_MIN: u32 = 2000;

/// Latest billing year the register accepts
pub const YEAR_MAX: u32 = 2026;

/// Minimum length for a postal address
pub const ADDRESS_MIN_LEN: usize = 7;

/// Exact length of a mobile number
pub const MOBILE_LEN: usize = 10;

// ============================================================================
// PREDICATES
// ============================================================================

/// A mobile number is exactly 10 ASCII digits
pub fn is_valid_mobile(mobile_no: &str) -> bool {
    mobile_no.len() == MOBILE_LEN && mobile_no.bytes().all(|b| b.is_ascii_digit())
}

/// Billing years are bounded to 2000..=2026
pub fn is_valid_year(year: u32) -> bool {
    (YEAR_MIN..=YEAR_MAX).contains(&year)
}

/// Calendar months only
pub fn is_valid_month(month: u32) -> bool {
    (1..=12).contains(&month)
}

/// An address is non-empty and at least 7 characters
pub fn is_valid_address(address: &str) -> bool {
    !address.is_empty() && address.chars().count() >= ADDRESS_MIN_LEN
}

/// Consumer IDs are positive integers assigned by the operator
pub fn is_valid_consumer_id(consumer_id: u32) -> bool {
    consumer_id > 0
}

/// A name must contain at least one non-whitespace character
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty()
}

// ============================================================================
// FIELD ERROR
// ============================================================================

/// Which field failed validation
///
/// Returned by the whole-record validators below so the API server can
/// answer with a per-field message instead of a bare boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldError {
    InvalidConsumerId,
    InvalidName,
    InvalidAddress,
    InvalidMobile,
    InvalidMonth,
    InvalidYear,
    InvalidUnits,
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::InvalidConsumerId => "consumer_id",
            FieldError::InvalidName => "name",
            FieldError::InvalidAddress => "address",
            FieldError::InvalidMobile => "mobile_no",
            FieldError::InvalidMonth => "month",
            FieldError::InvalidYear => "year",
            FieldError::InvalidUnits => "units_consumed",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FieldError::InvalidConsumerId => "Consumer ID must be a positive integer",
            FieldError::InvalidName => "Name must not be blank",
            FieldError::InvalidAddress => "Address must be at least 7 characters",
            FieldError::InvalidMobile => "Mobile number must be exactly 10 digits",
            FieldError::InvalidMonth => "Month must be between 1 and 12",
            FieldError::InvalidYear => "Year must be between 2000 and 2026",
            FieldError::InvalidUnits => "Units consumed must be greater than zero",
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field(), self.message())
    }
}

impl std::error::Error for FieldError {}

/// Validate every field of a registration request
///
/// First failing field wins; the order matches the registration prompts.
pub fn validate_registration(
    consumer_id: u32,
    name: &str,
    address: &str,
    mobile_no: &str,
) -> Result<(), FieldError> {
    if !is_valid_consumer_id(consumer_id) {
        return Err(FieldError::InvalidConsumerId);
    }
    if !is_valid_name(name) {
        return Err(FieldError::InvalidName);
    }
    if !is_valid_address(address) {
        return Err(FieldError::InvalidAddress);
    }
    if !is_valid_mobile(mobile_no) {
        return Err(FieldError::InvalidMobile);
    }
    Ok(())
}

/// Validate every field of a bill entry request
pub fn validate_bill_entry(
    consumer_id: u32,
    month: u32,
    year: u32,
    units_consumed: u32,
) -> Result<(), FieldError> {
    if !is_valid_consumer_id(consumer_id) {
        return Err(FieldError::InvalidConsumerId);
    }
    if !is_valid_month(month) {
        return Err(FieldError::InvalidMonth);
    }
    if !is_valid_year(year) {
        return Err(FieldError::InvalidYear);
    }
    if units_consumed == 0 {
        return Err(FieldError::InvalidUnits);
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_mobile() {
        assert!(is_valid_mobile("1234567890"));
        assert!(is_valid_mobile("0000000000"));
    }

    #[test]
    fn test_invalid_mobile_wrong_length() {
        assert!(!is_valid_mobile("12345"));
        assert!(!is_valid_mobile("12345678901"));
        assert!(!is_valid_mobile(""));
    }

    #[test]
    fn test_invalid_mobile_non_digit() {
        assert!(!is_valid_mobile("12345abcde"));
        assert!(!is_valid_mobile("123-456-78"));
        assert!(!is_valid_mobile("१२३४५६७८९०")); // non-ASCII digits rejected
    }

    #[test]
    fn test_valid_year_bounds() {
        assert!(is_valid_year(2000));
        assert!(is_valid_year(2026));
        assert!(is_valid_year(2013));

        assert!(!is_valid_year(1999));
        assert!(!is_valid_year(2027));
        assert!(!is_valid_year(0));
    }

    #[test]
    fn test_valid_month_bounds() {
        assert!(is_valid_month(1));
        assert!(is_valid_month(12));

        assert!(!is_valid_month(0));
        assert!(!is_valid_month(13));
    }

    #[test]
    fn test_valid_address() {
        assert!(is_valid_address("12 Main St"));
        assert!(is_valid_address("Sector7")); // exactly 7 chars

        assert!(!is_valid_address(""));
        assert!(!is_valid_address("Main"));
    }

    #[test]
    fn test_valid_consumer_id() {
        assert!(is_valid_consumer_id(1));
        assert!(is_valid_consumer_id(101));
        assert!(!is_valid_consumer_id(0));
    }

    #[test]
    fn test_valid_name() {
        assert!(is_valid_name("Asha Rao"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("   "));
    }

    #[test]
    fn test_validate_registration_first_failure_wins() {
        assert_eq!(
            validate_registration(0, "", "x", "y"),
            Err(FieldError::InvalidConsumerId)
        );
        assert_eq!(
            validate_registration(101, "", "12 Main Street", "1234567890"),
            Err(FieldError::InvalidName)
        );
        assert_eq!(
            validate_registration(101, "Asha Rao", "Main", "1234567890"),
            Err(FieldError::InvalidAddress)
        );
        assert_eq!(
            validate_registration(101, "Asha Rao", "12 Main Street", "12345"),
            Err(FieldError::InvalidMobile)
        );
        assert_eq!(
            validate_registration(101, "Asha Rao", "12 Main Street", "1234567890"),
            Ok(())
        );
    }

    #[test]
    fn test_validate_bill_entry() {
        assert_eq!(validate_bill_entry(101, 3, 2024, 120), Ok(()));
        assert_eq!(
            validate_bill_entry(101, 13, 2024, 120),
            Err(FieldError::InvalidMonth)
        );
        assert_eq!(
            validate_bill_entry(101, 3, 1999, 120),
            Err(FieldError::InvalidYear)
        );
        assert_eq!(
            validate_bill_entry(101, 3, 2024, 0),
            Err(FieldError::InvalidUnits)
        );
    }

    #[test]
    fn test_field_error_display() {
        let err = FieldError::InvalidMobile;
        assert_eq!(err.field(), "mobile_no");
        assert!(err.to_string().contains("10 digits"));
    }
}
