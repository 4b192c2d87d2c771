//! Invite code strings.

use rand::distr::{Alphanumeric, SampleString};

use crate::domain::foundation::ValidationError;

/// Default length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 8;

const MAX_CODE_LENGTH: usize = 64;

/// Generates a code drawn uniformly from `[A-Za-z0-9]`.
pub fn generate_code(length: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), length)
}

/// Validates an administrator-chosen code.
///
/// Codes are case-sensitive and may contain ASCII letters, digits, `-` and `_`.
pub fn validate_code(code: &str) -> Result<String, ValidationError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ValidationError::empty_field("code"));
    }
    if code.len() > MAX_CODE_LENGTH {
        return Err(ValidationError::out_of_range(
            "code_length",
            1,
            MAX_CODE_LENGTH as i64,
            code.len() as i64,
        ));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::invalid_format(
            "code",
            "letters, digits, '-' and '_' only",
        ));
    }
    Ok(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn generated_code_has_requested_length() {
        let code = generate_code(DEFAULT_CODE_LENGTH);
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generated_codes_differ() {
        assert_ne!(generate_code(16), generate_code(16));
    }

    #[test]
    fn validate_trims_and_keeps_case() {
        assert_eq!(validate_code("  Summer-2024 ").unwrap(), "Summer-2024");
    }

    #[test]
    fn validate_rejects_empty_and_symbols() {
        assert!(matches!(
            validate_code("   "),
            Err(ValidationError::EmptyField { .. })
        ));
        assert!(matches!(
            validate_code("drop table;"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_code(&"a".repeat(65)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    proptest! {
        #[test]
        fn generated_codes_always_validate(len in 6usize..=32) {
            let code = generate_code(len);
            prop_assert_eq!(code.len(), len);
            prop_assert_eq!(validate_code(&code).unwrap(), code);
        }
    }
}
