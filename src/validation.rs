// 📐 Validation - required fields, email shape, age range
// Rules run in a fixed order and stop at the first failure

use crate::registration::{RegistrationInput, TournamentCategory};
use log::debug;
use std::num::IntErrorKind;

pub const MIN_AGE: i64 = 5;
pub const MAX_AGE: i64 = 100;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter your full name.")]
    MissingName,

    #[error("Please enter your email address.")]
    MissingEmail,

    #[error("Please enter a valid email address.")]
    InvalidEmailFormat,

    #[error("Please enter your phone number.")]
    MissingPhone,

    #[error("Please enter your age.")]
    MissingAge,

    #[error("Age must be a number.")]
    AgeNotNumeric,

    #[error("Please enter a valid age (5-100).")]
    AgeOutOfRange,

    #[error("Please select a tournament category.")]
    MissingCategory,
}

/// Input field a validation rule is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
    Age,
    Category,
}

impl ValidationError {
    /// The field the user should be sent back to
    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingName => Field::Name,
            ValidationError::MissingEmail | ValidationError::InvalidEmailFormat => Field::Email,
            ValidationError::MissingPhone => Field::Phone,
            ValidationError::MissingAge
            | ValidationError::AgeNotNumeric
            | ValidationError::AgeOutOfRange => Field::Age,
            ValidationError::MissingCategory => Field::Category,
        }
    }
}

// ============================================================================
// RULES
// ============================================================================

/// Validate a submission. Only the first violated rule is reported.
pub fn validate(input: &RegistrationInput) -> Result<(), ValidationError> {
    let result = check(input);
    if let Err(err) = &result {
        debug!("registration rejected: {:?}", err);
    }
    result
}

fn check(input: &RegistrationInput) -> Result<(), ValidationError> {
    if input.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }

    let email = input.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !is_email_shaped(email) {
        return Err(ValidationError::InvalidEmailFormat);
    }

    if input.phone.trim().is_empty() {
        return Err(ValidationError::MissingPhone);
    }

    let age_text = input.age_text.trim();
    if age_text.is_empty() {
        return Err(ValidationError::MissingAge);
    }
    let age = parse_age(age_text)?;
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ValidationError::AgeOutOfRange);
    }

    if input.category.trim().parse::<TournamentCategory>().is_err() {
        return Err(ValidationError::MissingCategory);
    }

    Ok(())
}

/// Shape check only: an `@` and a `.` somewhere in the address
pub fn is_email_shaped(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

fn parse_age(text: &str) -> Result<i64, ValidationError> {
    let digits = strip_digit_separators(text).ok_or(ValidationError::AgeNotNumeric)?;
    digits.parse::<i64>().map_err(|err| match err.kind() {
        // Still an integer, just far outside the accepted range
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ValidationError::AgeOutOfRange,
        _ => ValidationError::AgeNotNumeric,
    })
}

/// `1_000` style grouping: each underscore must sit between two digits
fn strip_digit_separators(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'_' {
            let before = i.checked_sub(1).and_then(|j| bytes.get(j));
            let after = bytes.get(i + 1);
            if !before.is_some_and(u8::is_ascii_digit) || !after.is_some_and(u8::is_ascii_digit) {
                return None;
            }
        }
    }
    Some(text.replace('_', ""))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::ExperienceLevel;

    fn create_valid_input() -> RegistrationInput {
        RegistrationInput {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-1234".to_string(),
            age_text: "30".to_string(),
            rating_text: String::new(),
            experience_level: ExperienceLevel::Advanced,
            category: "Open".to_string(),
            emergency_contact: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert_eq!(validate(&create_valid_input()), Ok(()));
    }

    fn blanked(clear: impl FnOnce(&mut RegistrationInput)) -> RegistrationInput {
        let mut input = create_valid_input();
        clear(&mut input);
        input
    }

    #[test]
    fn test_missing_required_fields() {
        let input = blanked(|i| i.name = "   ".to_string());
        assert_eq!(validate(&input), Err(ValidationError::MissingName));

        let input = blanked(|i| i.email = String::new());
        assert_eq!(validate(&input), Err(ValidationError::MissingEmail));

        let input = blanked(|i| i.phone = "\t".to_string());
        assert_eq!(validate(&input), Err(ValidationError::MissingPhone));

        let input = blanked(|i| i.age_text = " ".to_string());
        assert_eq!(validate(&input), Err(ValidationError::MissingAge));

        let input = blanked(|i| i.category = String::new());
        assert_eq!(validate(&input), Err(ValidationError::MissingCategory));
    }

    #[test]
    fn test_first_failure_wins() {
        // Everything is wrong; only the name is reported
        let input = RegistrationInput::default();
        assert_eq!(validate(&input), Err(ValidationError::MissingName));

        // Bad email shadows missing phone, age and category
        let input = RegistrationInput {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            ..Default::default()
        };
        assert_eq!(validate(&input), Err(ValidationError::InvalidEmailFormat));

        // Non-numeric age shadows missing category
        let mut input = create_valid_input();
        input.age_text = "abc".to_string();
        input.category = String::new();
        assert_eq!(validate(&input), Err(ValidationError::AgeNotNumeric));
    }

    #[test]
    fn test_email_shape() {
        let mut input = create_valid_input();

        input.email = "not-an-email".to_string();
        assert_eq!(validate(&input), Err(ValidationError::InvalidEmailFormat));

        input.email = "ada@example".to_string();
        assert_eq!(validate(&input), Err(ValidationError::InvalidEmailFormat));

        input.email = "a@b.c".to_string();
        assert_eq!(validate(&input), Ok(()));

        // Shape check only
        assert!(is_email_shaped("@."));
    }

    #[test]
    fn test_age_rules() {
        let mut input = create_valid_input();

        input.age_text = "abc".to_string();
        assert_eq!(validate(&input), Err(ValidationError::AgeNotNumeric));

        input.age_text = "12.5".to_string();
        assert_eq!(validate(&input), Err(ValidationError::AgeNotNumeric));

        input.age_text = "4".to_string();
        assert_eq!(validate(&input), Err(ValidationError::AgeOutOfRange));

        input.age_text = "101".to_string();
        assert_eq!(validate(&input), Err(ValidationError::AgeOutOfRange));

        input.age_text = "-30".to_string();
        assert_eq!(validate(&input), Err(ValidationError::AgeOutOfRange));

        input.age_text = "5".to_string();
        assert_eq!(validate(&input), Ok(()));

        input.age_text = " 100 ".to_string();
        assert_eq!(validate(&input), Ok(()));
    }

    #[test]
    fn test_age_digit_separators() {
        let mut input = create_valid_input();

        input.age_text = "3_0".to_string();
        assert_eq!(validate(&input), Ok(()));

        input.age_text = "1_0_0".to_string();
        assert_eq!(validate(&input), Ok(()));

        input.age_text = "1_01".to_string();
        assert_eq!(validate(&input), Err(ValidationError::AgeOutOfRange));

        for text in ["_30", "30_", "3__0", "-_30", "_"] {
            input.age_text = text.to_string();
            assert_eq!(validate(&input), Err(ValidationError::AgeNotNumeric), "{}", text);
        }
    }

    #[test]
    fn test_huge_age_is_out_of_range() {
        let mut input = create_valid_input();
        input.age_text = "99999999999999999999999".to_string();
        assert_eq!(validate(&input), Err(ValidationError::AgeOutOfRange));
    }

    #[test]
    fn test_category_must_be_known() {
        let mut input = create_valid_input();
        input.category = "Blitz".to_string();
        assert_eq!(validate(&input), Err(ValidationError::MissingCategory));

        input.category = "Senior (50+)".to_string();
        assert_eq!(validate(&input), Ok(()));
    }

    #[test]
    fn test_optional_fields_are_not_validated() {
        let mut input = create_valid_input();
        input.rating_text = "not a rating".to_string();
        input.emergency_contact = "   ".to_string();
        input.notes = "anything at all".to_string();
        input.experience_level = ExperienceLevel::Expert;
        assert_eq!(validate(&input), Ok(()));
    }

    #[test]
    fn test_error_fields_and_messages() {
        assert_eq!(ValidationError::InvalidEmailFormat.field(), Field::Email);
        assert_eq!(ValidationError::AgeNotNumeric.field(), Field::Age);
        assert_eq!(ValidationError::MissingCategory.field(), Field::Category);
        assert_eq!(
            ValidationError::AgeOutOfRange.to_string(),
            "Please enter a valid age (5-100)."
        );
    }
}
