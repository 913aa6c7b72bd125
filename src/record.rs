// 🧾 Registration Record - normalized, timestamped snapshot of a valid input
// Built once, never mutated afterwards

use crate::registration::RegistrationInput;
use crate::validation::{validate, ValidationError};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Format of the `Registration Date` line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const UNRATED: &str = "Unrated";
pub const NO_EMERGENCY_CONTACT: &str = "Not provided";
pub const NO_NOTES: &str = "None";

/// Field keys in the order they are written to the log
pub const FIELD_KEYS: [&str; 9] = [
    "Name",
    "Email",
    "Phone",
    "Age",
    "Rating",
    "Experience Level",
    "Category",
    "Emergency Contact",
    "Notes",
];

// ============================================================================
// REGISTRATION RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Email")]
    pub email: String,

    #[serde(rename = "Phone")]
    pub phone: String,

    #[serde(rename = "Age")]
    pub age: String,

    #[serde(rename = "Rating")]
    pub rating: String,

    #[serde(rename = "Experience Level")]
    pub experience_level: String,

    #[serde(rename = "Category")]
    pub category: String,

    #[serde(rename = "Emergency Contact")]
    pub emergency_contact: String,

    #[serde(rename = "Notes")]
    pub notes: String,

    #[serde(rename = "Registration Date", with = "timestamp")]
    pub registration_date: NaiveDateTime,
}

impl RegistrationRecord {
    /// Field values paired with their keys, in log order
    pub fn fields(&self) -> [(&'static str, &str); 9] {
        [
            (FIELD_KEYS[0], self.name.as_str()),
            (FIELD_KEYS[1], self.email.as_str()),
            (FIELD_KEYS[2], self.phone.as_str()),
            (FIELD_KEYS[3], self.age.as_str()),
            (FIELD_KEYS[4], self.rating.as_str()),
            (FIELD_KEYS[5], self.experience_level.as_str()),
            (FIELD_KEYS[6], self.category.as_str()),
            (FIELD_KEYS[7], self.emergency_contact.as_str()),
            (FIELD_KEYS[8], self.notes.as_str()),
        ]
    }

    pub fn formatted_date(&self) -> String {
        self.registration_date.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Summary shown to the registrant after a successful submission
    pub fn confirmation_message(&self) -> String {
        let rule = "━".repeat(40);
        let mut message = String::from("✓ Registration Successful!\n\n");
        message.push_str(&format!("{rule}\nREGISTRATION DETAILS\n{rule}\n\n"));
        for (key, value) in self.fields() {
            message.push_str(&format!("  • {}: {}\n", key, value));
        }
        message.push_str(&format!("\n  • Registration Date: {}\n", self.formatted_date()));
        message.push('\n');
        message.push_str(&rule);
        message
    }
}

// ============================================================================
// RECORDER
// ============================================================================

/// Build a record stamped with the current local time.
///
/// Validation is re-run first, so an invalid input can never become a record.
pub fn record(input: &RegistrationInput) -> Result<RegistrationRecord, ValidationError> {
    record_at(input, Local::now().naive_local())
}

/// Same as [`record`] with an explicit capture time
pub fn record_at(
    input: &RegistrationInput,
    registered_at: NaiveDateTime,
) -> Result<RegistrationRecord, ValidationError> {
    validate(input)?;

    // Second precision, so the record equals what the log file can hold
    let registration_date = registered_at.with_nanosecond(0).unwrap_or(registered_at);

    Ok(RegistrationRecord {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
        phone: input.phone.trim().to_string(),
        age: input.age_text.trim().to_string(),
        rating: or_default(&input.rating_text, UNRATED),
        experience_level: input.experience_level.as_str().to_string(),
        category: input
            .tournament_category()
            .map(|category| category.as_str().to_string())
            .unwrap_or_default(),
        emergency_contact: or_default(&input.emergency_contact, NO_EMERGENCY_CONTACT),
        notes: or_default(&input.notes, NO_NOTES),
        registration_date,
    })
}

fn or_default(value: &str, default: &str) -> String {
    match value.trim() {
        "" => default.to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Serde adapter writing the timestamp in log format
mod timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::ExperienceLevel;
    use chrono::NaiveDate;

    fn ada() -> RegistrationInput {
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

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(12, 0, 5, 750)
            .unwrap()
    }

    #[test]
    fn test_record_applies_defaults() {
        let record = record_at(&ada(), noon()).unwrap();

        assert_eq!(record.name, "Ada Lovelace");
        assert_eq!(record.email, "ada@example.com");
        assert_eq!(record.phone, "555-1234");
        assert_eq!(record.age, "30");
        assert_eq!(record.rating, "Unrated");
        assert_eq!(record.experience_level, "Advanced");
        assert_eq!(record.category, "Open");
        assert_eq!(record.emergency_contact, "Not provided");
        assert_eq!(record.notes, "None");
    }

    #[test]
    fn test_record_trims_provided_values() {
        let mut input = ada();
        input.name = "  Ada Lovelace ".to_string();
        input.rating_text = " 1850 ".to_string();
        input.emergency_contact = "\tCharles Babbage 555-0000 ".to_string();
        input.notes = "  Vegetarian lunch  ".to_string();
        input.age_text = " 30".to_string();

        let record = record_at(&input, noon()).unwrap();
        assert_eq!(record.name, "Ada Lovelace");
        assert_eq!(record.rating, "1850");
        assert_eq!(record.emergency_contact, "Charles Babbage 555-0000");
        assert_eq!(record.notes, "Vegetarian lunch");
        assert_eq!(record.age, "30");
    }

    #[test]
    fn test_whitespace_optional_fields_get_defaults() {
        let mut input = ada();
        input.rating_text = "   ".to_string();
        input.notes = "\n".to_string();

        let record = record_at(&input, noon()).unwrap();
        assert_eq!(record.rating, UNRATED);
        assert_eq!(record.notes, NO_NOTES);
    }

    #[test]
    fn test_category_label_is_canonical() {
        let mut input = ada();
        input.category = " women's ".to_string();
        assert_eq!(record_at(&input, noon()).unwrap().category, "Women's");
    }

    #[test]
    fn test_record_refuses_invalid_input() {
        let mut input = ada();
        input.age_text = "4".to_string();
        assert_eq!(record_at(&input, noon()), Err(ValidationError::AgeOutOfRange));
    }

    #[test]
    fn test_timestamp_truncated_to_seconds() {
        let record = record_at(&ada(), noon()).unwrap();
        assert_eq!(record.formatted_date(), "2024-03-09 12:00:05");
        assert_eq!(
            record.registration_date,
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(12, 0, 5).unwrap()
        );
    }

    #[test]
    fn test_fields_in_log_order() {
        let record = record_at(&ada(), noon()).unwrap();
        let keys: Vec<&str> = record.fields().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, FIELD_KEYS.to_vec());
    }

    #[test]
    fn test_confirmation_message() {
        let message = record_at(&ada(), noon()).unwrap().confirmation_message();
        assert!(message.starts_with("✓ Registration Successful!"));
        assert!(message.contains("  • Name: Ada Lovelace\n"));
        assert!(message.contains("  • Rating: Unrated\n"));
        assert!(message.contains("  • Registration Date: 2024-03-09 12:00:05\n"));
    }

    #[test]
    fn test_serializes_with_log_keys() {
        let record = record_at(&ada(), noon()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Experience Level"], "Advanced");
        assert_eq!(json["Registration Date"], "2024-03-09 12:00:05");

        let back: RegistrationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
