//! Input parsing and validation
//!
//! Form fields arrive as text. Empty or non-numeric text is absence, not an
//! error; only an impossible calendar date is reported as invalid.

use crate::calendar::DateParts;
use crate::errors::MetricsError;
use crate::types::FormSnapshot;

// ============================================================================
// Field Parsing
// ============================================================================

/// Parse a day or month selector value; empty, zero or garbage is unset
pub fn parse_date_component(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

/// Parse a year selector value; empty, zero or garbage is unset
pub fn parse_year(text: &str) -> Option<i32> {
    text.trim().parse::<i32>().ok().filter(|v| *v > 0)
}

/// Parse a numeric measurement field into a raw value, keeping only positives
pub fn parse_measurement_field(text: &str) -> Option<f64> {
    crate::measurement::Measurement::parse(text).map(|m| m.value())
}

// ============================================================================
// Missing Fields
// ============================================================================

/// Technical names of inputs that are unset in `snapshot`, in form order
pub fn missing_fields(snapshot: &FormSnapshot) -> Vec<&'static str> {
    let checks: [(&'static str, bool); 9] = [
        ("birth_date", snapshot.birth_date().is_complete()),
        ("reference_date", snapshot.reference_date().is_complete()),
        ("sex", snapshot.sex.is_some()),
        ("weight_kg", snapshot.weight().is_some()),
        ("height_cm", snapshot.height().is_some()),
        ("wrist_cm", snapshot.wrist().is_some()),
        ("waist_cm", snapshot.waist().is_some()),
        ("hip_cm", snapshot.hip().is_some()),
        ("body_fat_percent", snapshot.body_fat().is_some()),
    ];

    checks
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(field, _)| field)
        .collect()
}

/// Structural problems in `snapshot`: complete dates that do not exist
pub fn validate_snapshot(snapshot: &FormSnapshot) -> Vec<ValidationError> {
    [
        ("birth_date", snapshot.birth_date()),
        ("reference_date", snapshot.reference_date()),
        ("admission_date", snapshot.admission_date()),
    ]
    .into_iter()
    .filter_map(|(field, parts)| validate_date_parts(field, &parts).err())
    .collect()
}

/// Validate a set of date components; incomplete dates are not an error
pub fn validate_date_parts(field: &str, parts: &DateParts) -> Result<(), ValidationError> {
    match parts.to_date() {
        Some(Err(MetricsError::InvalidDate { year, month, day })) => Err(ValidationError::new(
            field,
            &format!("{:04}-{:02}-{:02} is not a calendar date", year, month, day),
        )),
        Some(Err(other)) => Err(ValidationError::new(field, &other.to_string())),
        _ => Ok(()),
    }
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "birth_date" => "Birth Date",
        "reference_date" => "Measurement Date",
        "admission_date" => "Admission Date",
        "age" => "Age",
        "sex" => "Sex",
        "weight" | "weight_kg" => "Weight",
        "height" | "height_cm" => "Height",
        "wrist" | "wrist_cm" => "Wrist Circumference",
        "waist" | "waist_cm" => "Waist Circumference",
        "hip" | "hip_cm" => "Hip Circumference",
        "body_fat" | "body_fat_percent" => "Body Fat Percentage",
        _ => field_name,
    }
}

/// Convert a list of technical field names to user-friendly labels
pub fn get_missing_fields_labels(fields: &[&str]) -> Vec<String> {
    fields
        .iter()
        .map(|f| get_field_display_label(f).to_string())
        .collect()
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Sex;
    use proptest::prelude::*;

    #[test]
    fn test_parse_date_component() {
        assert_eq!(parse_date_component("15"), Some(15));
        assert_eq!(parse_date_component(" 3 "), Some(3));
        assert_eq!(parse_date_component(""), None);
        assert_eq!(parse_date_component("0"), None);
        assert_eq!(parse_date_component("-2"), None);
        assert_eq!(parse_date_component("mayo"), None);
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("1990"), Some(1990));
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("0"), None);
    }

    #[test]
    fn test_parse_measurement_field() {
        assert_eq!(parse_measurement_field("70.5"), Some(70.5));
        assert_eq!(parse_measurement_field("0"), None);
        assert_eq!(parse_measurement_field("kg"), None);
    }

    #[test]
    fn test_missing_fields_order() {
        let snapshot = FormSnapshot {
            birth_year: Some(1990),
            birth_month: Some(1),
            sex: Some(Sex::Male),
            weight_kg: Some(80.0),
            height_cm: Some(0.0),
            ..Default::default()
        };
        assert_eq!(
            missing_fields(&snapshot),
            vec![
                "birth_date",
                "reference_date",
                "height_cm",
                "wrist_cm",
                "waist_cm",
                "hip_cm",
                "body_fat_percent"
            ]
        );
    }

    #[test]
    fn test_validate_snapshot_reports_impossible_dates() {
        let snapshot = FormSnapshot {
            birth_year: Some(2023),
            birth_month: Some(2),
            birth_day: Some(30),
            reference_year: Some(2024),
            reference_month: Some(1),
            ..Default::default()
        };
        let errors = validate_snapshot(&snapshot);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "birth_date");
        assert_eq!(
            errors[0].user_message(),
            "Birth Date: 2023-02-30 is not a calendar date"
        );
    }

    #[test]
    fn test_validate_snapshot_reports_admission_date() {
        let snapshot = FormSnapshot {
            admission_year: Some(2023),
            admission_month: Some(4),
            admission_day: Some(31),
            ..Default::default()
        };
        let errors = validate_snapshot(&snapshot);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].user_message(),
            "Admission Date: 2023-04-31 is not a calendar date"
        );
    }

    #[test]
    fn test_zero_date_component_is_not_an_error() {
        let snapshot = FormSnapshot {
            birth_year: Some(1990),
            birth_month: Some(3),
            birth_day: Some(0),
            ..Default::default()
        };
        assert!(validate_snapshot(&snapshot).is_empty());
        assert!(missing_fields(&snapshot).contains(&"birth_date"));
    }

    #[test]
    fn test_field_display_labels() {
        assert_eq!(get_field_display_label("reference_date"), "Measurement Date");
        assert_eq!(get_field_display_label("wrist_cm"), "Wrist Circumference");
        assert_eq!(get_field_display_label("body_fat_percent"), "Body Fat Percentage");
        assert_eq!(get_field_display_label("unknown_field"), "unknown_field");
    }

    #[test]
    fn test_validation_error() {
        let err = ValidationError::new("hip_cm", "must be positive");
        assert_eq!(err.display_label, "Hip Circumference");
        assert_eq!(err.user_message(), "Hip Circumference: must be positive");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_date_component_roundtrip(value in 1u32..=31) {
            prop_assert_eq!(parse_date_component(&value.to_string()), Some(value));
        }
    }
}
