//! Form snapshot and report types
//!
//! These are the structured values exchanged with the page bindings and the
//! batch evaluator. The snapshot is flat so it reads from both JSON and CSV.

use crate::calendar::DateParts;
use crate::measurement::{format_fixed, measurement, Measurement, Sex};
use crate::session::FormOutputs;
use crate::validation::{
    get_missing_fields_labels, missing_fields, parse_date_component, parse_measurement_field,
    parse_year,
};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Decimals shown for the body-fat percentage
pub const BODY_FAT_DECIMALS: usize = 1;

// ============================================================================
// Input Snapshot
// ============================================================================

/// Every input field of the form; unset fields are `None`
///
/// Fields accept numbers or form text. Blank, zero, negative or non-numeric
/// values deserialize as unset, so one bad field only blanks its own output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSnapshot {
    #[serde(deserialize_with = "deserialize_lenient_year")]
    pub birth_year: Option<i32>,
    #[serde(deserialize_with = "deserialize_lenient_component")]
    pub birth_month: Option<u32>,
    #[serde(deserialize_with = "deserialize_lenient_component")]
    pub birth_day: Option<u32>,
    #[serde(deserialize_with = "deserialize_lenient_year")]
    pub reference_year: Option<i32>,
    #[serde(deserialize_with = "deserialize_lenient_component")]
    pub reference_month: Option<u32>,
    #[serde(deserialize_with = "deserialize_lenient_component")]
    pub reference_day: Option<u32>,
    /// Admission date; recorded with the form, no calculator reads it
    #[serde(deserialize_with = "deserialize_lenient_year")]
    pub admission_year: Option<i32>,
    #[serde(deserialize_with = "deserialize_lenient_component")]
    pub admission_month: Option<u32>,
    #[serde(deserialize_with = "deserialize_lenient_component")]
    pub admission_day: Option<u32>,
    #[serde(deserialize_with = "deserialize_lenient_sex")]
    pub sex: Option<Sex>,
    #[serde(deserialize_with = "deserialize_lenient_measurement")]
    pub weight_kg: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_measurement")]
    pub height_cm: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_measurement")]
    pub wrist_cm: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_measurement")]
    pub waist_cm: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_measurement")]
    pub hip_cm: Option<f64>,
    #[serde(deserialize_with = "deserialize_lenient_measurement")]
    pub body_fat_percent: Option<f64>,
}

impl FormSnapshot {
    pub fn birth_date(&self) -> DateParts {
        DateParts::new(self.birth_year, self.birth_month, self.birth_day)
    }

    pub fn reference_date(&self) -> DateParts {
        DateParts::new(self.reference_year, self.reference_month, self.reference_day)
    }

    pub fn set_birth_date(&mut self, parts: DateParts) {
        self.birth_year = parts.year;
        self.birth_month = parts.month;
        self.birth_day = parts.day;
    }

    pub fn set_reference_date(&mut self, parts: DateParts) {
        self.reference_year = parts.year;
        self.reference_month = parts.month;
        self.reference_day = parts.day;
    }

    pub fn admission_date(&self) -> DateParts {
        DateParts::new(self.admission_year, self.admission_month, self.admission_day)
    }

    pub fn set_admission_date(&mut self, parts: DateParts) {
        self.admission_year = parts.year;
        self.admission_month = parts.month;
        self.admission_day = parts.day;
    }

    pub fn weight(&self) -> Option<Measurement> {
        measurement(self.weight_kg)
    }

    pub fn height(&self) -> Option<Measurement> {
        measurement(self.height_cm)
    }

    pub fn wrist(&self) -> Option<Measurement> {
        measurement(self.wrist_cm)
    }

    pub fn waist(&self) -> Option<Measurement> {
        measurement(self.waist_cm)
    }

    pub fn hip(&self) -> Option<Measurement> {
        measurement(self.hip_cm)
    }

    pub fn body_fat(&self) -> Option<Measurement> {
        measurement(self.body_fat_percent)
    }
}

// ============================================================================
// Lenient Field Decoding
// ============================================================================

/// A field as it arrives from JSON or a CSV cell
enum FieldValue {
    Number(f64),
    Text(String),
    Blank,
}

struct FieldValueVisitor;

impl<'de> Visitor<'de> for FieldValueVisitor {
    type Value = FieldValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, text or null")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(FieldValue::Blank)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(FieldValue::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(FieldValue::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(FieldValue::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(FieldValue::Text(v.to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(FieldValue::Blank)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(FieldValue::Blank)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

fn field_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FieldValue, D::Error> {
    deserializer.deserialize_any(FieldValueVisitor)
}

/// Positive whole number, as date selectors hold
fn positive_whole(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value > 0.0).then_some(value as i64)
}

fn deserialize_lenient_measurement<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match field_value(deserializer)? {
        FieldValue::Number(v) => Measurement::new(v).map(Measurement::value),
        FieldValue::Text(text) => parse_measurement_field(&text),
        FieldValue::Blank => None,
    })
}

fn deserialize_lenient_component<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match field_value(deserializer)? {
        FieldValue::Number(v) => positive_whole(v).and_then(|v| u32::try_from(v).ok()),
        FieldValue::Text(text) => parse_date_component(&text),
        FieldValue::Blank => None,
    })
}

fn deserialize_lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match field_value(deserializer)? {
        FieldValue::Number(v) => positive_whole(v).and_then(|v| i32::try_from(v).ok()),
        FieldValue::Text(text) => parse_year(&text),
        FieldValue::Blank => None,
    })
}

/// Unrecognized sex text leaves sex unset instead of failing the whole record
fn deserialize_lenient_sex<'de, D>(deserializer: D) -> Result<Option<Sex>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match field_value(deserializer)? {
        FieldValue::Text(text) => Sex::parse_optional(&text),
        FieldValue::Number(_) | FieldValue::Blank => None,
    })
}

// ============================================================================
// Report
// ============================================================================

/// Rendered age output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeOutput {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub display: String,
}

/// A computed metric as shown in the form's output fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricOutput {
    pub value: f64,
    pub display: String,
    pub category: String,
}

/// Every output of the form, rendered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<AgeOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<MetricOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<MetricOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist_hip: Option<MetricOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<MetricOutput>,
    /// Labels of inputs that are still unset
    #[serde(default)]
    pub missing_fields: Vec<String>,
    /// Structurally invalid input, as user-facing messages
    #[serde(default)]
    pub errors: Vec<String>,
}

impl FormReport {
    /// Render outputs for the inputs they were computed from
    pub fn new(outputs: &FormOutputs, inputs: &FormSnapshot, errors: Vec<String>) -> Self {
        Self {
            age: outputs.age.map(|age| AgeOutput {
                years: age.years,
                months: age.months,
                days: age.days,
                display: age.to_string(),
            }),
            bmi: outputs.bmi.map(|bmi| MetricOutput {
                value: bmi.value,
                display: bmi.display_value(),
                category: bmi.category.description().to_string(),
            }),
            frame: outputs.frame.map(|frame| MetricOutput {
                value: frame.index,
                display: frame.display_index(),
                category: frame.category_label().to_string(),
            }),
            waist_hip: outputs.waist_hip.map(|whr| MetricOutput {
                value: whr.ratio,
                display: whr.display_ratio(),
                category: whr.category_label().to_string(),
            }),
            body_fat: outputs.body_fat.map(|fat| MetricOutput {
                value: fat.percent,
                display: format_fixed(fat.percent, BODY_FAT_DECIMALS),
                category: fat.classification.label().to_string(),
            }),
            missing_fields: get_missing_fields_labels(&missing_fields(inputs)),
            errors,
        }
    }
}
