//! Body Metrics WASM Module
//!
//! WebAssembly bindings used by the measurement form. Field values are
//! passed as the raw text of the form controls; blank or non-numeric text
//! counts as an unset field.

use body_metrics_shared::validation::{parse_date_component, parse_measurement_field, parse_year};
use body_metrics_shared::{
    classify_bmi, classify_body_fat, compute_age, compute_bmi, compute_frame, compute_whr,
    evaluate, CalendarDate, FormSection, FormSession, FormSnapshot, MetricsResult, Sex,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_error)
}

fn local_today() -> CalendarDate {
    CalendarDate::from(chrono::Local::now().date_naive())
}

fn age_display(
    birth: (i32, u32, u32),
    reference: (i32, u32, u32),
) -> MetricsResult<String> {
    let birth = CalendarDate::new(birth.0, birth.1, birth.2)?;
    let reference = CalendarDate::new(reference.0, reference.1, reference.2)?;
    Ok(compute_age(birth, reference)?.to_string())
}

/// Age between two dates as "Y years, M months, D days"
#[wasm_bindgen]
pub fn calculate_age(
    birth_year: i32,
    birth_month: u32,
    birth_day: u32,
    reference_year: i32,
    reference_month: u32,
    reference_day: u32,
) -> Result<String, JsValue> {
    age_display(
        (birth_year, birth_month, birth_day),
        (reference_year, reference_month, reference_day),
    )
    .map_err(js_error)
}

/// BMI from weight (kg) and height (cm); `undefined` when either is not positive
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    compute_bmi(weight_kg, height_cm).map(|bmi| bmi.value)
}

#[wasm_bindgen]
pub fn classify_bmi_value(bmi: f64) -> String {
    classify_bmi(bmi).description().to_string()
}

/// Frame index result as JSON, `null` when height or wrist is absent
#[wasm_bindgen]
pub fn calculate_frame_index(height_cm: f64, wrist_cm: f64, sex: &str) -> Result<String, JsValue> {
    to_json(&compute_frame(height_cm, wrist_cm, Sex::parse_optional(sex)))
}

/// Waist-hip result as JSON, `null` when waist or hip is absent
#[wasm_bindgen]
pub fn calculate_waist_hip_ratio(waist_cm: f64, hip_cm: f64, sex: &str) -> Result<String, JsValue> {
    to_json(&compute_whr(waist_cm, hip_cm, Sex::parse_optional(sex)))
}

/// Body-fat classification label; `undefined` when the percentage is absent
#[wasm_bindgen]
pub fn classify_body_fat_percent(fat_percent: f64, age_years: Option<u32>, sex: &str) -> Option<String> {
    classify_body_fat(fat_percent, age_years, Sex::parse_optional(sex))
        .map(|classification| classification.label().to_string())
}

/// Evaluate a full form snapshot (JSON) into a report (JSON)
#[wasm_bindgen]
pub fn evaluate_form(snapshot_json: &str) -> Result<String, JsValue> {
    let snapshot: FormSnapshot = serde_json::from_str(snapshot_json).map_err(js_error)?;
    to_json(&evaluate(&snapshot))
}

// ============================================================================
// Form Calculator
// ============================================================================

/// Stateful form bound to the page's change events
#[wasm_bindgen]
#[derive(Default)]
pub struct FormCalculator {
    session: FormSession,
}

#[wasm_bindgen]
impl FormCalculator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_birth_day(&mut self, value: &str) -> Result<(), JsValue> {
        self.session.set_birth_day(parse_date_component(value)).map_err(js_error)
    }

    pub fn set_birth_month(&mut self, value: &str) -> Result<(), JsValue> {
        self.session.set_birth_month(parse_date_component(value)).map_err(js_error)
    }

    pub fn set_birth_year(&mut self, value: &str) -> Result<(), JsValue> {
        self.session.set_birth_year(parse_year(value)).map_err(js_error)
    }

    pub fn set_reference_day(&mut self, value: &str) -> Result<(), JsValue> {
        self.session.set_reference_day(parse_date_component(value)).map_err(js_error)
    }

    pub fn set_reference_month(&mut self, value: &str) -> Result<(), JsValue> {
        self.session.set_reference_month(parse_date_component(value)).map_err(js_error)
    }

    pub fn set_reference_year(&mut self, value: &str) -> Result<(), JsValue> {
        self.session.set_reference_year(parse_year(value)).map_err(js_error)
    }

    /// Fill the measurement date with the browser's local date
    pub fn set_reference_today(&mut self) -> Result<(), JsValue> {
        self.session.set_reference_date(local_today()).map_err(js_error)
    }

    pub fn set_admission_day(&mut self, value: &str) -> Result<(), JsValue> {
        self.session.set_admission_day(parse_date_component(value)).map_err(js_error)
    }

    pub fn set_admission_month(&mut self, value: &str) -> Result<(), JsValue> {
        self.session.set_admission_month(parse_date_component(value)).map_err(js_error)
    }

    pub fn set_admission_year(&mut self, value: &str) -> Result<(), JsValue> {
        self.session.set_admission_year(parse_year(value)).map_err(js_error)
    }

    /// Fill the admission date with the browser's local date
    pub fn set_admission_today(&mut self) -> Result<(), JsValue> {
        self.session.set_admission_date(local_today()).map_err(js_error)
    }

    pub fn set_sex(&mut self, value: &str) {
        self.session.set_sex(Sex::parse_optional(value));
    }

    pub fn set_weight(&mut self, value: &str) {
        self.session.set_weight(parse_measurement_field(value));
    }

    pub fn set_height(&mut self, value: &str) {
        self.session.set_height(parse_measurement_field(value));
    }

    pub fn set_wrist(&mut self, value: &str) {
        self.session.set_wrist(parse_measurement_field(value));
    }

    pub fn set_waist(&mut self, value: &str) {
        self.session.set_waist(parse_measurement_field(value));
    }

    pub fn set_hip(&mut self, value: &str) {
        self.session.set_hip(parse_measurement_field(value));
    }

    pub fn set_body_fat(&mut self, value: &str) {
        self.session.set_body_fat(parse_measurement_field(value));
    }

    /// `personal_data`, `body_measurements` or `body_composition`
    pub fn clear_section(&mut self, section: &str) -> Result<(), JsValue> {
        let section: FormSection = section.parse().map_err(js_error)?;
        self.session.clear_section(section);
        Ok(())
    }

    pub fn outputs_json(&self) -> Result<String, JsValue> {
        to_json(&self.session.report())
    }

    pub fn inputs_json(&self) -> Result<String, JsValue> {
        to_json(self.session.inputs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use body_metrics_shared::{FormReport, MetricsError};
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test;

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn test_calculate_age() {
        assert_eq!(
            calculate_age(1990, 3, 15, 2024, 3, 1).unwrap(),
            "33 years, 11 months, 15 days"
        );
    }

    #[test]
    fn test_age_display_rejects_impossible_date() {
        let err = age_display((2023, 2, 29), (2024, 1, 1)).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidDate { .. }));
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn test_bmi() {
        let bmi = calculate_bmi(70.0, 175.0).unwrap();
        assert!((bmi - 22.857).abs() < 0.001);
        assert_eq!(classify_bmi_value(bmi), "Normal weight");
        assert_eq!(calculate_bmi(70.0, 0.0), None);
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn test_frame_and_whr_json() {
        let frame = calculate_frame_index(180.0, 18.0, "male").unwrap();
        assert_eq!(frame, r#"{"index":10.0,"category":"thin"}"#);
        assert_eq!(calculate_frame_index(180.0, 0.0, "male").unwrap(), "null");

        let whr = calculate_waist_hip_ratio(90.0, 100.0, "").unwrap();
        assert_eq!(whr, r#"{"ratio":0.9,"category":null}"#);
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn test_classify_body_fat_percent() {
        assert_eq!(
            classify_body_fat_percent(25.0, Some(35), "female").as_deref(),
            Some("Recommended")
        );
        assert_eq!(
            classify_body_fat_percent(25.0, None, "female").as_deref(),
            Some("insufficient data")
        );
        assert_eq!(classify_body_fat_percent(0.0, Some(35), "female"), None);
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn test_evaluate_form() {
        let json = evaluate_form(r#"{"weight_kg": 70, "height_cm": 175}"#).unwrap();
        let report: FormReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report.bmi.unwrap().display, "22.86");
        assert!(report.age.is_none());
        assert_eq!(report.missing_fields.len(), 7);
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn test_evaluate_form_lenient_fields() {
        let json = evaluate_form(
            r#"{"weight_kg": "abc", "height_cm": "175", "waist_cm": 80, "hip_cm": 100, "birth_day": 0}"#,
        )
        .unwrap();
        let report: FormReport = serde_json::from_str(&json).unwrap();
        assert!(report.bmi.is_none());
        assert_eq!(report.waist_hip.unwrap().display, "0.800");
        assert!(report.errors.is_empty());
        assert!(report.missing_fields.contains(&"Weight".to_string()));
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn test_form_calculator_admission_date() {
        let mut form = FormCalculator::new();
        form.set_admission_day("2").unwrap();
        form.set_admission_month("5").unwrap();
        form.set_admission_year("2024").unwrap();
        let inputs: FormSnapshot = serde_json::from_str(&form.inputs_json().unwrap()).unwrap();
        assert_eq!(inputs.admission_year, Some(2024));
        assert_eq!(inputs.admission_day, Some(2));
    }

    #[cfg_attr(not(target_arch = "wasm32"), test)]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    fn test_form_calculator_flow() {
        let mut form = FormCalculator::new();
        form.set_sex("female");
        form.set_body_fat("25");
        form.set_birth_day("15").unwrap();
        form.set_birth_month("3").unwrap();
        form.set_birth_year("1990").unwrap();
        form.set_reference_day("1").unwrap();
        form.set_reference_month("3").unwrap();
        form.set_reference_year("2024").unwrap();
        form.set_weight("abc");

        let report: FormReport = serde_json::from_str(&form.outputs_json().unwrap()).unwrap();
        assert_eq!(report.age.unwrap().display, "33 years, 11 months, 15 days");
        assert_eq!(report.body_fat.unwrap().category, "Recommended");
        assert!(report.bmi.is_none());
        assert!(report.missing_fields.contains(&"Weight".to_string()));

        form.clear_section("body_composition").unwrap();
        let report: FormReport = serde_json::from_str(&form.outputs_json().unwrap()).unwrap();
        assert!(report.body_fat.is_none());
    }
}
