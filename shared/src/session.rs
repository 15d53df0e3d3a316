//! Form session: field-change driven recomputation
//!
//! Holds the current input snapshot and outputs of the form. Each setter
//! updates one input and recomputes only the calculators that depend on it.
//! Age is always refreshed before body fat, which reads the age output.

use crate::body_fat::{body_fat_result, BodyFatResult};
use crate::calendar::{compute_age, AgeBreakdown, CalendarDate, DateParts};
use crate::errors::{MetricsError, MetricsResult};
use crate::health_metrics::{
    bmi_result, frame_result, waist_hip_result, BmiResult, FrameResult, WaistHipResult,
};
use crate::measurement::Sex;
use crate::types::{FormReport, FormSnapshot};
use crate::validation::validate_snapshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Group of fields cleared together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormSection {
    /// Birth date, measurement date and sex
    PersonalData,
    /// Weight, height, wrist, waist and hip
    BodyMeasurements,
    /// Body-fat percentage
    BodyComposition,
}

impl std::str::FromStr for FormSection {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "personal_data" => Ok(FormSection::PersonalData),
            "body_measurements" => Ok(FormSection::BodyMeasurements),
            "body_composition" => Ok(FormSection::BodyComposition),
            _ => Err(MetricsError::InvalidInput(format!(
                "Unknown form section: {}",
                s
            ))),
        }
    }
}

/// Computed outputs; `None` means the output field is blank
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FormOutputs {
    pub age: Option<AgeBreakdown>,
    pub bmi: Option<BmiResult>,
    pub frame: Option<FrameResult>,
    pub waist_hip: Option<WaistHipResult>,
    pub body_fat: Option<BodyFatResult>,
}

impl FormOutputs {
    /// Compute every output from scratch
    ///
    /// An impossible date or a reference before birth leaves age blank; the
    /// error is returned alongside so the caller can report it.
    pub fn evaluate(snapshot: &FormSnapshot) -> (Self, Option<MetricsError>) {
        let (age, age_error) = match age_from_parts(snapshot.birth_date(), snapshot.reference_date()) {
            Some(Ok(age)) => (Some(age), None),
            Some(Err(err)) => (None, Some(err)),
            None => (None, None),
        };

        let outputs = Self {
            age,
            bmi: bmi_for(snapshot),
            frame: frame_for(snapshot),
            waist_hip: waist_hip_for(snapshot),
            body_fat: body_fat_for(snapshot, age),
        };
        (outputs, age_error)
    }
}

/// Evaluate a full snapshot into a rendered report
pub fn evaluate(snapshot: &FormSnapshot) -> FormReport {
    let (outputs, age_error) = FormOutputs::evaluate(snapshot);
    FormReport::new(&outputs, snapshot, report_errors(snapshot, age_error.as_ref()))
}

/// User-facing messages for impossible dates and a failed age calculation
fn report_errors(snapshot: &FormSnapshot, age_error: Option<&MetricsError>) -> Vec<String> {
    let mut errors: Vec<String> = validate_snapshot(snapshot)
        .iter()
        .map(|e| e.user_message())
        .collect();
    // Impossible dates are already listed with their field label
    if let Some(err) = age_error.filter(|e| !matches!(e, MetricsError::InvalidDate { .. })) {
        errors.push(err.to_string());
    }
    errors
}

fn age_from_parts(birth: DateParts, reference: DateParts) -> Option<MetricsResult<AgeBreakdown>> {
    let birth = birth.to_date()?;
    let reference = reference.to_date()?;
    Some(birth.and_then(|birth| reference.and_then(|reference| compute_age(birth, reference))))
}

fn bmi_for(inputs: &FormSnapshot) -> Option<BmiResult> {
    Some(bmi_result(inputs.weight()?, inputs.height()?))
}

fn frame_for(inputs: &FormSnapshot) -> Option<FrameResult> {
    Some(frame_result(inputs.height()?, inputs.wrist()?, inputs.sex))
}

fn waist_hip_for(inputs: &FormSnapshot) -> Option<WaistHipResult> {
    Some(waist_hip_result(inputs.waist()?, inputs.hip()?, inputs.sex))
}

fn body_fat_for(inputs: &FormSnapshot, age: Option<AgeBreakdown>) -> Option<BodyFatResult> {
    Some(body_fat_result(
        inputs.body_fat()?,
        age.map(|a| a.years),
        inputs.sex,
    ))
}

// ============================================================================
// Session
// ============================================================================

/// Live state of one form
#[derive(Debug, Clone, Default)]
pub struct FormSession {
    inputs: FormSnapshot,
    outputs: FormOutputs,
    /// Why the current dates give no age, if they are complete but unusable
    age_error: Option<MetricsError>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a snapshot, computing every output
    pub fn from_snapshot(snapshot: FormSnapshot) -> Self {
        let (outputs, age_error) = FormOutputs::evaluate(&snapshot);
        Self {
            inputs: snapshot,
            outputs,
            age_error,
        }
    }

    pub fn inputs(&self) -> &FormSnapshot {
        &self.inputs
    }

    pub fn outputs(&self) -> &FormOutputs {
        &self.outputs
    }

    pub fn report(&self) -> FormReport {
        let errors = report_errors(&self.inputs, self.age_error.as_ref());
        FormReport::new(&self.outputs, &self.inputs, errors)
    }

    // ------------------------------------------------------------------------
    // Dates and sex
    // ------------------------------------------------------------------------

    pub fn set_birth_year(&mut self, year: Option<i32>) -> MetricsResult<()> {
        self.inputs.birth_year = year;
        self.refresh_age()
    }

    pub fn set_birth_month(&mut self, month: Option<u32>) -> MetricsResult<()> {
        self.inputs.birth_month = month;
        self.refresh_age()
    }

    pub fn set_birth_day(&mut self, day: Option<u32>) -> MetricsResult<()> {
        self.inputs.birth_day = day;
        self.refresh_age()
    }

    pub fn set_reference_year(&mut self, year: Option<i32>) -> MetricsResult<()> {
        self.inputs.reference_year = year;
        self.refresh_age()
    }

    pub fn set_reference_month(&mut self, month: Option<u32>) -> MetricsResult<()> {
        self.inputs.reference_month = month;
        self.refresh_age()
    }

    pub fn set_reference_day(&mut self, day: Option<u32>) -> MetricsResult<()> {
        self.inputs.reference_day = day;
        self.refresh_age()
    }

    pub fn set_birth_date(&mut self, date: CalendarDate) -> MetricsResult<()> {
        self.inputs.set_birth_date(date.into());
        self.refresh_age()
    }

    /// Fill the measurement date, e.g. with today's date
    pub fn set_reference_date(&mut self, date: CalendarDate) -> MetricsResult<()> {
        self.inputs.set_reference_date(date.into());
        self.refresh_age()
    }

    pub fn set_admission_year(&mut self, year: Option<i32>) -> MetricsResult<()> {
        self.inputs.admission_year = year;
        self.check_admission_date()
    }

    pub fn set_admission_month(&mut self, month: Option<u32>) -> MetricsResult<()> {
        self.inputs.admission_month = month;
        self.check_admission_date()
    }

    pub fn set_admission_day(&mut self, day: Option<u32>) -> MetricsResult<()> {
        self.inputs.admission_day = day;
        self.check_admission_date()
    }

    pub fn set_admission_date(&mut self, date: CalendarDate) -> MetricsResult<()> {
        self.inputs.set_admission_date(date.into());
        self.check_admission_date()
    }

    pub fn set_sex(&mut self, sex: Option<Sex>) {
        self.inputs.sex = sex;
        self.refresh_frame();
        self.refresh_waist_hip();
        self.refresh_body_fat();
    }

    // ------------------------------------------------------------------------
    // Measurements
    // ------------------------------------------------------------------------

    pub fn set_weight(&mut self, weight_kg: Option<f64>) {
        self.inputs.weight_kg = weight_kg;
        self.refresh_bmi();
    }

    pub fn set_height(&mut self, height_cm: Option<f64>) {
        self.inputs.height_cm = height_cm;
        self.refresh_bmi();
        self.refresh_frame();
    }

    pub fn set_wrist(&mut self, wrist_cm: Option<f64>) {
        self.inputs.wrist_cm = wrist_cm;
        self.refresh_frame();
    }

    pub fn set_waist(&mut self, waist_cm: Option<f64>) {
        self.inputs.waist_cm = waist_cm;
        self.refresh_waist_hip();
    }

    pub fn set_hip(&mut self, hip_cm: Option<f64>) {
        self.inputs.hip_cm = hip_cm;
        self.refresh_waist_hip();
    }

    pub fn set_body_fat(&mut self, percent: Option<f64>) {
        self.inputs.body_fat_percent = percent;
        self.refresh_body_fat();
    }

    /// Blank every input and output of one section
    pub fn clear_section(&mut self, section: FormSection) {
        debug!(?section, "Clearing form section");
        match section {
            FormSection::PersonalData => {
                self.inputs.set_birth_date(DateParts::default());
                self.inputs.set_reference_date(DateParts::default());
                self.inputs.set_admission_date(DateParts::default());
                self.inputs.sex = None;
                self.outputs.age = None;
                self.age_error = None;
                self.refresh_frame();
                self.refresh_waist_hip();
                self.refresh_body_fat();
            }
            FormSection::BodyMeasurements => {
                self.inputs.weight_kg = None;
                self.inputs.height_cm = None;
                self.inputs.wrist_cm = None;
                self.inputs.waist_cm = None;
                self.inputs.hip_cm = None;
                self.refresh_bmi();
                self.refresh_frame();
                self.refresh_waist_hip();
            }
            FormSection::BodyComposition => {
                self.inputs.body_fat_percent = None;
                self.refresh_body_fat();
            }
        }
    }

    // ------------------------------------------------------------------------
    // Recomputation
    // ------------------------------------------------------------------------

    /// Recompute age once all six date components are set
    ///
    /// While any component is unset the previous age is kept. On an invalid
    /// date the error is returned and every output is left untouched.
    fn refresh_age(&mut self) -> MetricsResult<()> {
        let Some(result) = age_from_parts(self.inputs.birth_date(), self.inputs.reference_date())
        else {
            debug!("Date fields incomplete, keeping previous age");
            self.age_error = None;
            return Ok(());
        };

        match result {
            Ok(age) => {
                debug!(years = age.years, months = age.months, days = age.days, "Age recomputed");
                self.outputs.age = Some(age);
                self.age_error = None;
                self.refresh_body_fat();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Rejected date input");
                self.age_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// The admission date feeds no calculator; only its validity is checked
    fn check_admission_date(&self) -> MetricsResult<()> {
        match self.inputs.admission_date().to_date() {
            Some(Err(err)) => {
                warn!(error = %err, "Rejected admission date");
                Err(err)
            }
            _ => Ok(()),
        }
    }

    fn refresh_bmi(&mut self) {
        self.outputs.bmi = bmi_for(&self.inputs);
        debug!(bmi = ?self.outputs.bmi.map(|b| b.value), "BMI recomputed");
    }

    fn refresh_frame(&mut self) {
        self.outputs.frame = frame_for(&self.inputs);
        debug!(index = ?self.outputs.frame.map(|f| f.index), "Frame index recomputed");
    }

    fn refresh_waist_hip(&mut self) {
        self.outputs.waist_hip = waist_hip_for(&self.inputs);
        debug!(ratio = ?self.outputs.waist_hip.map(|w| w.ratio), "Waist-hip ratio recomputed");
    }

    fn refresh_body_fat(&mut self) {
        self.outputs.body_fat = body_fat_for(&self.inputs, self.outputs.age);
        debug!(
            classification = ?self.outputs.body_fat.map(|b| b.classification),
            "Body fat reclassified"
        );
    }
}
