//! Anthropometric calculations
//!
//! Provides BMI, body frame index and waist-hip ratio together with their
//! category tables.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: every calculator is side-effect free and idempotent
//! 2. **Explicit Absence**: a missing measurement yields `None`, never zero
//! 3. **Data-Driven Categories**: thresholds live in ordered tables
//! 4. **Explicit Context**: sex is a parameter, never shared state

use crate::measurement::{format_fixed, Measurement, Sex};
use crate::thresholds::{Band, ThresholdTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category text reported by sex-conditioned calculators when sex is unset
pub const SEX_REQUIRED: &str = "sex required";

// ============================================================================
// BMI Calculations
// ============================================================================

/// Decimals shown for BMI values
pub const BMI_DECIMALS: usize = 2;

/// Weight-status category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    LowWeight,
    NormalWeight,
    Overweight,
    MildObesity,
    ModerateObesity,
    SevereObesity,
}

impl BmiCategory {
    /// Get the BMI range for this category (inclusive lower, exclusive upper)
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::LowWeight => (0.0, 18.5),
            BmiCategory::NormalWeight => (18.5, 25.0),
            BmiCategory::Overweight => (25.0, 30.0),
            BmiCategory::MildObesity => (30.0, 35.0),
            BmiCategory::ModerateObesity => (35.0, 40.0),
            BmiCategory::SevereObesity => (40.0, f64::INFINITY),
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::LowWeight => "Low weight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::MildObesity => "Mild obesity",
            BmiCategory::ModerateObesity => "Moderate obesity",
            BmiCategory::SevereObesity => "Severe obesity",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// BMI bands, highest first. Anything under 18.50 is low weight.
pub const BMI_TABLE: ThresholdTable<BmiCategory> = ThresholdTable::new(
    &[
        Band::at_least(40.0, BmiCategory::SevereObesity),
        Band::at_least(35.0, BmiCategory::ModerateObesity),
        Band::at_least(30.0, BmiCategory::MildObesity),
        Band::at_least(25.0, BmiCategory::Overweight),
        Band::at_least(18.5, BmiCategory::NormalWeight),
    ],
    BmiCategory::LowWeight,
);

/// BMI calculation result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// Unrounded BMI value
    pub value: f64,
    /// Category derived from the unrounded value
    pub category: BmiCategory,
}

impl BmiResult {
    pub fn display_value(&self) -> String {
        format_fixed(self.value, BMI_DECIMALS)
    }
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight: Measurement, height: Measurement) -> f64 {
    let height_m = height.value() / 100.0;
    weight.value() / (height_m * height_m)
}

/// Classify BMI into category
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    BMI_TABLE.classify(bmi)
}

/// Calculate complete BMI result from present measurements
pub fn bmi_result(weight: Measurement, height: Measurement) -> BmiResult {
    let value = calculate_bmi(weight, height);
    BmiResult {
        value,
        category: classify_bmi(value),
    }
}

/// BMI from raw field values; `None` unless both are present and positive
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Option<BmiResult> {
    let weight = Measurement::new(weight_kg)?;
    let height = Measurement::new(height_cm)?;
    Some(bmi_result(weight, height))
}

// ============================================================================
// Body Frame Calculations
// ============================================================================

/// Decimals shown for the frame index
pub const FRAME_DECIMALS: usize = 2;

/// Skeletal frame size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameCategory {
    Small,
    Thin,
    Normal,
    Medium,
    Large,
    VeryLarge,
}

impl FrameCategory {
    pub fn description(&self) -> &'static str {
        match self {
            FrameCategory::Small => "Small",
            FrameCategory::Thin => "Thin",
            FrameCategory::Normal => "Normal",
            FrameCategory::Medium => "Medium",
            FrameCategory::Large => "Large",
            FrameCategory::VeryLarge => "Very Large",
        }
    }
}

impl fmt::Display for FrameCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

pub const MALE_FRAME_TABLE: ThresholdTable<FrameCategory> = ThresholdTable::new(
    &[
        Band::above(10.4, FrameCategory::Small),
        Band::above(9.8, FrameCategory::Thin),
        Band::above(9.0, FrameCategory::Normal),
        Band::above(8.2, FrameCategory::Medium),
        Band::above(7.4, FrameCategory::Large),
    ],
    FrameCategory::VeryLarge,
);

pub const FEMALE_FRAME_TABLE: ThresholdTable<FrameCategory> = ThresholdTable::new(
    &[
        Band::above(13.7, FrameCategory::Small),
        Band::above(12.9, FrameCategory::Thin),
        Band::above(12.0, FrameCategory::Normal),
        Band::above(11.1, FrameCategory::Medium),
        Band::above(10.1, FrameCategory::Large),
    ],
    FrameCategory::VeryLarge,
);

/// Frame calculation result
///
/// The index is computable without sex; the category is not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub index: f64,
    pub category: Option<FrameCategory>,
}

impl FrameResult {
    pub fn display_index(&self) -> String {
        format_fixed(self.index, FRAME_DECIMALS)
    }

    /// Category text, or "sex required" when sex is unset
    pub fn category_label(&self) -> &'static str {
        self.category.map_or(SEX_REQUIRED, |c| c.description())
    }
}

/// Frame index: height(cm) / wrist circumference(cm)
pub fn calculate_frame_index(height: Measurement, wrist: Measurement) -> f64 {
    height.value() / wrist.value()
}

/// Classify a frame index for the given sex
pub fn classify_frame(index: f64, sex: Sex) -> FrameCategory {
    match sex {
        Sex::Male => MALE_FRAME_TABLE.classify(index),
        Sex::Female => FEMALE_FRAME_TABLE.classify(index),
    }
}

pub fn frame_result(height: Measurement, wrist: Measurement, sex: Option<Sex>) -> FrameResult {
    let index = calculate_frame_index(height, wrist);
    FrameResult {
        index,
        category: sex.map(|s| classify_frame(index, s)),
    }
}

/// Frame result from raw field values; `None` unless height and wrist are present
pub fn compute_frame(height_cm: f64, wrist_cm: f64, sex: Option<Sex>) -> Option<FrameResult> {
    let height = Measurement::new(height_cm)?;
    let wrist = Measurement::new(wrist_cm)?;
    Some(frame_result(height, wrist, sex))
}

// ============================================================================
// Waist-Hip Ratio Calculations
// ============================================================================

/// Decimals shown for the waist-hip ratio
pub const WHR_DECIMALS: usize = 3;

/// Body-fat distribution shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyShape {
    Android,
    Mixed,
    Gynoid,
}

impl BodyShape {
    pub fn description(&self) -> &'static str {
        match self {
            BodyShape::Android => "Android",
            BodyShape::Mixed => "Mixed",
            BodyShape::Gynoid => "Gynoid",
        }
    }
}

impl fmt::Display for BodyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

pub const MALE_WHR_TABLE: ThresholdTable<BodyShape> = ThresholdTable::new(
    &[
        Band::above(1.00, BodyShape::Android),
        Band::at_least(0.85, BodyShape::Mixed),
    ],
    BodyShape::Gynoid,
);

pub const FEMALE_WHR_TABLE: ThresholdTable<BodyShape> = ThresholdTable::new(
    &[
        Band::above(0.90, BodyShape::Android),
        Band::at_least(0.75, BodyShape::Mixed),
    ],
    BodyShape::Gynoid,
);

/// Waist-hip calculation result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaistHipResult {
    pub ratio: f64,
    pub category: Option<BodyShape>,
}

impl WaistHipResult {
    pub fn display_ratio(&self) -> String {
        format_fixed(self.ratio, WHR_DECIMALS)
    }

    pub fn category_label(&self) -> &'static str {
        self.category.map_or(SEX_REQUIRED, |c| c.description())
    }
}

pub fn calculate_waist_hip_ratio(waist: Measurement, hip: Measurement) -> f64 {
    waist.value() / hip.value()
}

pub fn classify_waist_hip(ratio: f64, sex: Sex) -> BodyShape {
    match sex {
        Sex::Male => MALE_WHR_TABLE.classify(ratio),
        Sex::Female => FEMALE_WHR_TABLE.classify(ratio),
    }
}

pub fn waist_hip_result(waist: Measurement, hip: Measurement, sex: Option<Sex>) -> WaistHipResult {
    let ratio = calculate_waist_hip_ratio(waist, hip);
    WaistHipResult {
        ratio,
        category: sex.map(|s| classify_waist_hip(ratio, s)),
    }
}

/// Waist-hip result from raw field values; `None` unless waist and hip are present
pub fn compute_whr(waist_cm: f64, hip_cm: f64, sex: Option<Sex>) -> Option<WaistHipResult> {
    let waist = Measurement::new(waist_cm)?;
    let hip = Measurement::new(hip_cm)?;
    Some(waist_hip_result(waist, hip, sex))
}
