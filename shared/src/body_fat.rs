//! Body-fat classification
//!
//! Maps a measured body-fat percentage to a level through a fixed table keyed
//! by sex and age band. Every range in the table is closed on both ends; the
//! top level is anything strictly above the elevated range.

use crate::measurement::{Measurement, Sex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reported when age or sex is missing
pub const INSUFFICIENT_DATA: &str = "insufficient data";
/// Reported for ages outside 20-79
pub const AGE_OUT_OF_RANGE: &str = "age outside classification range";
/// Reported for percentages below the table floor or between two ranges
pub const OUTSIDE_EXPECTED_RANGES: &str = "value outside expected ranges";

// ============================================================================
// Age Bands
// ============================================================================

/// Age band of the classification table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    /// 20-39 years
    Adult,
    /// 40-59 years
    MiddleAged,
    /// 60-79 years
    Senior,
}

impl AgeBand {
    pub const ALL: [AgeBand; 3] = [AgeBand::Adult, AgeBand::MiddleAged, AgeBand::Senior];

    /// Inclusive age range of the band
    pub fn range(&self) -> (u32, u32) {
        match self {
            AgeBand::Adult => (20, 39),
            AgeBand::MiddleAged => (40, 59),
            AgeBand::Senior => (60, 79),
        }
    }

    /// Band containing `age_years`, if any
    pub fn from_age(age_years: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|band| {
            let (min, max) = band.range();
            (min..=max).contains(&age_years)
        })
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (min, max) = self.range();
        write!(f, "{}-{}", min, max)
    }
}

// ============================================================================
// Levels and Table
// ============================================================================

/// Body-fat level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFatLevel {
    Low,
    Recommended,
    Elevated,
    VeryElevated,
}

impl BodyFatLevel {
    pub fn description(&self) -> &'static str {
        match self {
            BodyFatLevel::Low => "Low",
            BodyFatLevel::Recommended => "Recommended",
            BodyFatLevel::Elevated => "Elevated",
            BodyFatLevel::VeryElevated => "Very elevated",
        }
    }
}

impl fmt::Display for BodyFatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Closed percentage range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentRange {
    pub min: f64,
    pub max: f64,
}

impl PercentRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, percent: f64) -> bool {
        percent >= self.min && percent <= self.max
    }
}

/// Ranges for one sex and age band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyFatRow {
    pub sex: Sex,
    pub band: AgeBand,
    pub low: PercentRange,
    pub recommended: PercentRange,
    pub elevated: PercentRange,
}

impl BodyFatRow {
    /// Percentages strictly above this are very elevated
    pub fn very_elevated_above(&self) -> f64 {
        self.elevated.max
    }

    /// Level for `percent`, or `None` when it falls outside every range
    pub fn classify(&self, percent: f64) -> Option<BodyFatLevel> {
        if percent > self.very_elevated_above() {
            Some(BodyFatLevel::VeryElevated)
        } else if self.elevated.contains(percent) {
            Some(BodyFatLevel::Elevated)
        } else if self.recommended.contains(percent) {
            Some(BodyFatLevel::Recommended)
        } else if self.low.contains(percent) {
            Some(BodyFatLevel::Low)
        } else {
            None
        }
    }
}

const fn row(
    sex: Sex,
    band: AgeBand,
    low: (f64, f64),
    recommended: (f64, f64),
    elevated: (f64, f64),
) -> BodyFatRow {
    BodyFatRow {
        sex,
        band,
        low: PercentRange::new(low.0, low.1),
        recommended: PercentRange::new(recommended.0, recommended.1),
        elevated: PercentRange::new(elevated.0, elevated.1),
    }
}

/// Body-fat reference table by sex and age band
pub const BODY_FAT_TABLE: [BodyFatRow; 6] = [
    row(Sex::Female, AgeBand::Adult, (5.0, 20.0), (21.0, 33.0), (34.0, 38.0)),
    row(Sex::Female, AgeBand::MiddleAged, (5.0, 22.0), (23.0, 34.0), (35.0, 40.0)),
    row(Sex::Female, AgeBand::Senior, (5.0, 23.0), (24.0, 36.0), (37.0, 41.0)),
    row(Sex::Male, AgeBand::Adult, (5.0, 7.0), (8.0, 20.0), (21.0, 25.0)),
    row(Sex::Male, AgeBand::MiddleAged, (5.0, 10.0), (11.0, 21.0), (22.0, 27.0)),
    row(Sex::Male, AgeBand::Senior, (5.0, 12.0), (13.0, 25.0), (26.0, 30.0)),
];

/// Table row for a sex and age band
pub fn lookup_row(sex: Sex, band: AgeBand) -> Option<&'static BodyFatRow> {
    BODY_FAT_TABLE
        .iter()
        .find(|row| row.sex == sex && row.band == band)
}

// ============================================================================
// Classification
// ============================================================================

/// Outcome of classifying a present body-fat percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "level", rename_all = "snake_case")]
pub enum BodyFatClassification {
    Classified(BodyFatLevel),
    InsufficientData,
    AgeOutOfRange,
    OutsideExpectedRanges,
}

impl BodyFatClassification {
    pub fn label(&self) -> &'static str {
        match self {
            BodyFatClassification::Classified(level) => level.description(),
            BodyFatClassification::InsufficientData => INSUFFICIENT_DATA,
            BodyFatClassification::AgeOutOfRange => AGE_OUT_OF_RANGE,
            BodyFatClassification::OutsideExpectedRanges => OUTSIDE_EXPECTED_RANGES,
        }
    }

    pub fn level(&self) -> Option<BodyFatLevel> {
        match self {
            BodyFatClassification::Classified(level) => Some(*level),
            _ => None,
        }
    }
}

impl fmt::Display for BodyFatClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a present body-fat percentage
pub fn body_fat_classification(
    fat: Measurement,
    age_years: Option<u32>,
    sex: Option<Sex>,
) -> BodyFatClassification {
    let (Some(age_years), Some(sex)) = (age_years, sex) else {
        return BodyFatClassification::InsufficientData;
    };
    let Some(band) = AgeBand::from_age(age_years) else {
        return BodyFatClassification::AgeOutOfRange;
    };

    lookup_row(sex, band)
        .and_then(|row| row.classify(fat.value()))
        .map_or(
            BodyFatClassification::OutsideExpectedRanges,
            BodyFatClassification::Classified,
        )
}

/// A present body-fat percentage with its classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyFatResult {
    pub percent: f64,
    pub classification: BodyFatClassification,
}

pub fn body_fat_result(fat: Measurement, age_years: Option<u32>, sex: Option<Sex>) -> BodyFatResult {
    BodyFatResult {
        percent: fat.value(),
        classification: body_fat_classification(fat, age_years, sex),
    }
}

/// Classify a raw body-fat field value
///
/// Returns `None` when the percentage is absent (not positive), in which case
/// no classification is attempted at all.
pub fn classify_body_fat(
    fat_percent: f64,
    age_years: Option<u32>,
    sex: Option<Sex>,
) -> Option<BodyFatClassification> {
    let fat = Measurement::new(fat_percent)?;
    Some(body_fat_classification(fat, age_years, sex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    use super::BodyFatClassification::{AgeOutOfRange, Classified, InsufficientData, OutsideExpectedRanges};
    use super::BodyFatLevel::{Elevated, Low, Recommended, VeryElevated};

    #[test]
    fn test_female_35_recommended() {
        let result = classify_body_fat(25.0, Some(35), Some(Sex::Female)).unwrap();
        assert_eq!(result, Classified(Recommended));
        assert_eq!(result.label(), "Recommended");
    }

    #[test]
    fn test_male_65_below_floor() {
        let result = classify_body_fat(4.0, Some(65), Some(Sex::Male)).unwrap();
        assert_eq!(result, OutsideExpectedRanges);
        assert_eq!(result.to_string(), "value outside expected ranges");
    }

    #[test]
    fn test_absent_fat_is_not_classified() {
        assert_eq!(classify_body_fat(0.0, Some(35), Some(Sex::Female)), None);
        assert_eq!(classify_body_fat(-5.0, Some(35), Some(Sex::Male)), None);
        assert_eq!(classify_body_fat(0.0, None, None), None);
    }

    #[test]
    fn test_missing_age_or_sex() {
        assert_eq!(classify_body_fat(25.0, None, Some(Sex::Female)), Some(InsufficientData));
        assert_eq!(classify_body_fat(25.0, Some(35), None), Some(InsufficientData));
        assert_eq!(InsufficientData.label(), "insufficient data");
    }

    #[rstest]
    #[case(19, AgeOutOfRange)]
    #[case(80, AgeOutOfRange)]
    #[case(0, AgeOutOfRange)]
    #[case(20, Classified(Recommended))]
    #[case(79, Classified(Recommended))]
    fn test_age_edges(#[case] age: u32, #[case] expected: BodyFatClassification) {
        assert_eq!(classify_body_fat(24.0, Some(age), Some(Sex::Female)), Some(expected));
    }

    #[rstest]
    #[case(19, None)]
    #[case(20, Some(AgeBand::Adult))]
    #[case(39, Some(AgeBand::Adult))]
    #[case(40, Some(AgeBand::MiddleAged))]
    #[case(59, Some(AgeBand::MiddleAged))]
    #[case(60, Some(AgeBand::Senior))]
    #[case(79, Some(AgeBand::Senior))]
    #[case(80, None)]
    fn test_age_bands(#[case] age: u32, #[case] expected: Option<AgeBand>) {
        assert_eq!(AgeBand::from_age(age), expected);
    }

    #[rstest]
    // Female 20-39
    #[case(Sex::Female, 30, 5.0, Classified(Low))]
    #[case(Sex::Female, 30, 20.0, Classified(Low))]
    #[case(Sex::Female, 30, 21.0, Classified(Recommended))]
    #[case(Sex::Female, 30, 33.0, Classified(Recommended))]
    #[case(Sex::Female, 30, 34.0, Classified(Elevated))]
    #[case(Sex::Female, 30, 38.0, Classified(Elevated))]
    #[case(Sex::Female, 30, 38.5, Classified(VeryElevated))]
    #[case(Sex::Female, 30, 20.5, OutsideExpectedRanges)]
    // Female 40-59
    #[case(Sex::Female, 50, 22.0, Classified(Low))]
    #[case(Sex::Female, 50, 23.0, Classified(Recommended))]
    #[case(Sex::Female, 50, 40.0, Classified(Elevated))]
    #[case(Sex::Female, 50, 41.0, Classified(VeryElevated))]
    // Female 60-79
    #[case(Sex::Female, 70, 23.0, Classified(Low))]
    #[case(Sex::Female, 70, 36.0, Classified(Recommended))]
    #[case(Sex::Female, 70, 41.0, Classified(Elevated))]
    #[case(Sex::Female, 70, 42.0, Classified(VeryElevated))]
    // Male 20-39
    #[case(Sex::Male, 25, 7.0, Classified(Low))]
    #[case(Sex::Male, 25, 8.0, Classified(Recommended))]
    #[case(Sex::Male, 25, 21.0, Classified(Elevated))]
    #[case(Sex::Male, 25, 25.0, Classified(Elevated))]
    #[case(Sex::Male, 25, 26.0, Classified(VeryElevated))]
    // Male 40-59
    #[case(Sex::Male, 45, 10.0, Classified(Low))]
    #[case(Sex::Male, 45, 21.0, Classified(Recommended))]
    #[case(Sex::Male, 45, 27.0, Classified(Elevated))]
    #[case(Sex::Male, 45, 27.1, Classified(VeryElevated))]
    // Male 60-79
    #[case(Sex::Male, 65, 4.9, OutsideExpectedRanges)]
    #[case(Sex::Male, 65, 12.0, Classified(Low))]
    #[case(Sex::Male, 65, 13.0, Classified(Recommended))]
    #[case(Sex::Male, 65, 30.0, Classified(Elevated))]
    #[case(Sex::Male, 65, 31.0, Classified(VeryElevated))]
    fn test_body_fat_table(
        #[case] sex: Sex,
        #[case] age: u32,
        #[case] percent: f64,
        #[case] expected: BodyFatClassification,
    ) {
        assert_eq!(classify_body_fat(percent, Some(age), Some(sex)), Some(expected));
    }

    #[test]
    fn test_table_covers_every_sex_and_band() {
        for sex in [Sex::Male, Sex::Female] {
            for band in AgeBand::ALL {
                let row = lookup_row(sex, band).unwrap();
                assert!(row.low.max < row.recommended.min);
                assert!(row.recommended.max < row.elevated.min);
            }
        }
    }

    #[test]
    fn test_serialized_classification() {
        let json = serde_json::to_string(&Classified(VeryElevated)).unwrap();
        assert_eq!(json, r#"{"status":"classified","level":"very_elevated"}"#);
        let json = serde_json::to_string(&InsufficientData).unwrap();
        assert_eq!(json, r#"{"status":"insufficient_data"}"#);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: anything above a row's elevated range is very elevated
        #[test]
        fn prop_above_elevated_is_very_elevated(
            is_male in any::<bool>(),
            age in 20u32..=79,
            excess in 0.01f64..50.0
        ) {
            let sex = if is_male { Sex::Male } else { Sex::Female };
            let band = AgeBand::from_age(age).unwrap();
            let row = lookup_row(sex, band).unwrap();
            let percent = row.very_elevated_above() + excess;
            prop_assert_eq!(
                classify_body_fat(percent, Some(age), Some(sex)),
                Some(Classified(VeryElevated))
            );
        }

        /// Property: ages outside 20-79 never produce a level
        #[test]
        fn prop_out_of_range_age_never_classified(
            age in prop_oneof![0u32..20, 80u32..120],
            percent in 1.0f64..60.0
        ) {
            prop_assert_eq!(
                classify_body_fat(percent, Some(age), Some(Sex::Female)),
                Some(AgeOutOfRange)
            );
        }

        /// Property: identical inputs give identical output
        #[test]
        fn prop_classification_idempotent(age in 0u32..100, percent in 0.0f64..70.0) {
            prop_assert_eq!(
                classify_body_fat(percent, Some(age), Some(Sex::Male)),
                classify_body_fat(percent, Some(age), Some(Sex::Male))
            );
        }
    }
}
