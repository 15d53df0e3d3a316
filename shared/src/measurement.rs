//! Form input values: measurements and sex
//!
//! A form field that is empty, non-numeric, zero or negative is "absent".
//! Absence is modelled with `Option`, never with a zero value.

use crate::errors::MetricsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Measurement
// ============================================================================

/// A strictly positive, finite measurement (kg, cm or percent)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Measurement(f64);

impl Measurement {
    /// Accept a raw value, treating non-positive and non-finite input as absent
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    /// Parse form text, treating anything non-numeric as absent
    pub fn parse(text: &str) -> Option<Self> {
        text.trim().parse::<f64>().ok().and_then(Self::new)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Measurement {
    type Error = MetricsError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            MetricsError::InvalidInput(format!("Measurement must be a positive number, got {}", value))
        })
    }
}

impl From<Measurement> for f64 {
    fn from(m: Measurement) -> Self {
        m.0
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lift an optional raw field value into an optional measurement
pub fn measurement(value: Option<f64>) -> Option<Measurement> {
    value.and_then(Measurement::new)
}

/// Render a value with a fixed number of decimals, as shown in output fields
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

// ============================================================================
// Sex
// ============================================================================

/// Sex used to select classification tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Parse a form value; anything unrecognized leaves sex unset
    pub fn parse_optional(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Sex {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(MetricsError::InvalidInput(format!("Unknown sex: {}", s))),
        }
    }
}
