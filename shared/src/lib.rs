//! Body Metrics Shared Library
//!
//! Calculators, classification tables and the form session used by the
//! WASM bindings and the command-line evaluator.

pub mod body_fat;
pub mod calendar;
pub mod errors;
pub mod health_metrics;
pub mod measurement;
pub mod session;
pub mod thresholds;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use body_fat::*;
pub use calendar::*;
pub use errors::*;
pub use health_metrics::*;
pub use measurement::{format_fixed, Measurement, Sex};
pub use session::{evaluate, FormOutputs, FormSection, FormSession};
pub use types::*;
pub use validation::ValidationError;
