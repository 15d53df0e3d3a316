//! Body Metrics command-line evaluator
//!
//! Reads form snapshots from CSV or JSON, evaluates every calculator of the
//! form for each row and exports the results for spreadsheets.

pub mod config;
pub mod report;
