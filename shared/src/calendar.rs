//! Calendar dates and the age calculator
//!
//! Age is the elapsed years/months/days between a birth date and a reference
//! (measurement) date, using month-borrow arithmetic rather than a day count.

use crate::errors::{MetricsError, MetricsResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Calendar Date
// ============================================================================

/// A real Gregorian date
///
/// Construction rejects impossible combinations such as February 30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Create a date from its components
    pub fn new(year: i32, month: u32, day: u32) -> MetricsResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(MetricsError::InvalidDate { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDate {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| MetricsError::InvalidInput(format!("Expected a YYYY-MM-DD date, got '{}'", s)))
    }
}

/// Date components as held by a form: any of them may still be unset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl DateParts {
    pub fn new(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Self {
        Self { year, month, day }
    }

    /// The three components, when all are set; zero counts as unset
    fn components(&self) -> Option<(i32, u32, u32)> {
        let year = self.year.filter(|y| *y > 0)?;
        let month = self.month.filter(|m| *m > 0)?;
        let day = self.day.filter(|d| *d > 0)?;
        Some((year, month, day))
    }

    /// Whether all three components are set
    pub fn is_complete(&self) -> bool {
        self.components().is_some()
    }

    /// Build the date once every component is set
    ///
    /// Returns `None` while incomplete, `Some(Err(..))` for an impossible date.
    pub fn to_date(&self) -> Option<MetricsResult<CalendarDate>> {
        self.components()
            .map(|(year, month, day)| CalendarDate::new(year, month, day))
    }
}

impl From<CalendarDate> for DateParts {
    fn from(date: CalendarDate) -> Self {
        Self {
            year: Some(date.year()),
            month: Some(date.month()),
            day: Some(date.day()),
        }
    }
}

/// Whether `year` has a February 29
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

// ============================================================================
// Age Breakdown
// ============================================================================

/// Elapsed time from a birth date to a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgeBreakdown {
    pub years: u32,
    /// Always 0-11
    pub months: u32,
    pub days: u32,
}

impl fmt::Display for AgeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} years, {} months, {} days", self.years, self.months, self.days)
    }
}

impl FromStr for AgeBreakdown {
    type Err = MetricsError;

    /// Parse the rendered form `"34 years, 0 months, 12 days"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MetricsError::InvalidInput(format!("Unrecognized age text '{}'", s));

        let mut values = [0u32; 3];
        let mut parts = s.split(',');
        for (slot, unit) in values.iter_mut().zip(["years", "months", "days"]) {
            let part = parts.next().ok_or_else(invalid)?;
            let mut tokens = part.split_whitespace();
            let number = tokens
                .next()
                .and_then(|t| t.parse::<u32>().ok())
                .ok_or_else(invalid)?;
            if tokens.next() != Some(unit) || tokens.next().is_some() {
                return Err(invalid());
            }
            *slot = number;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        let [years, months, days] = values;
        if months > 11 {
            return Err(invalid());
        }
        Ok(Self { years, months, days })
    }
}

/// Compute the elapsed age between `birth` and `reference`
///
/// Borrow rule: a negative day difference takes the length of the month
/// preceding the reference month (December of the prior year for January).
/// When that single borrow is not enough (Jan 31 to Mar 1) the month before
/// that is borrowed as well. A negative month difference borrows one year.
pub fn compute_age(birth: CalendarDate, reference: CalendarDate) -> MetricsResult<AgeBreakdown> {
    if reference < birth {
        return Err(MetricsError::ReferenceBeforeBirth {
            birth: birth.to_string(),
            reference: reference.to_string(),
        });
    }

    let mut years = reference.year() - birth.year();
    let mut months = reference.month() as i32 - birth.month() as i32;
    let mut days = reference.day() as i32 - birth.day() as i32;

    let (mut borrow_year, mut borrow_month) = (reference.year(), reference.month());
    while days < 0 {
        (borrow_year, borrow_month) = previous_month(borrow_year, borrow_month);
        days += days_in_month(borrow_year, borrow_month) as i32;
        months -= 1;
    }

    if months < 0 {
        years -= 1;
        months += 12;
    }

    Ok(AgeBreakdown {
        years: years as u32,
        months: months as u32,
        days: days as u32,
    })
}
