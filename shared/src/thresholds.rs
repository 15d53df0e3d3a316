//! Ordered threshold tables
//!
//! A table is a list of bands checked top to bottom. The first band whose
//! threshold the value clears decides the category; if none does, the
//! table's fallback applies.

/// How a band compares a value against its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// value > threshold
    Above,
    /// value >= threshold
    AtLeast,
}

/// One row of a threshold table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band<C> {
    pub bound: Bound,
    pub threshold: f64,
    pub category: C,
}

impl<C> Band<C> {
    pub const fn above(threshold: f64, category: C) -> Self {
        Self {
            bound: Bound::Above,
            threshold,
            category,
        }
    }

    pub const fn at_least(threshold: f64, category: C) -> Self {
        Self {
            bound: Bound::AtLeast,
            threshold,
            category,
        }
    }

    pub fn admits(&self, value: f64) -> bool {
        match self.bound {
            Bound::Above => value > self.threshold,
            Bound::AtLeast => value >= self.threshold,
        }
    }
}

/// Bands ordered from the highest threshold down, plus a fallback category
#[derive(Debug, Clone, Copy)]
pub struct ThresholdTable<C: 'static> {
    pub bands: &'static [Band<C>],
    pub fallback: C,
}

impl<C: Copy> ThresholdTable<C> {
    pub const fn new(bands: &'static [Band<C>], fallback: C) -> Self {
        Self { bands, fallback }
    }

    /// Category of the first band admitting `value`
    pub fn classify(&self, value: f64) -> C {
        self.bands
            .iter()
            .find(|band| band.admits(value))
            .map(|band| band.category)
            .unwrap_or(self.fallback)
    }

    /// Whether thresholds never increase from one band to the next
    pub fn is_descending(&self) -> bool {
        self.bands
            .windows(2)
            .all(|pair| pair[0].threshold >= pair[1].threshold)
    }
}
