/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;

/// Half-open bracket `[lower, upper)` holding the value at some quantile.
///
/// Both ends are NaN if the histogram retained no samples.
#[derive(Clone, Copy, Debug)]
pub struct QuantileBounds {
    lower: f64,
    upper: f64,
}

impl QuantileBounds {
    pub const EMPTY: QuantileBounds = QuantileBounds {
        lower: f64::NAN,
        upper: f64::NAN,
    };

    pub(crate) fn new(lower: f64, upper: f64) -> Self {
        QuantileBounds { lower, upper }
    }

    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower.is_nan() && self.upper.is_nan()
    }

    /// NaN for the empty bracket.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value < self.upper
    }
}

impl PartialEq for QuantileBounds {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty() {
            return other.is_empty();
        }
        self.lower == other.lower && self.upper == other.upper
    }
}

impl From<QuantileBounds> for [f64; 2] {
    fn from(value: QuantileBounds) -> Self {
        [value.lower, value.upper]
    }
}

impl fmt::Display for QuantileBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let b = QuantileBounds::EMPTY;
        assert!(b.is_empty());
        assert!(b.width().is_nan());
        assert!(!b.contains(0.0));
        assert_eq!(b, QuantileBounds::EMPTY);
        assert_eq!(b.to_string(), "[NaN, NaN)");
    }

    #[test]
    fn contains() {
        let b = QuantileBounds::new(1.0, 2.0);
        assert!(!b.is_empty());
        assert!(b.contains(1.0));
        assert!(b.contains(1.5));
        assert!(!b.contains(2.0));
        assert_eq!(b.width(), 1.0);
        assert_eq!(<[f64; 2]>::from(b), [1.0, 2.0]);
        assert_ne!(b, QuantileBounds::EMPTY);
    }
}
