/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuantileParseError {
    #[error("not a valid float value: {0}")]
    NotFloat(#[from] std::num::ParseFloatError),
    #[error("out of range [0, 1]")]
    OutOfRange,
}

/// A quantile to report, together with the name it is reported under.
#[derive(Clone, Debug)]
pub struct Quantile {
    value: f64,
    name: Cow<'static, str>,
}

impl Quantile {
    pub const PCT50: Quantile = Quantile::new_static(0.50, "0.50");
    pub const PCT80: Quantile = Quantile::new_static(0.80, "0.80");
    pub const PCT90: Quantile = Quantile::new_static(0.90, "0.90");
    pub const PCT95: Quantile = Quantile::new_static(0.95, "0.95");
    pub const PCT99: Quantile = Quantile::new_static(0.99, "0.99");
    pub const PCT999: Quantile = Quantile::new_static(0.999, "0.999");

    const fn new_static(value: f64, name: &'static str) -> Self {
        Quantile {
            value,
            name: Cow::Borrowed(name),
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

/// Range check, folding -0.0 into 0.0.
fn checked(value: f64) -> Result<f64, QuantileParseError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(QuantileParseError::OutOfRange);
    }
    Ok(value + 0.0)
}

impl TryFrom<f64> for Quantile {
    type Error = QuantileParseError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let value = checked(value)?;
        Ok(Quantile {
            value,
            name: Cow::Owned(value.to_string()),
        })
    }
}

impl FromStr for Quantile {
    type Err = QuantileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value = checked(f64::from_str(s)?)?;
        Ok(Quantile {
            value,
            name: Cow::Owned(s.to_string()),
        })
    }
}

impl fmt::Display for Quantile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.name)
    }
}

// the value is never NaN

impl PartialEq for Quantile {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Quantile {}

impl PartialOrd for Quantile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.total_cmp(&other.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn parse() {
        let q = Quantile::from_str("0.99").unwrap();
        assert_eq!(q.value(), 0.99);
        assert_eq!(q.as_str(), "0.99");
        assert_eq!(q, Quantile::PCT99);

        let q = Quantile::from_str(" 0.5 ").unwrap();
        assert_eq!(q.as_str(), "0.5");
        assert_eq!(q, Quantile::PCT50);

        assert!(Quantile::from_str("1").is_ok());
        assert!(Quantile::from_str("0").is_ok());
        assert!(matches!(
            Quantile::from_str("1.1"),
            Err(QuantileParseError::OutOfRange)
        ));
        assert!(matches!(
            Quantile::from_str("abc"),
            Err(QuantileParseError::NotFloat(_))
        ));
        assert!(Quantile::from_str("NaN").is_err());
    }

    #[test]
    fn try_from_f64() {
        let q = Quantile::try_from(0.25).unwrap();
        assert_eq!(q.as_str(), "0.25");
        assert!(Quantile::try_from(-0.25).is_err());
    }

    #[test]
    fn ordered_set() {
        let mut set = BTreeSet::new();
        set.insert(Quantile::PCT99);
        set.insert(Quantile::PCT50);
        set.insert(Quantile::from_str("0.50").unwrap());
        set.insert(Quantile::PCT999);
        let names: Vec<&str> = set.iter().map(|q| q.as_str()).collect();
        assert_eq!(names, vec!["0.50", "0.99", "0.999"]);
    }

    #[test]
    fn negative_zero() {
        let q = Quantile::from_str("-0").unwrap();
        assert!(q.value().is_sign_positive());
        assert_eq!(q.as_str(), "-0");
        assert_eq!(q, Quantile::from_str("0").unwrap());

        let q = Quantile::try_from(-0.0).unwrap();
        assert!(q.value().is_sign_positive());
        assert_eq!(q.as_str(), "0");

        let mut set = BTreeSet::new();
        set.insert(Quantile::from_str("0").unwrap());
        set.insert(Quantile::from_str("-0.0").unwrap());
        set.insert(Quantile::try_from(-0.0).unwrap());
        assert_eq!(set.len(), 1);
    }
}
