/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::anyhow;
use yaml_rust::Yaml;

pub fn as_f64(v: &Yaml) -> anyhow::Result<f64> {
    match v {
        Yaml::Integer(i) => Ok(*i as f64),
        Yaml::Real(s) | Yaml::String(s) => Ok(f64::from_str(s.trim())?),
        _ => Err(anyhow!(
            "yaml value type for 'f64' should be 'real', 'integer' or 'string'"
        )),
    }
}

pub fn as_usize(v: &Yaml) -> anyhow::Result<usize> {
    match v {
        Yaml::Integer(i) => Ok(usize::try_from(*i)?),
        Yaml::String(s) => Ok(usize::from_str(s.trim())?),
        _ => Err(anyhow!(
            "yaml value type for 'usize' should be 'integer' or 'string'"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float() {
        assert_eq!(as_f64(&Yaml::Integer(2)).unwrap(), 2.0);
        assert_eq!(as_f64(&Yaml::Real("0.5".to_string())).unwrap(), 0.5);
        assert_eq!(as_f64(&Yaml::String(" 1.5".to_string())).unwrap(), 1.5);
        assert!(as_f64(&Yaml::String("x".to_string())).is_err());
        assert!(as_f64(&Yaml::Boolean(true)).is_err());
    }

    #[test]
    fn size() {
        assert_eq!(as_usize(&Yaml::Integer(100)).unwrap(), 100);
        assert_eq!(as_usize(&Yaml::String("20".to_string())).unwrap(), 20);
        assert!(as_usize(&Yaml::Integer(-1)).is_err());
        assert!(as_usize(&Yaml::Real("1.0".to_string())).is_err());
    }
}
