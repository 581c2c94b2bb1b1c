/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use humanize_rs::ParseError;
use yaml_rust::Yaml;

fn secs_f64(f: f64) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(f).map_err(|e| anyhow!("invalid seconds value {f}: {e}"))
}

/// A humanized duration like `1m30s`, or a plain number of seconds.
pub fn as_duration(v: &Yaml) -> anyhow::Result<Duration> {
    match v {
        Yaml::Integer(i) => {
            let secs = u64::try_from(*i).map_err(|_| anyhow!("negative duration {i}"))?;
            Ok(Duration::from_secs(secs))
        }
        Yaml::Real(s) => {
            let f = f64::from_str(s).map_err(|e| anyhow!("invalid real value {s}: {e}"))?;
            secs_f64(f)
        }
        Yaml::String(s) => match humanize_rs::duration::parse(s) {
            Ok(d) => Ok(d),
            Err(ParseError::MissingUnit) => match u64::from_str(s) {
                Ok(secs) => Ok(Duration::from_secs(secs)),
                Err(_) => Err(anyhow!("missing unit in duration string {s}")),
            },
            Err(e) => Err(anyhow!("invalid humanize duration string {s}: {e}")),
        },
        _ => Err(anyhow!(
            "yaml value type for duration should be 'string', 'integer' or 'real'"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanized() {
        let v = Yaml::String("1h2m".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(3720));
        let v = Yaml::String("30s".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(30));
        let v = Yaml::String("-5m".to_string());
        assert!(as_duration(&v).is_err());
    }

    #[test]
    fn plain_seconds() {
        let v = Yaml::String("60".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(60));
        let v = Yaml::Integer(5);
        assert_eq!(as_duration(&v).unwrap(), Duration::from_secs(5));
        let v = Yaml::Integer(-5);
        assert!(as_duration(&v).is_err());
        let v = Yaml::Real("0.25".to_string());
        assert_eq!(as_duration(&v).unwrap(), Duration::from_millis(250));
        let v = Yaml::Boolean(false);
        assert!(as_duration(&v).is_err());
    }
}
