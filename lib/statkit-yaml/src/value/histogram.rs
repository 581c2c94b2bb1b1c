/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeSet;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use statkit_histogram::{HistogramMetricsConfig, Quantile};

pub fn as_quantile(value: &Yaml) -> anyhow::Result<Quantile> {
    match value {
        Yaml::String(s) | Yaml::Real(s) => {
            Quantile::from_str(s).map_err(|e| anyhow!("invalid quantile value {s}: {e}"))
        }
        Yaml::Integer(i) => Quantile::try_from(*i as f64)
            .map_err(|e| anyhow!("invalid quantile value {i}: {e}")),
        _ => Err(anyhow!(
            "yaml value type for 'quantile' should be 'str', 'float' or 'integer'"
        )),
    }
}

/// A comma separated string or a sequence of quantiles.
pub fn as_quantile_list(value: &Yaml) -> anyhow::Result<BTreeSet<Quantile>> {
    let mut set = BTreeSet::new();
    match value {
        Yaml::String(s) => {
            for v in s.split(',') {
                let q = Quantile::from_str(v)
                    .map_err(|e| anyhow!("invalid quantile string {v}: {e}"))?;
                set.insert(q);
            }
        }
        Yaml::Array(seq) => {
            for (i, v) in seq.iter().enumerate() {
                let q = as_quantile(v).context(format!("invalid quantile for element #{i}"))?;
                set.insert(q);
            }
        }
        _ => {
            return Err(anyhow!(
                "yaml value type for 'quantile list' should be 'seq' or 'str'"
            ));
        }
    }
    Ok(set)
}

/// A duration, or `None` for one of the words meaning keep everything.
pub fn as_retention_window(value: &Yaml) -> anyhow::Result<Option<Duration>> {
    if let Yaml::String(s) = value {
        match s.to_lowercase().as_str() {
            "unbounded" | "infinite" | "none" => return Ok(None),
            _ => {}
        }
    }
    let window = super::as_duration(value)?;
    if window.is_zero() {
        return Err(anyhow!("retention window should not be zero"));
    }
    Ok(Some(window))
}

pub fn as_histogram_metrics_config(value: &Yaml) -> anyhow::Result<HistogramMetricsConfig> {
    let Yaml::Hash(map) = value else {
        let window = as_retention_window(value).context(
            "the value for simplified form of histogram metrics config map should be a retention window",
        )?;
        let mut config = HistogramMetricsConfig::default();
        config.set_window(window);
        return Ok(config);
    };

    let mut config = HistogramMetricsConfig::default();
    crate::foreach_kv(map, |k, v| match crate::key::normalize(k).as_str() {
        "bias" => {
            let bias = super::as_f64(v).context(format!("invalid f64 value for key {k}"))?;
            if !(bias.is_finite() && bias > 0.0) {
                return Err(anyhow!("bias should be a positive number"));
            }
            config.set_bias(bias);
            Ok(())
        }
        "bars" => {
            let bars = super::as_usize(v).context(format!("invalid usize value for key {k}"))?;
            if bars == 0 {
                return Err(anyhow!("bar count should not be zero"));
            }
            config.set_bars(bars);
            Ok(())
        }
        "window" => {
            let window = as_retention_window(v)
                .context(format!("invalid retention window value for key {k}"))?;
            config.set_window(window);
            Ok(())
        }
        "refresh" | "refresh_interval" => {
            let interval = super::as_duration(v)
                .context(format!("invalid humanize duration value for key {k}"))?;
            if interval.is_zero() {
                return Err(anyhow!("refresh interval should not be zero"));
            }
            config.set_refresh_interval(interval);
            Ok(())
        }
        "quantile" => {
            let quantile_list = as_quantile_list(v)
                .context(format!("invalid quantile list value for key {k}"))?;
            config.set_quantile_list(quantile_list);
            Ok(())
        }
        _ => Err(anyhow!("invalid key {k}")),
    })?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use statkit_histogram::RetentionWindow;

    #[test]
    fn quantile() {
        let q = as_quantile(&Yaml::Real("0.99".to_string())).unwrap();
        assert_eq!(q, Quantile::PCT99);
        let q = as_quantile(&Yaml::String("0.5".to_string())).unwrap();
        assert_eq!(q.as_str(), "0.5");
        let q = as_quantile(&Yaml::Integer(1)).unwrap();
        assert_eq!(q.value(), 1.0);
        assert!(as_quantile(&Yaml::Real("1.5".to_string())).is_err());
        assert!(as_quantile(&Yaml::Boolean(true)).is_err());
    }

    #[test]
    fn quantile_list() {
        let list = as_quantile_list(&yaml_doc!("\"0.99, 0.5,0.9\"")).unwrap();
        let names: Vec<&str> = list.iter().map(|q| q.as_str()).collect();
        assert_eq!(names, vec!["0.5", "0.9", "0.99"]);

        let list = as_quantile_list(&yaml_doc!("[0.5, \"0.999\", 0.5]")).unwrap();
        assert_eq!(list.len(), 2);

        assert!(as_quantile_list(&yaml_doc!("\"0.5,2\"")).is_err());
        assert!(as_quantile_list(&yaml_doc!("[0.5, [1]]")).is_err());
        assert!(as_quantile_list(&yaml_doc!("a: 1")).is_err());
    }

    #[test]
    fn retention_window() {
        assert_eq!(
            as_retention_window(&yaml_doc!("unbounded")).unwrap(),
            None
        );
        assert_eq!(as_retention_window(&yaml_doc!("Infinite")).unwrap(), None);
        assert_eq!(as_retention_window(&yaml_doc!("none")).unwrap(), None);
        assert_eq!(
            as_retention_window(&yaml_doc!("5m")).unwrap(),
            Some(Duration::from_secs(300))
        );
        assert_eq!(
            as_retention_window(&yaml_doc!("10")).unwrap(),
            Some(Duration::from_secs(10))
        );
        assert!(as_retention_window(&yaml_doc!("0")).is_err());
        assert!(as_retention_window(&yaml_doc!("forever")).is_err());
    }

    #[test]
    fn config_map() {
        let yaml = yaml_doc!(
            r#"
                bias: 1.05
                bars: 200
                window: 10m
                refresh-interval: 2s
                quantile: 0.5,0.99
            "#
        );
        let config = as_histogram_metrics_config(&yaml).unwrap();
        assert_eq!(config.bias(), 1.05);
        assert_eq!(config.bars(), 200);
        assert_eq!(config.window(), Some(Duration::from_secs(600)));
        assert_eq!(config.retention_window(), RetentionWindow::Span(600_000));
        assert_eq!(config.refresh_interval(), Duration::from_secs(2));
        assert_eq!(config.quantile_list().len(), 2);
        assert!(config.build().is_ok());

        let yaml = yaml_doc!("window: none\nRefresh: 1");
        let config = as_histogram_metrics_config(&yaml).unwrap();
        assert_eq!(config.retention_window(), RetentionWindow::Unbounded);
        assert_eq!(config.refresh_interval(), Duration::from_secs(1));
        assert_eq!(config.bars(), HistogramMetricsConfig::default().bars());
    }

    #[test]
    fn config_simplified() {
        let config = as_histogram_metrics_config(&yaml_doc!("30s")).unwrap();
        assert_eq!(config.window(), Some(Duration::from_secs(30)));
        let config = as_histogram_metrics_config(&yaml_doc!("unbounded")).unwrap();
        assert_eq!(config.window(), None);
    }

    #[test]
    fn config_invalid() {
        assert!(as_histogram_metrics_config(&yaml_doc!("bias: 0")).is_err());
        assert!(as_histogram_metrics_config(&yaml_doc!("bias: -2.0")).is_err());
        assert!(as_histogram_metrics_config(&yaml_doc!("bars: 0")).is_err());
        assert!(as_histogram_metrics_config(&yaml_doc!("refresh: 0")).is_err());
        assert!(as_histogram_metrics_config(&yaml_doc!("rotate: 4s")).is_err());
        assert!(as_histogram_metrics_config(&yaml_doc!("[1, 2]")).is_err());
    }
}
