/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use clap::{Arg, ArgMatches, Command, value_parser};
use yaml_rust::Yaml;

use statkit_histogram::{BiasedHistogram, HistogramMetricsConfig, Quantile, RetentionWindow};

const GLOBAL_ARG_CONFIG: &str = "config";
const GLOBAL_ARG_BIAS: &str = "bias";
const GLOBAL_ARG_BIAS_RANGE: &str = "bias-range";
const GLOBAL_ARG_BARS: &str = "bars";
const GLOBAL_ARG_COUNT: &str = "count";
const GLOBAL_ARG_SEED: &str = "seed";
const GLOBAL_ARG_WINDOW: &str = "window";
const GLOBAL_ARG_QUANTILE: &str = "quantile";
const GLOBAL_ARG_CHECK_EVERY: &str = "check-every";

/// The bench clock advances one millisecond per sample.
pub struct BenchArgs {
    pub(crate) histogram: HistogramMetricsConfig,
    pub(crate) count: usize,
    pub(crate) seed: u64,
    pub(crate) check_every: usize,
}

impl BenchArgs {
    pub(crate) fn new_histogram(&self) -> anyhow::Result<BiasedHistogram> {
        self.histogram
            .build()
            .map_err(|e| anyhow!("invalid histogram setting: {e}"))
    }

    pub(crate) fn rng(&self) -> fastrand::Rng {
        fastrand::Rng::with_seed(self.seed)
    }

    pub(crate) fn quantiles(&self) -> Vec<Quantile> {
        if self.histogram.quantile_list().is_empty() {
            vec![
                Quantile::PCT50,
                Quantile::PCT90,
                Quantile::PCT99,
                Quantile::PCT999,
            ]
        } else {
            self.histogram.quantile_list().iter().cloned().collect()
        }
    }

    pub(crate) fn window(&self) -> RetentionWindow {
        self.histogram.retention_window()
    }

    pub fn summary(&self) {
        println!(
            "bias: {}, bars: {}, window: {}",
            self.histogram.bias(),
            self.histogram.bars(),
            self.window()
        );
        println!(
            "samples: {}, seed: {}, check every: {}",
            self.count, self.seed, self.check_every
        );
    }
}

pub fn add_bench_args(app: Command) -> Command {
    app.arg(
        Arg::new(GLOBAL_ARG_CONFIG)
            .help("Load histogram settings from a yaml file, before other options")
            .value_name("CONFIG FILE")
            .long(GLOBAL_ARG_CONFIG)
            .global(true)
            .num_args(1)
            .value_parser(value_parser!(PathBuf)),
    )
    .arg(
        Arg::new(GLOBAL_ARG_BIAS)
            .help("Width ratio between neighbouring bars")
            .value_name("BIAS")
            .short('b')
            .long(GLOBAL_ARG_BIAS)
            .global(true)
            .num_args(1)
            .value_parser(value_parser!(f64))
            .conflicts_with(GLOBAL_ARG_BIAS_RANGE),
    )
    .arg(
        Arg::new(GLOBAL_ARG_BIAS_RANGE)
            .help("Width ratio between the last and the first bar")
            .value_name("RANGE")
            .long(GLOBAL_ARG_BIAS_RANGE)
            .global(true)
            .num_args(1)
            .value_parser(value_parser!(f64)),
    )
    .arg(
        Arg::new(GLOBAL_ARG_BARS)
            .help("Target number of bars")
            .value_name("BAR COUNT")
            .long(GLOBAL_ARG_BARS)
            .global(true)
            .num_args(1)
            .value_parser(value_parser!(usize)),
    )
    .arg(
        Arg::new(GLOBAL_ARG_COUNT)
            .help("Number of samples to record")
            .value_name("SAMPLE COUNT")
            .short('n')
            .long(GLOBAL_ARG_COUNT)
            .global(true)
            .num_args(1)
            .value_parser(value_parser!(usize))
            .default_value("100000"),
    )
    .arg(
        Arg::new(GLOBAL_ARG_SEED)
            .help("Seed of the sample generator")
            .value_name("SEED")
            .long(GLOBAL_ARG_SEED)
            .global(true)
            .num_args(1)
            .value_parser(value_parser!(u64))
            .default_value("1"),
    )
    .arg(
        Arg::new(GLOBAL_ARG_WINDOW)
            .help("Retention window, a humanized duration or 'unbounded'")
            .value_name("WINDOW")
            .short('w')
            .long(GLOBAL_ARG_WINDOW)
            .global(true)
            .num_args(1),
    )
    .arg(
        Arg::new(GLOBAL_ARG_QUANTILE)
            .help("Comma separated quantiles to report")
            .value_name("QUANTILE LIST")
            .short('q')
            .long(GLOBAL_ARG_QUANTILE)
            .global(true)
            .num_args(1),
    )
    .arg(
        Arg::new(GLOBAL_ARG_CHECK_EVERY)
            .help("Check brackets against the exact values every this many samples")
            .value_name("SAMPLE COUNT")
            .long(GLOBAL_ARG_CHECK_EVERY)
            .global(true)
            .num_args(1)
            .value_parser(value_parser!(usize))
            .default_value("10000"),
    )
}

fn parse_quantile_list(s: &str) -> anyhow::Result<BTreeSet<Quantile>> {
    let mut set = BTreeSet::new();
    for v in s.split(',') {
        let q = Quantile::from_str(v).map_err(|e| anyhow!("invalid quantile {v}: {e}"))?;
        set.insert(q);
    }
    Ok(set)
}

pub fn parse_bench_args(args: &ArgMatches) -> anyhow::Result<BenchArgs> {
    let mut histogram = HistogramMetricsConfig::default();
    histogram.set_window(None);

    if let Some(path) = args.get_one::<PathBuf>(GLOBAL_ARG_CONFIG) {
        let doc = statkit_yaml::load_doc(path)?;
        histogram = statkit_yaml::value::as_histogram_metrics_config(&doc)
            .context(format!("invalid histogram config in {}", path.display()))?;
    }

    if let Some(bars) = args.get_one::<usize>(GLOBAL_ARG_BARS) {
        histogram.set_bars(*bars);
    }
    if let Some(bias) = args.get_one::<f64>(GLOBAL_ARG_BIAS) {
        histogram.set_bias(*bias);
    }
    if let Some(range) = args.get_one::<f64>(GLOBAL_ARG_BIAS_RANGE) {
        if !(range.is_finite() && *range > 0.0) {
            return Err(anyhow!("bias range should be a positive number"));
        }
        let bars = histogram.bars().max(1);
        histogram.set_bias(range.powf(1.0 / bars as f64));
    }
    if let Some(s) = args.get_one::<String>(GLOBAL_ARG_WINDOW) {
        let window = statkit_yaml::value::as_retention_window(&Yaml::String(s.to_string()))
            .context(format!("invalid window value {s}"))?;
        histogram.set_window(window);
    }
    if let Some(s) = args.get_one::<String>(GLOBAL_ARG_QUANTILE) {
        histogram.set_quantile_list(parse_quantile_list(s)?);
    }

    let count = args.get_one::<usize>(GLOBAL_ARG_COUNT).copied().unwrap_or(0);
    let seed = args.get_one::<u64>(GLOBAL_ARG_SEED).copied().unwrap_or(1);
    let check_every = args
        .get_one::<usize>(GLOBAL_ARG_CHECK_EVERY)
        .copied()
        .unwrap_or(0);
    if check_every == 0 {
        return Err(anyhow!("check interval should not be zero"));
    }

    Ok(BenchArgs {
        histogram,
        count,
        seed,
        check_every,
    })
}
