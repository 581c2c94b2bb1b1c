/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::f64::consts::PI;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command, value_parser};

use super::StreamRunner;
use crate::BenchArgs;

pub const COMMAND: &str = "gaussian";

const ARG_MEAN: &str = "mean";
const ARG_STDDEV: &str = "stddev";

pub fn command() -> Command {
    Command::new(COMMAND)
        .about("Normally distributed samples")
        .arg(
            Arg::new(ARG_MEAN)
                .long(ARG_MEAN)
                .num_args(1)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64))
                .default_value("0"),
        )
        .arg(
            Arg::new(ARG_STDDEV)
                .help("Standard deviation")
                .long(ARG_STDDEV)
                .num_args(1)
                .value_parser(value_parser!(f64))
                .default_value("1"),
        )
}

/// Box-Muller transform of two uniform samples.
pub(crate) fn standard_normal(rng: &mut fastrand::Rng) -> f64 {
    let u1 = 1.0 - rng.f64();
    let u2 = rng.f64();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

pub fn run(args: &BenchArgs, cmd_args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let mean = cmd_args.get_one::<f64>(ARG_MEAN).copied().unwrap_or(0.0);
    let stddev = cmd_args.get_one::<f64>(ARG_STDDEV).copied().unwrap_or(1.0);
    if !(stddev.is_finite() && stddev > 0.0) {
        return Err(anyhow!("standard deviation should be a positive number"));
    }

    let mut rng = args.rng();
    let mut runner = StreamRunner::new(args)?;
    for _ in 0..args.count {
        runner.record(mean + standard_normal(&mut rng) * stddev)?;
    }
    Ok(runner.finish())
}
