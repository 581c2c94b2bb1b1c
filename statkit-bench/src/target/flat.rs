/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command, value_parser};

use super::StreamRunner;
use crate::BenchArgs;

pub const COMMAND: &str = "flat";

const ARG_LOW: &str = "low";
const ARG_HIGH: &str = "high";

pub fn command() -> Command {
    Command::new(COMMAND)
        .about("Uniformly distributed samples")
        .arg(
            Arg::new(ARG_LOW)
                .help("Lower end of the value range")
                .long(ARG_LOW)
                .num_args(1)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64))
                .default_value("0"),
        )
        .arg(
            Arg::new(ARG_HIGH)
                .help("Upper end of the value range")
                .long(ARG_HIGH)
                .num_args(1)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64))
                .default_value("1000"),
        )
}

pub fn run(args: &BenchArgs, cmd_args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let low = cmd_args.get_one::<f64>(ARG_LOW).copied().unwrap_or(0.0);
    let high = cmd_args.get_one::<f64>(ARG_HIGH).copied().unwrap_or(1000.0);
    if !(low.is_finite() && high.is_finite()) || low >= high {
        return Err(anyhow!("empty value range [{low}, {high})"));
    }

    let mut rng = args.rng();
    let mut runner = StreamRunner::new(args)?;
    for _ in 0..args.count {
        runner.record(low + rng.f64() * (high - low))?;
    }
    Ok(runner.finish())
}
