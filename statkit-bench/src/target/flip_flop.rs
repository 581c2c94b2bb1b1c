/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command, value_parser};

use super::StreamRunner;
use super::gaussian::standard_normal;
use crate::BenchArgs;

pub const COMMAND: &str = "flip-flop";

const ARG_BURSTS: &str = "bursts";

pub fn command() -> Command {
    Command::new(COMMAND)
        .about("Bursts of normal samples with shifting centre and width")
        .arg(
            Arg::new(ARG_BURSTS)
                .help("Number of bursts the samples are split into")
                .long(ARG_BURSTS)
                .num_args(1)
                .value_parser(value_parser!(usize))
                .default_value("10"),
        )
}

/// Centre and width of the given burst, alternating between a narrow
/// distribution near zero and wider ones further up.
fn burst_shape(burst: usize) -> (f64, f64) {
    if burst % 2 == 0 {
        (0.0, 1.0)
    } else {
        let step = (burst / 2 + 1) as f64;
        (1000.0 * step, 10.0 * step)
    }
}

pub fn run(args: &BenchArgs, cmd_args: &ArgMatches) -> anyhow::Result<ExitCode> {
    let bursts = cmd_args.get_one::<usize>(ARG_BURSTS).copied().unwrap_or(10);
    if bursts == 0 {
        return Err(anyhow!("burst count should not be zero"));
    }
    let burst_len = args.count / bursts;

    let mut rng = args.rng();
    let mut runner = StreamRunner::new(args)?;
    for burst in 0..bursts {
        let (centre, width) = burst_shape(burst);
        println!("burst #{burst}: centre {centre} width {width}");
        for _ in 0..burst_len {
            runner.record(centre + standard_normal(&mut rng) * width)?;
        }
        runner.check(true);
    }
    Ok(runner.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes() {
        assert_eq!(burst_shape(0), (0.0, 1.0));
        assert_eq!(burst_shape(1), (1000.0, 10.0));
        assert_eq!(burst_shape(3), (2000.0, 20.0));
        assert_eq!(burst_shape(4), (0.0, 1.0));
    }
}
