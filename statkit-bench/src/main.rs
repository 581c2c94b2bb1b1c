/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command, value_parser};
use clap_complete::Shell;

const COMMAND_VERSION: &str = "version";
const COMMAND_COMPLETION: &str = "completion";

fn build_cli_args() -> Command {
    statkit_bench::add_bench_args(Command::new(statkit_bench::build::PKG_NAME))
        .subcommand_required(true)
        .subcommand_value_name("STREAM")
        .subcommand(Command::new(COMMAND_VERSION).override_help("Show version"))
        .subcommand(
            Command::new(COMMAND_COMPLETION).arg(
                Arg::new("target")
                    .value_name("SHELL")
                    .required(true)
                    .num_args(1)
                    .value_parser(value_parser!(Shell)),
            ),
        )
        .subcommand(statkit_bench::target::flat::command())
        .subcommand(statkit_bench::target::gaussian::command())
        .subcommand(statkit_bench::target::flip_flop::command())
}

fn main() -> anyhow::Result<ExitCode> {
    let args = build_cli_args().get_matches();

    let (subcommand, sub_args) = args
        .subcommand()
        .ok_or_else(|| anyhow!("no subcommand found"))?;

    match subcommand {
        COMMAND_VERSION => {
            statkit_bench::build::print_version();
            return Ok(ExitCode::SUCCESS);
        }
        COMMAND_COMPLETION => {
            generate_completion(sub_args);
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let bench_args = statkit_bench::parse_bench_args(&args)?;
    bench_args.summary();

    match subcommand {
        statkit_bench::target::flat::COMMAND => {
            statkit_bench::target::flat::run(&bench_args, sub_args)
        }
        statkit_bench::target::gaussian::COMMAND => {
            statkit_bench::target::gaussian::run(&bench_args, sub_args)
        }
        statkit_bench::target::flip_flop::COMMAND => {
            statkit_bench::target::flip_flop::run(&bench_args, sub_args)
        }
        cmd => Err(anyhow!("invalid subcommand {cmd}")),
    }
}

fn generate_completion(args: &ArgMatches) {
    if let Some(target) = args.get_one::<Shell>("target") {
        let mut app = build_cli_args();
        let bin_name = app.get_name().to_string();
        clap_complete::generate(*target, &mut app, bin_name, &mut io::stdout());
    }
}
