/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod check;
mod opts;

pub mod build;
pub mod target;

pub use opts::{BenchArgs, add_bench_args, parse_bench_args};
