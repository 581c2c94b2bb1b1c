/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::process::ExitCode;

use statkit_histogram::BiasedHistogram;

use crate::BenchArgs;
use crate::check::Reference;

pub mod flat;
pub mod flip_flop;
pub mod gaussian;

/// Summary of one stream run.
pub(crate) struct StreamReport {
    pub(crate) checks: usize,
    pub(crate) misses: usize,
    pub(crate) max_bars: usize,
}

impl StreamReport {
    fn exit_code(&self) -> ExitCode {
        println!(
            "checks: {}, misses: {}, max bars: {}",
            self.checks, self.misses, self.max_bars
        );
        if self.misses > 0 {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Feeds generated samples to a histogram and a reference, one per
/// millisecond, checking brackets along the way.
pub(crate) struct StreamRunner<'a> {
    args: &'a BenchArgs,
    histogram: BiasedHistogram,
    reference: Reference,
    time: u64,
    report: StreamReport,
}

impl<'a> StreamRunner<'a> {
    pub(crate) fn new(args: &'a BenchArgs) -> anyhow::Result<Self> {
        Ok(StreamRunner {
            args,
            histogram: args.new_histogram()?,
            reference: Reference::with_capacity(args.count),
            time: 0,
            report: StreamReport {
                checks: 0,
                misses: 0,
                max_bars: 0,
            },
        })
    }

    pub(crate) fn record(&mut self, value: f64) -> anyhow::Result<()> {
        self.histogram.record(value, self.time)?;
        self.reference.push(value);
        self.time += 1;
        self.report.max_bars = self.report.max_bars.max(self.histogram.bar_count());
        if self.time % self.args.check_every as u64 == 0 {
            self.check(false);
        }
        Ok(())
    }

    pub(crate) fn check(&mut self, verbose: bool) {
        let quantiles = self.args.quantiles();
        let misses = self.reference.check(&self.histogram, &quantiles);
        self.report.checks += 1;
        self.report.misses += misses.len();

        println!(
            "{:>10} samples {:>10} retained {:>6} bars",
            self.time,
            self.histogram.count(),
            self.histogram.bar_count()
        );
        for m in &misses {
            println!(
                "  MISS q={} bracket {} exact [{}, {}]",
                m.quantile, m.bounds, m.low, m.high
            );
        }
        if verbose {
            for q in &quantiles {
                if let Ok(b) = self.histogram.quantile_bounds(q.value()) {
                    println!("  {q:>6}: {b} width {}", b.width());
                }
            }
        }
    }

    pub(crate) fn finish(mut self) -> ExitCode {
        self.check(true);
        self.report.exit_code()
    }
}
