/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::Instant;

mod error;
pub use error::HistogramError;

mod bias;
mod bar;
mod ledger;

mod window;
pub use window::{EPOCH_SLOTS, RetentionWindow};

mod bounds;
pub use bounds::QuantileBounds;

mod histogram;
pub use histogram::BiasedHistogram;

mod sync;
pub use sync::SharedHistogram;

mod recorder;
pub use recorder::{HistogramRecorder, Observation};

mod windowed;
pub use windowed::WindowedHistogram;

mod stats;
pub use stats::HistogramStats;

mod quantile;
pub use quantile::{Quantile, QuantileParseError};

mod config;
pub use config::HistogramMetricsConfig;

pub(crate) fn elapsed_millis(origin: Instant) -> u64 {
    u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX)
}
