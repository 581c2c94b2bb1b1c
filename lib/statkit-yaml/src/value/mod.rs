/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod primary;
pub use primary::{as_f64, as_usize};

mod time;
pub use time::as_duration;

mod histogram;
pub use histogram::{
    as_histogram_metrics_config, as_quantile, as_quantile_list, as_retention_window,
};
