/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum HistogramError {
    #[error("invalid bias value {0}, it should be a positive finite number")]
    InvalidBias(f64),
    #[error("bar count should be greater than zero")]
    InvalidBarCount,
    #[error("invalid quantile {0}, it should be in range [0, 1]")]
    InvalidQuantile(f64),
    #[error("non-finite observation value {0}")]
    NonFiniteValue(f64),
}
