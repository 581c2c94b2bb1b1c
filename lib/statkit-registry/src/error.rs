/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("found duplicate statistic {0}")]
    Duplicate(String),
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SamplerError {
    #[error("invalid sampling probability {0}, it should be in range [0, 1]")]
    InvalidProbability(f64),
}
