/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use crate::HistogramError;

/// How far over its target share a bar may grow before it is split.
pub(crate) const MAX_COEFFICIENT: f64 = 1.7;
/// Working bar count limit, as a multiple of the configured bar count.
pub(crate) const EXPANSION: usize = 2;

/// Per-position target shares of the retained samples.
///
/// Position `i` targets `bias^i` relative to position 0, normalized over the
/// configured bar count. A bias below 1 leaves less mass to the bars at the
/// high end of the value range, so they split more often and the high tail
/// gets more resolution. A bias above 1 does the same for the low tail.
#[derive(Debug, Clone)]
pub(crate) struct BiasPolicy {
    bias: f64,
    bars: usize,
    shares: Vec<f64>,
    split_fraction: f64,
}

impl BiasPolicy {
    pub(crate) fn new(bias: f64, bars: usize) -> Result<Self, HistogramError> {
        if !bias.is_finite() || bias <= 0.0 {
            return Err(HistogramError::InvalidBias(bias));
        }
        if bars == 0 {
            return Err(HistogramError::InvalidBarCount);
        }

        // one spare slot for the bar created by a split before merging
        let slots = bars.saturating_mul(EXPANSION).saturating_add(1);

        // anchor the exponent at the largest term to stay clear of overflow
        let anchor = if bias > 1.0 { (bars - 1) as f64 } else { 0.0 };
        let term = |i: usize| bias.powf(i as f64 - anchor);
        let sum: f64 = (0..bars).map(term).sum();

        let shares = (0..slots)
            .map(|i| (term(i) / sum).clamp(f64::MIN_POSITIVE, 1.0))
            .collect();

        Ok(BiasPolicy {
            bias,
            bars,
            shares,
            split_fraction: 1.0 / (1.0 + bias),
        })
    }

    #[inline]
    pub(crate) fn bias(&self) -> f64 {
        self.bias
    }

    #[inline]
    pub(crate) fn bars(&self) -> usize {
        self.bars
    }

    /// Number of bars above which the ledger merges.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.shares.len() - 1
    }

    /// Fraction of a split bar's hull and count that goes to the lower half.
    #[inline]
    pub(crate) fn split_fraction(&self) -> f64 {
        self.split_fraction
    }

    pub(crate) fn share(&self, position: usize) -> f64 {
        let last = self.shares.len() - 1;
        self.shares[position.min(last)]
    }

    /// Largest count the bar at `position` may hold given `total` samples.
    pub(crate) fn max_count(&self, position: usize, total: u64) -> f64 {
        MAX_COEFFICIENT * self.share(position) * total as f64
    }

    /// Fill level of the adjacent pair starting at `position` if merged.
    pub(crate) fn merge_weight(&self, position: usize, combined: u64) -> f64 {
        combined as f64 / (self.share(position) + self.share(position + 1))
    }
}
