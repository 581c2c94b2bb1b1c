/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use crate::bias::BiasPolicy;
use crate::ledger::BarLedger;
use crate::{HistogramError, QuantileBounds, RetentionWindow};

/// Bounded memory histogram of a stream of observations.
///
/// Resolution is spent unevenly across the value range, as set by `bias`,
/// and only samples newer than the retention window are kept. Quantiles are
/// answered as brackets guaranteed to hold the exact order statistic of the
/// retained samples.
pub struct BiasedHistogram {
    ledger: BarLedger,
}

impl BiasedHistogram {
    /// `bias` is the width ratio between neighbouring bars: below 1 gives
    /// more bars to the high end, above 1 to the low end. `bars` is the target
    /// number of bars.
    pub fn new(bias: f64, bars: usize, window: RetentionWindow) -> Result<Self, HistogramError> {
        let policy = BiasPolicy::new(bias, bars)?;
        Ok(BiasedHistogram {
            ledger: BarLedger::new(policy, window),
        })
    }

    /// A histogram that keeps every sample.
    pub fn unbounded(bias: f64, bars: usize) -> Result<Self, HistogramError> {
        BiasedHistogram::new(bias, bars, RetentionWindow::Unbounded)
    }

    #[inline]
    pub fn bias(&self) -> f64 {
        self.ledger.policy().bias()
    }

    #[inline]
    pub fn bars(&self) -> usize {
        self.ledger.policy().bars()
    }

    #[inline]
    pub fn window(&self) -> RetentionWindow {
        self.ledger.window()
    }

    /// Number of retained samples.
    #[inline]
    pub fn count(&self) -> u64 {
        self.ledger.total()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ledger.total() == 0
    }

    /// Number of bars currently in use.
    #[inline]
    pub fn bar_count(&self) -> usize {
        self.ledger.bar_count()
    }

    /// Record `value` observed at `time`, expiring older samples first.
    ///
    /// NaN and infinite values are rejected and leave the histogram as is.
    /// A sample already older than the window, as seen from the newest
    /// retained one, is dropped and counted by [`stale_count`](Self::stale_count).
    pub fn record(&mut self, value: f64, time: u64) -> Result<(), HistogramError> {
        if !value.is_finite() {
            return Err(HistogramError::NonFiniteValue(value));
        }
        self.ledger.record(value, time);
        Ok(())
    }

    /// Number of samples dropped on arrival for being out of the window.
    #[inline]
    pub fn stale_count(&self) -> u64 {
        self.ledger.stale()
    }

    /// Forget the samples that fell out of the window at `now`.
    pub fn expire(&mut self, now: u64) {
        self.ledger.expire(now);
    }

    pub fn quantile_bounds(&self, quantile: f64) -> Result<QuantileBounds, HistogramError> {
        if !(0.0..=1.0).contains(&quantile) {
            return Err(HistogramError::InvalidQuantile(quantile));
        }
        Ok(self.ledger.quantile_bounds(quantile))
    }
}
