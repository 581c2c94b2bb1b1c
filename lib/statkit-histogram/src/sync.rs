/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, Mutex};

use crate::{BiasedHistogram, HistogramError, Quantile, QuantileBounds};

/// A histogram shared between producer and consumer threads.
///
/// Record, expire and query run under one lock, so a query never sees a
/// ledger in the middle of a split or merge.
#[derive(Clone)]
pub struct SharedHistogram {
    inner: Arc<Mutex<BiasedHistogram>>,
}

impl SharedHistogram {
    pub fn new(histogram: BiasedHistogram) -> Self {
        SharedHistogram {
            inner: Arc::new(Mutex::new(histogram)),
        }
    }

    pub fn record(&self, value: f64, time: u64) -> Result<(), HistogramError> {
        let mut inner = self.inner.lock().unwrap();
        inner.record(value, time)
    }

    pub fn expire(&self, now: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner.expire(now);
    }

    pub fn quantile_bounds(&self, quantile: f64) -> Result<QuantileBounds, HistogramError> {
        let inner = self.inner.lock().unwrap();
        inner.quantile_bounds(quantile)
    }

    /// Bounds of several quantiles taken from the same state.
    pub fn snapshot<'a, T>(&self, quantiles: T) -> Vec<(Quantile, QuantileBounds)>
    where
        T: IntoIterator<Item = &'a Quantile>,
    {
        let inner = self.inner.lock().unwrap();
        quantiles
            .into_iter()
            .map(|q| {
                let bounds = inner
                    .quantile_bounds(q.value())
                    .unwrap_or(QuantileBounds::EMPTY);
                (q.clone(), bounds)
            })
            .collect()
    }

    pub fn count(&self) -> u64 {
        let inner = self.inner.lock().unwrap();
        inner.count()
    }
}

impl From<BiasedHistogram> for SharedHistogram {
    fn from(histogram: BiasedHistogram) -> Self {
        SharedHistogram::new(histogram)
    }
}
