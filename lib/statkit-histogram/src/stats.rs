/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicU64, Ordering};

use portable_atomic::AtomicF64;

use super::{BiasedHistogram, Quantile, QuantileBounds};

pub struct HistogramQuantileStats {
    quantile: Quantile,
    lower: AtomicF64,
    upper: AtomicF64,
}

impl HistogramQuantileStats {
    fn new(quantile: Quantile) -> Self {
        HistogramQuantileStats {
            quantile,
            lower: AtomicF64::new(f64::NAN),
            upper: AtomicF64::new(f64::NAN),
        }
    }

    fn bounds(&self) -> QuantileBounds {
        QuantileBounds::new(
            self.lower.load(Ordering::Relaxed),
            self.upper.load(Ordering::Relaxed),
        )
    }
}

/// Latest published view of a histogram, readable without locking it.
pub struct HistogramStats {
    count: AtomicU64,
    quantile: Vec<HistogramQuantileStats>,
}

impl HistogramStats {
    pub fn new() -> Self {
        HistogramStats {
            count: AtomicU64::new(0),
            quantile: Vec::with_capacity(8),
        }
    }

    pub fn with_quantiles<'a, T>(quantiles: T) -> Self
    where
        T: IntoIterator<Item = &'a Quantile>,
    {
        let mut stats = HistogramStats::new();
        for q in quantiles {
            stats.quantile.push(HistogramQuantileStats::new(q.clone()));
        }
        stats
    }

    pub fn with_quantile(mut self, quantile: Quantile) -> Self {
        self.quantile.push(HistogramQuantileStats::new(quantile));
        self
    }

    pub fn update(&self, histogram: &BiasedHistogram) {
        self.count.store(histogram.count(), Ordering::Relaxed);
        for q in &self.quantile {
            let bounds = histogram
                .quantile_bounds(q.quantile.value())
                .unwrap_or(QuantileBounds::EMPTY);
            q.lower.store(bounds.lower(), Ordering::Relaxed);
            q.upper.store(bounds.upper(), Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn bounds(&self, quantile: &Quantile) -> Option<QuantileBounds> {
        self.quantile
            .iter()
            .find(|q| q.quantile == *quantile)
            .map(HistogramQuantileStats::bounds)
    }

    /// Walk all values, as `(quantile, name, value)`.
    ///
    /// The retained sample count comes first under the name `count`, then the
    /// `lower` and `upper` bound of every quantile.
    pub fn foreach_stat<F>(&self, mut call: F)
    where
        F: FnMut(Option<&Quantile>, &str, f64),
    {
        let count = self.count.load(Ordering::Relaxed);
        call(None, "count", count as f64);
        for q in &self.quantile {
            let bounds = q.bounds();
            call(Some(&q.quantile), "lower", bounds.lower());
            call(Some(&q.quantile), "upper", bounds.upper());
        }
    }
}

impl Default for HistogramStats {
    fn default() -> Self {
        HistogramStats::new()
            .with_quantile(Quantile::PCT50)
            .with_quantile(Quantile::PCT80)
            .with_quantile(Quantile::PCT90)
            .with_quantile(Quantile::PCT95)
            .with_quantile(Quantile::PCT99)
    }
}
