/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use statkit_histogram::{BiasedHistogram, Quantile, QuantileBounds};

pub(crate) struct BracketMiss {
    pub(crate) quantile: f64,
    pub(crate) bounds: QuantileBounds,
    pub(crate) low: f64,
    pub(crate) high: f64,
}

/// Every recorded value, oldest first.
#[derive(Default)]
pub(crate) struct Reference {
    history: Vec<f64>,
}

impl Reference {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Reference {
            history: Vec::with_capacity(n),
        }
    }

    pub(crate) fn push(&mut self, value: f64) {
        self.history.push(value);
    }

    /// Sorted copy of the newest `n` values.
    ///
    /// Samples are recorded in time order and expire oldest first, so the
    /// values retained by a histogram are always a suffix of the history.
    pub(crate) fn retained(&self, n: usize) -> Vec<f64> {
        let n = n.min(self.history.len());
        let mut sorted = self.history[self.history.len() - n..].to_vec();
        sorted.sort_by(f64::total_cmp);
        sorted
    }

    /// Compare the histogram brackets with the exact order statistics.
    pub(crate) fn check(&self, h: &BiasedHistogram, quantiles: &[Quantile]) -> Vec<BracketMiss> {
        let sorted = self.retained(h.count() as usize);
        let mut misses = Vec::new();
        if sorted.is_empty() {
            return misses;
        }

        let n = sorted.len();
        let all = [0.0, 1.0];
        for q in quantiles.iter().map(Quantile::value).chain(all) {
            let Ok(bounds) = h.quantile_bounds(q) else {
                continue;
            };
            let target = q * n as f64;
            let low = sorted[(target.ceil() as usize).clamp(1, n) - 1];
            let high = sorted[(target.floor() as usize + 1).clamp(1, n) - 1];
            if !(bounds.lower() <= low && bounds.upper() > high) {
                misses.push(BracketMiss {
                    quantile: q,
                    bounds,
                    low,
                    high,
                });
            }
        }
        misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retained_suffix() {
        let mut r = Reference::default();
        for v in [5.0, 1.0, 4.0, 2.0] {
            r.push(v);
        }
        assert_eq!(r.retained(3), vec![1.0, 2.0, 4.0]);
        assert_eq!(r.retained(10).len(), 4);
    }

    #[test]
    fn no_miss() {
        let mut r = Reference::with_capacity(1000);
        let mut h = BiasedHistogram::unbounded(1.0, 20).unwrap();
        let mut rng = fastrand::Rng::with_seed(1);
        for i in 0..1000 {
            let v = rng.f64();
            h.record(v, i).unwrap();
            r.push(v);
        }
        assert!(r.check(&h, &[Quantile::PCT50, Quantile::PCT99]).is_empty());
    }

    #[test]
    fn empty() {
        let r = Reference::default();
        let h = BiasedHistogram::unbounded(1.0, 20).unwrap();
        assert!(r.check(&h, &[Quantile::PCT50]).is_empty());
    }
}
