/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use smallvec::SmallVec;

pub(crate) type EpochCounts = SmallVec<[u64; 4]>;

/// A bar covers `[floor, next floor)` of the value axis.
///
/// `counts` holds one entry per live epoch of the owning ledger. After a
/// split the counts of both halves are estimates, so the number of samples
/// below `floor` is only known to lie in
/// `[estimate - below, estimate + above]`, where the estimate is the sum of
/// the counts of all preceding bars. `lowest` and `highest` bound every sample
/// held by the bar, and are `+inf` / `-inf` while it has never held one.
#[derive(Clone, Debug)]
pub(crate) struct Bar {
    floor: f64,
    counts: EpochCounts,
    total: u64,
    lowest: f64,
    highest: f64,
    below: u64,
    above: u64,
}

impl Bar {
    pub(crate) fn initial() -> Self {
        Bar {
            floor: f64::NEG_INFINITY,
            counts: EpochCounts::new(),
            total: 0,
            lowest: f64::INFINITY,
            highest: f64::NEG_INFINITY,
            below: 0,
            above: 0,
        }
    }

    #[inline]
    pub(crate) fn floor(&self) -> f64 {
        self.floor
    }

    #[inline]
    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    #[inline]
    pub(crate) fn lowest(&self) -> f64 {
        self.lowest
    }

    #[inline]
    pub(crate) fn highest(&self) -> f64 {
        self.highest
    }

    #[inline]
    pub(crate) fn below(&self) -> u64 {
        self.below
    }

    #[inline]
    pub(crate) fn above(&self) -> u64 {
        self.above
    }

    pub(crate) fn insert(&mut self, value: f64, epoch: usize) {
        self.counts[epoch] += 1;
        self.total += 1;
        self.lowest = self.lowest.min(value);
        self.highest = self.highest.max(value);
    }

    pub(crate) fn push_epoch(&mut self) {
        self.counts.push(0);
    }

    pub(crate) fn coalesce_oldest(&mut self) {
        if self.counts.len() >= 2 {
            let oldest = self.counts.remove(0);
            self.counts[0] += oldest;
        }
    }

    /// Remove the `n` oldest epochs, returning the number of samples dropped.
    pub(crate) fn drop_epochs(&mut self, n: usize) -> u64 {
        let n = n.min(self.counts.len());
        let dropped: u64 = self.counts.drain(..n).sum();
        self.total -= dropped;
        dropped
    }

    /// Whether the hull is wide enough to place a boundary strictly inside.
    pub(crate) fn splittable(&self) -> bool {
        self.total >= 2 && self.lowest < self.highest
    }

    /// Boundary at `fraction` of the hull, strictly above `lowest` and not
    /// above `highest`.
    fn split_point(&self, fraction: f64) -> f64 {
        let point = self.lowest * (1.0 - fraction) + self.highest * fraction;
        if point.is_nan() || point <= self.lowest {
            self.lowest.next_up()
        } else if point > self.highest {
            self.highest
        } else {
            point
        }
    }

    /// Split off the upper part of this bar and return it.
    ///
    /// `next_above` is the `above` uncertainty of the following boundary, or
    /// zero if this is the last bar.
    pub(crate) fn split(&mut self, fraction: f64, next_above: u64) -> Bar {
        let point = self.split_point(fraction);

        let mut upper_counts = EpochCounts::with_capacity(self.counts.len());
        let mut kept = 0u64;
        for count in self.counts.iter_mut() {
            let keep = ((*count as f64) * fraction).round() as u64;
            let keep = keep.min(*count);
            upper_counts.push(*count - keep);
            *count = keep;
            kept += keep;
        }
        let moved = self.total - kept;

        let upper = Bar {
            floor: point,
            counts: upper_counts,
            total: moved,
            lowest: point,
            highest: self.highest,
            below: self.below.saturating_add(kept),
            above: next_above.saturating_add(moved),
        };

        self.total = kept;
        self.highest = self.highest.min(point.next_down());
        upper
    }

    /// Merge the following bar into this one, dropping the boundary between.
    pub(crate) fn absorb(&mut self, upper: Bar) {
        for (count, add) in self.counts.iter_mut().zip(upper.counts) {
            *count += add;
        }
        self.total += upper.total;
        self.lowest = self.lowest.min(upper.lowest);
        self.highest = self.highest.max(upper.highest);
    }
}
