/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use log::debug;

use crate::bar::Bar;
use crate::bias::BiasPolicy;
use crate::window::{EpochTracker, Placement, RetentionWindow};
use crate::QuantileBounds;

/// Ordered, non-overlapping bars covering the whole value axis.
pub(crate) struct BarLedger {
    policy: BiasPolicy,
    epochs: EpochTracker,
    bars: Vec<Bar>,
    total: u64,
    stale: u64,
}

impl BarLedger {
    pub(crate) fn new(policy: BiasPolicy, window: RetentionWindow) -> Self {
        let mut bars = Vec::with_capacity(policy.capacity() + 1);
        bars.push(Bar::initial());
        BarLedger {
            policy,
            epochs: EpochTracker::new(window),
            bars,
            total: 0,
            stale: 0,
        }
    }

    #[inline]
    pub(crate) fn policy(&self) -> &BiasPolicy {
        &self.policy
    }

    #[inline]
    pub(crate) fn window(&self) -> RetentionWindow {
        self.epochs.window()
    }

    #[inline]
    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    /// Samples dropped on arrival for being older than the window.
    #[inline]
    pub(crate) fn stale(&self) -> u64 {
        self.stale
    }

    #[inline]
    pub(crate) fn bar_count(&self) -> usize {
        self.bars.len()
    }

    fn reset(&mut self) {
        debug!(
            "all {} bars emptied, reset to the initial shape",
            self.bars.len()
        );
        self.bars.clear();
        self.bars.push(Bar::initial());
        self.epochs.clear();
        self.total = 0;
    }

    fn epoch_slot(&mut self, time: u64) -> usize {
        let mut slot = match self.epochs.place(time) {
            Placement::At(slot) => slot,
            Placement::Append => {
                self.bars.iter_mut().for_each(Bar::push_epoch);
                self.epochs.len() - 1
            }
        };
        if self.epochs.overflowing() {
            self.epochs.coalesce_oldest();
            self.bars.iter_mut().for_each(Bar::coalesce_oldest);
            slot = slot.saturating_sub(1);
        }
        slot
    }

    /// Index of the bar whose range holds `value`.
    fn locate(&self, value: f64) -> usize {
        // the first floor is -inf, so at least one bar matches
        self.bars.partition_point(|bar| bar.floor() <= value) - 1
    }

    /// Record a finite `value`, returning false if `time` is already out of
    /// the window and the sample was dropped.
    pub(crate) fn record(&mut self, value: f64, time: u64) -> bool {
        self.expire(time);
        if self.epochs.is_stale(time) {
            self.stale += 1;
            return false;
        }

        let slot = self.epoch_slot(time);
        let index = self.locate(value);
        let bar = &mut self.bars[index];
        bar.insert(value, slot);
        self.total += 1;

        if bar.total() as f64 > self.policy.max_count(index, self.total) && bar.splittable() {
            self.split(index);
        }
        if self.bars.len() > self.policy.capacity() {
            self.merge_emptiest();
        }
        true
    }

    fn split(&mut self, index: usize) {
        let next_above = self.bars.get(index + 1).map(Bar::above).unwrap_or(0);
        let fraction = self.policy.split_fraction();
        let upper = self.bars[index].split(fraction, next_above);
        self.bars.insert(index + 1, upper);
    }

    /// Merge the adjacent pair that is least filled relative to its target.
    fn merge_emptiest(&mut self) {
        let mut chosen = None;
        let mut lowest_weight = f64::INFINITY;
        for (index, pair) in self.bars.windows(2).enumerate() {
            let weight = self
                .policy
                .merge_weight(index, pair[0].total() + pair[1].total());
            if weight < lowest_weight {
                lowest_weight = weight;
                chosen = Some(index);
            }
        }

        if let Some(index) = chosen {
            let upper = self.bars.remove(index + 1);
            self.bars[index].absorb(upper);
        }
    }

    pub(crate) fn expire(&mut self, now: u64) {
        let dropped = self.epochs.expire(now);
        if dropped == 0 {
            return;
        }
        for bar in &mut self.bars {
            self.total -= bar.drop_epochs(dropped);
        }
        if self.total == 0 {
            self.reset();
        }
    }

    /// Bounds on the number of samples below each boundary.
    ///
    /// Entry `j` is for the floor of bar `j`, the extra last entry is for the
    /// `+inf` end of the axis. Both sequences are non-decreasing.
    fn boundary_ranks(&self) -> (Vec<u64>, Vec<u64>) {
        let len = self.bars.len() + 1;
        let mut least = Vec::with_capacity(len);
        let mut most = Vec::with_capacity(len);

        let mut estimate = 0u64;
        for (index, bar) in self.bars.iter().enumerate() {
            if index == 0 {
                least.push(0);
                most.push(0);
            } else {
                least.push(estimate.saturating_sub(bar.below()));
                most.push(estimate.saturating_add(bar.above()).min(self.total));
            }
            estimate += bar.total();
        }
        least.push(self.total);
        most.push(self.total);

        for j in 1..len {
            least[j] = least[j].max(least[j - 1]);
        }
        for j in (0..len - 1).rev() {
            most[j] = most[j].min(most[j + 1]);
        }
        (least, most)
    }

    /// Bars `[start, end)` one of which certainly holds the sample at `rank`
    /// (1 based).
    fn rank_span(least: &[u64], most: &[u64], rank: u64) -> (usize, usize) {
        // fewer than `rank` samples are below the floor of `start`
        let start = most.partition_point(|&n| n < rank) - 1;
        // at least `rank` samples are below the floor of `end`
        let end = least.partition_point(|&n| n < rank);
        (start, end.max(start + 1))
    }

    fn lower_edge(&self, start: usize, end: usize) -> f64 {
        let lowest = self.bars[start..end]
            .iter()
            .map(Bar::lowest)
            .fold(f64::INFINITY, f64::min);
        let floor = self.bars[start].floor();
        if lowest.is_finite() {
            lowest.max(floor)
        } else {
            floor
        }
    }

    fn upper_edge(&self, start: usize, end: usize) -> f64 {
        let highest = self.bars[start..end]
            .iter()
            .map(Bar::highest)
            .fold(f64::NEG_INFINITY, f64::max);
        let ceiling = self
            .bars
            .get(end)
            .map(Bar::floor)
            .unwrap_or(f64::INFINITY);
        if highest.is_finite() {
            highest.next_up().min(ceiling)
        } else {
            ceiling
        }
    }

    /// The caller makes sure `quantile` is in `[0, 1]`.
    pub(crate) fn quantile_bounds(&self, quantile: f64) -> QuantileBounds {
        if self.total == 0 {
            return QuantileBounds::EMPTY;
        }

        // with an integral target both neighbouring order statistics count
        let target = quantile * self.total as f64;
        let low_rank = (target.ceil() as u64).clamp(1, self.total);
        let high_rank = (target.floor() as u64).saturating_add(1).clamp(1, self.total);

        let (least, most) = self.boundary_ranks();
        let (start, end) = Self::rank_span(&least, &most, low_rank);
        let lower = self.lower_edge(start, end);
        let (start, end) = Self::rank_span(&least, &most, high_rank);
        let upper = self.upper_edge(start, end);
        QuantileBounds::new(lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(bias: f64, bars: usize, window: RetentionWindow) -> BarLedger {
        BarLedger::new(BiasPolicy::new(bias, bars).unwrap(), window)
    }

    fn check_invariants(ledger: &BarLedger) {
        let mut sum = 0;
        for pair in ledger.bars.windows(2) {
            assert!(pair[0].floor() < pair[1].floor());
        }
        for (i, bar) in ledger.bars.iter().enumerate() {
            sum += bar.total();
            if bar.lowest() <= bar.highest() {
                assert!(bar.lowest() >= bar.floor());
                if let Some(next) = ledger.bars.get(i + 1) {
                    assert!(bar.highest() < next.floor());
                }
            }
        }
        assert_eq!(sum, ledger.total());
        assert!(ledger.bar_count() <= ledger.policy().capacity());
    }

    #[test]
    fn initial_shape() {
        let ledger = ledger(1.0, 10, RetentionWindow::Unbounded);
        assert_eq!(ledger.bar_count(), 1);
        assert_eq!(ledger.total(), 0);
        assert!(ledger.quantile_bounds(0.5).is_empty());
    }

    #[test]
    fn single_value() {
        let mut ledger = ledger(1.0, 10, RetentionWindow::Unbounded);
        ledger.record(4.0, 0);
        let b = ledger.quantile_bounds(0.0);
        assert_eq!(b.lower(), 4.0);
        assert_eq!(b.upper(), 4.0_f64.next_up());
        assert_eq!(ledger.quantile_bounds(1.0), b);
        assert_eq!(ledger.quantile_bounds(0.3), b);
    }

    #[test]
    fn splits_and_stays_consistent() {
        let mut ledger = ledger(1.0, 10, RetentionWindow::Unbounded);
        for i in 0..1000 {
            ledger.record(((i * 7919) % 1000) as f64, 0);
            check_invariants(&ledger);
        }
        assert!(ledger.bar_count() > 1);
        assert_eq!(ledger.total(), 1000);

        let b = ledger.quantile_bounds(0.0);
        assert_eq!(b.lower(), 0.0);
        let b = ledger.quantile_bounds(1.0);
        assert_eq!(b.upper(), 999.0_f64.next_up());

        for q in [0.1, 0.25, 0.5, 0.75, 0.9] {
            let b = ledger.quantile_bounds(q);
            let rank = (q * 1000.0) as u64;
            // ranks q*N and q*N + 1 are the values q*N - 1 and q*N
            assert!(b.lower() <= (rank - 1) as f64, "{q}: {b}");
            assert!(b.upper() > rank as f64, "{q}: {b}");
        }
    }

    #[test]
    fn constant_values_never_split() {
        let mut ledger = ledger(0.5, 4, RetentionWindow::Unbounded);
        for _ in 0..100 {
            ledger.record(1.5, 0);
        }
        assert_eq!(ledger.bar_count(), 1);
        let b = ledger.quantile_bounds(0.5);
        assert_eq!(b.lower(), 1.5);
        assert_eq!(b.upper(), 1.5_f64.next_up());
    }

    #[test]
    fn capacity_is_respected() {
        let mut ledger = ledger(0.5, 3, RetentionWindow::Unbounded);
        for i in 0..5000 {
            ledger.record((i as f64).sqrt(), 0);
            check_invariants(&ledger);
        }
    }

    #[test]
    fn expire_partially() {
        let mut ledger = ledger(1.0, 10, RetentionWindow::Span(80));
        for i in 0..100 {
            ledger.record(i as f64, i);
        }
        let retained = ledger.total();
        assert!(retained < 100);
        check_invariants(&ledger);

        ledger.expire(150);
        assert!(ledger.total() < retained);
        assert!(ledger.total() > 0);
        check_invariants(&ledger);
    }

    #[test]
    fn expire_resets() {
        let mut ledger = ledger(1.0, 10, RetentionWindow::Span(100));
        for i in 0..100 {
            ledger.record(i as f64, i);
        }
        ledger.expire(200);
        assert_eq!(ledger.total(), 0);
        assert_eq!(ledger.bar_count(), 1);
        assert_eq!(ledger.epochs.len(), 0);
        assert!(ledger.quantile_bounds(0.0).is_empty());

        ledger.record(5.0, 300);
        assert_eq!(ledger.quantile_bounds(0.5).lower(), 5.0);
    }

    #[test]
    fn out_of_order_times() {
        let mut ledger = ledger(1.0, 10, RetentionWindow::Span(16));
        // out of order times within the window
        for i in 0..200u64 {
            let time = 1000 + (i * 37) % 16;
            ledger.record(i as f64, time);
            assert!(ledger.epochs.len() <= crate::window::EPOCH_SLOTS + 1);
            check_invariants(&ledger);
        }
        assert_eq!(ledger.total(), 200);
    }

    #[test]
    fn stale_times_dropped() {
        let mut ledger = ledger(1.0, 10, RetentionWindow::Span(100));
        assert!(ledger.record(50.0, 1000));
        assert!(!ledger.record(7.0, 0));
        assert_eq!(ledger.total(), 1);
        assert_eq!(ledger.stale(), 1);

        // late but still inside the window
        assert!(ledger.record(9.0, 950));
        assert_eq!(ledger.total(), 2);

        ledger.expire(1050);
        assert_eq!(ledger.total(), 2);
        let b = ledger.quantile_bounds(0.0);
        assert_eq!(b.lower(), 9.0);
        check_invariants(&ledger);
    }
}
