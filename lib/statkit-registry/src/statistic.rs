/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::{Arc, Weak};

use statkit_histogram::{Quantile, SharedHistogram};

use crate::{StatisticType, StatisticValue, Table};

/// A named value that can be read at any time.
pub trait ValueStatistic: Send + Sync {
    fn statistic_type(&self) -> StatisticType;

    /// `None` once the underlying source has gone away.
    fn value(&self) -> Option<StatisticValue>;
}

pub struct CounterStatistic<F> {
    accessor: F,
}

impl<F> ValueStatistic for CounterStatistic<F>
where
    F: Fn() -> u64 + Send + Sync,
{
    fn statistic_type(&self) -> StatisticType {
        StatisticType::Counter
    }

    fn value(&self) -> Option<StatisticValue> {
        Some(StatisticValue::Counter((self.accessor)()))
    }
}

pub struct GaugeStatistic<F> {
    accessor: F,
}

impl<F> ValueStatistic for GaugeStatistic<F>
where
    F: Fn() -> f64 + Send + Sync,
{
    fn statistic_type(&self) -> StatisticType {
        StatisticType::Gauge
    }

    fn value(&self) -> Option<StatisticValue> {
        Some(StatisticValue::Gauge((self.accessor)()))
    }
}

pub struct TableStatistic<F> {
    accessor: F,
}

impl<F> ValueStatistic for TableStatistic<F>
where
    F: Fn() -> Table + Send + Sync,
{
    fn statistic_type(&self) -> StatisticType {
        StatisticType::Table
    }

    fn value(&self) -> Option<StatisticValue> {
        Some(StatisticValue::Table((self.accessor)()))
    }
}

pub fn counter<F>(accessor: F) -> CounterStatistic<F>
where
    F: Fn() -> u64 + Send + Sync,
{
    CounterStatistic { accessor }
}

pub fn gauge<F>(accessor: F) -> GaugeStatistic<F>
where
    F: Fn() -> f64 + Send + Sync,
{
    GaugeStatistic { accessor }
}

pub fn table<F>(accessor: F) -> TableStatistic<F>
where
    F: Fn() -> Table + Send + Sync,
{
    TableStatistic { accessor }
}

/// Reads a value from a target it does not keep alive.
pub struct WeakStatistic<T, F> {
    statistic_type: StatisticType,
    target: Weak<T>,
    accessor: F,
}

impl<T, F> WeakStatistic<T, F>
where
    F: Fn(&T) -> StatisticValue,
{
    pub fn new(statistic_type: StatisticType, target: &Arc<T>, accessor: F) -> Self {
        WeakStatistic {
            statistic_type,
            target: Arc::downgrade(target),
            accessor,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }
}

impl<T, F> ValueStatistic for WeakStatistic<T, F>
where
    T: Send + Sync,
    F: Fn(&T) -> StatisticValue + Send + Sync,
{
    fn statistic_type(&self) -> StatisticType {
        self.statistic_type
    }

    fn value(&self) -> Option<StatisticValue> {
        let target = self.target.upgrade()?;
        Some((self.accessor)(&target))
    }
}

/// Quantile brackets of a shared histogram.
pub struct HistogramStatistic {
    histogram: SharedHistogram,
    quantiles: Vec<Quantile>,
}

impl HistogramStatistic {
    pub fn new(histogram: SharedHistogram, quantiles: Vec<Quantile>) -> Self {
        HistogramStatistic {
            histogram,
            quantiles,
        }
    }
}

impl ValueStatistic for HistogramStatistic {
    fn statistic_type(&self) -> StatisticType {
        StatisticType::Histogram
    }

    fn value(&self) -> Option<StatisticValue> {
        Some(StatisticValue::Histogram(
            self.histogram.snapshot(&self.quantiles),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    use statkit_histogram::BiasedHistogram;

    #[test]
    fn closures() {
        let hits = Arc::new(AtomicU64::new(0));
        let hits2 = Arc::clone(&hits);
        let c = counter(move || hits2.load(Ordering::Relaxed));
        assert_eq!(c.value(), Some(StatisticValue::Counter(0)));
        hits.fetch_add(3, Ordering::Relaxed);
        assert_eq!(c.value(), Some(StatisticValue::Counter(3)));

        let g = gauge(|| 0.5);
        assert_eq!(g.statistic_type(), StatisticType::Gauge);
        assert_eq!(g.value(), Some(StatisticValue::Gauge(0.5)));

        let t = table(|| Table::new().with("a", "b", 1.0));
        let Some(StatisticValue::Table(v)) = t.value() else {
            panic!("not a table");
        };
        assert_eq!(v.get("a", "b"), Some(1.0));
    }

    #[test]
    fn weak() {
        let target = Arc::new(AtomicU64::new(7));
        let s = WeakStatistic::new(StatisticType::Counter, &target, |t: &AtomicU64| {
            StatisticValue::Counter(t.load(Ordering::Relaxed))
        });
        assert!(s.is_alive());
        assert_eq!(s.value(), Some(StatisticValue::Counter(7)));

        drop(target);
        assert!(!s.is_alive());
        assert_eq!(s.value(), None);
        assert_eq!(s.statistic_type(), StatisticType::Counter);
    }

    #[test]
    fn histogram() {
        let h = SharedHistogram::new(BiasedHistogram::unbounded(1.0, 10).unwrap());
        let s = HistogramStatistic::new(h.clone(), vec![Quantile::PCT50, Quantile::PCT99]);
        let Some(StatisticValue::Histogram(v)) = s.value() else {
            panic!("not a histogram");
        };
        assert!(v.iter().all(|(_, b)| b.is_empty()));

        h.record(4.0, 0).unwrap();
        let Some(StatisticValue::Histogram(v)) = s.value() else {
            panic!("not a histogram");
        };
        assert_eq!(v[0].0, Quantile::PCT50);
        assert_eq!(v[0].1.lower(), 4.0);
        assert_eq!(v[1].1.upper(), 4.0_f64.next_up());
    }
}
