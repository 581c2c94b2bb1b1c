/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::fmt;

use statkit_histogram::{Quantile, QuantileBounds};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatisticType {
    Counter,
    Gauge,
    Table,
    Histogram,
}

impl StatisticType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StatisticType::Counter => "counter",
            StatisticType::Gauge => "gauge",
            StatisticType::Table => "table",
            StatisticType::Histogram => "histogram",
        }
    }
}

impl fmt::Display for StatisticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named rows of named numeric columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    rows: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    pub fn set(&mut self, row: &str, column: &str, value: f64) {
        self.rows
            .entry(row.to_string())
            .or_default()
            .insert(column.to_string(), value);
    }

    pub fn with(mut self, row: &str, column: &str, value: f64) -> Self {
        self.set(row, column, value);
        self
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(column)).copied()
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, f64>)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StatisticValue {
    Counter(u64),
    Gauge(f64),
    Table(Table),
    Histogram(Vec<(Quantile, QuantileBounds)>),
}

impl StatisticValue {
    pub fn statistic_type(&self) -> StatisticType {
        match self {
            StatisticValue::Counter(_) => StatisticType::Counter,
            StatisticValue::Gauge(_) => StatisticType::Gauge,
            StatisticValue::Table(_) => StatisticType::Table,
            StatisticValue::Histogram(_) => StatisticType::Histogram,
        }
    }
}

/// A value read from a registered statistic at a given time.
#[derive(Clone, Debug, PartialEq)]
pub struct Statistic {
    statistic_type: StatisticType,
    time: u64,
    value: Option<StatisticValue>,
}

impl Statistic {
    pub(crate) fn new(
        statistic_type: StatisticType,
        time: u64,
        value: Option<StatisticValue>,
    ) -> Self {
        Statistic {
            statistic_type,
            time,
            value,
        }
    }

    #[inline]
    pub fn statistic_type(&self) -> StatisticType {
        self.statistic_type
    }

    #[inline]
    pub fn time(&self) -> u64 {
        self.time
    }

    /// `None` if the source of the statistic is gone.
    #[inline]
    pub fn value(&self) -> Option<&StatisticValue> {
        self.value.as_ref()
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table() {
        let t = Table::new()
            .with("get", "hit", 10.0)
            .with("get", "miss", 2.0)
            .with("put", "ok", 5.0);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.get("get", "miss"), Some(2.0));
        assert_eq!(t.get("put", "miss"), None);
        let names: Vec<&str> = t.rows().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["get", "put"]);
    }

    #[test]
    fn value_type() {
        assert_eq!(
            StatisticValue::Gauge(1.5).statistic_type(),
            StatisticType::Gauge
        );
        assert_eq!(
            StatisticValue::Table(Table::new()).statistic_type(),
            StatisticType::Table
        );
        assert_eq!(StatisticType::Histogram.to_string(), "histogram");
    }
}
