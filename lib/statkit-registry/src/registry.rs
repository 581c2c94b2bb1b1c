/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use foldhash::fast::FixedState;
use log::debug;
use statkit_histogram::{Quantile, SharedHistogram};

use crate::statistic::{HistogramStatistic, counter, gauge, table};
use crate::{RegistryError, Statistic, Table, ValueStatistic};

type TimeSource = Box<dyn Fn() -> u64 + Send + Sync>;

/// Statistics registered under full names, read on demand.
pub struct StatisticRegistry {
    time_source: TimeSource,
    statistics: HashMap<String, Arc<dyn ValueStatistic>, FixedState>,
}

impl StatisticRegistry {
    pub fn new<F>(time_source: F) -> Self
    where
        F: Fn() -> u64 + Send + Sync + 'static,
    {
        StatisticRegistry {
            time_source: Box::new(time_source),
            statistics: HashMap::with_hasher(FixedState::with_seed(0)),
        }
    }

    /// A registry stamping queries with wall clock milliseconds.
    pub fn with_system_clock() -> Self {
        StatisticRegistry::new(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
                .unwrap_or(0)
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.statistics.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.statistics.is_empty()
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.statistics.contains_key(full_name)
    }

    pub fn register_statistic(
        &mut self,
        full_name: &str,
        statistic: Arc<dyn ValueStatistic>,
    ) -> Result<(), RegistryError> {
        match self.statistics.entry(full_name.to_string()) {
            Entry::Occupied(_) => Err(RegistryError::Duplicate(full_name.to_string())),
            Entry::Vacant(v) => {
                debug!(
                    "registered {} statistic {full_name}",
                    statistic.statistic_type()
                );
                v.insert(statistic);
                Ok(())
            }
        }
    }

    pub fn register_counter<F>(&mut self, full_name: &str, accessor: F) -> Result<(), RegistryError>
    where
        F: Fn() -> u64 + Send + Sync + 'static,
    {
        self.register_statistic(full_name, Arc::new(counter(accessor)))
    }

    pub fn register_gauge<F>(&mut self, full_name: &str, accessor: F) -> Result<(), RegistryError>
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        self.register_statistic(full_name, Arc::new(gauge(accessor)))
    }

    pub fn register_table<F>(&mut self, full_name: &str, accessor: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Table + Send + Sync + 'static,
    {
        self.register_statistic(full_name, Arc::new(table(accessor)))
    }

    pub fn register_histogram(
        &mut self,
        full_name: &str,
        histogram: SharedHistogram,
        quantiles: Vec<Quantile>,
    ) -> Result<(), RegistryError> {
        self.register_statistic(
            full_name,
            Arc::new(HistogramStatistic::new(histogram, quantiles)),
        )
    }

    pub fn query_statistic(&self, full_name: &str) -> Option<Statistic> {
        let statistic = self.statistics.get(full_name)?;
        let now = (self.time_source)();
        Some(extract(statistic.as_ref(), now))
    }

    /// Read every registered statistic, all stamped with the same time.
    pub fn query_statistics(&self) -> HashMap<String, Statistic, FixedState> {
        let now = (self.time_source)();
        let mut map = HashMap::with_capacity_and_hasher(
            self.statistics.len(),
            FixedState::with_seed(0),
        );
        for (name, statistic) in &self.statistics {
            map.insert(name.clone(), extract(statistic.as_ref(), now));
        }
        map
    }
}

fn extract(statistic: &dyn ValueStatistic, now: u64) -> Statistic {
    Statistic::new(statistic.statistic_type(), now, statistic.value())
}
