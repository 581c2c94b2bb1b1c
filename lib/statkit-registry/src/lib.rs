/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod error;
pub use error::{RegistryError, SamplerError};

mod value;
pub use value::{Statistic, StatisticType, StatisticValue, Table};

mod statistic;
pub use statistic::{
    CounterStatistic, GaugeStatistic, HistogramStatistic, TableStatistic, ValueStatistic,
    WeakStatistic, counter, gauge, table,
};

mod registry;
pub use registry::StatisticRegistry;

mod sources;
pub use sources::{StatisticSources, ValueStatisticDescriptor};

mod sampler;
pub use sampler::{HistogramLatencyObserver, LatencyObserver, LatencySampler, LatencyToken};
