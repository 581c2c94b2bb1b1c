/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::{
    BiasedHistogram, HistogramError, HistogramRecorder, HistogramStats, Quantile, RetentionWindow,
    WindowedHistogram,
};

#[derive(Clone, Debug, PartialEq)]
pub struct HistogramMetricsConfig {
    bias: f64,
    bars: usize,
    window: Option<Duration>,
    quantile_list: BTreeSet<Quantile>,
    refresh_interval: Duration,
}

impl HistogramMetricsConfig {
    pub fn new(bias: f64, bars: usize) -> Self {
        HistogramMetricsConfig {
            bias,
            bars,
            ..Default::default()
        }
    }

    #[inline]
    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    #[inline]
    pub fn set_bars(&mut self, bars: usize) {
        self.bars = bars;
    }

    /// `None` keeps every sample.
    #[inline]
    pub fn set_window(&mut self, window: Option<Duration>) {
        self.window = window;
    }

    #[inline]
    pub fn set_quantile_list(&mut self, list: BTreeSet<Quantile>) {
        self.quantile_list = list;
    }

    #[inline]
    pub fn set_refresh_interval(&mut self, dur: Duration) {
        self.refresh_interval = dur;
    }

    #[inline]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    #[inline]
    pub fn bars(&self) -> usize {
        self.bars
    }

    #[inline]
    pub fn window(&self) -> Option<Duration> {
        self.window
    }

    #[inline]
    pub fn quantile_list(&self) -> &BTreeSet<Quantile> {
        &self.quantile_list
    }

    #[inline]
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    /// The window in milliseconds, the time unit of spawned histograms.
    pub fn retention_window(&self) -> RetentionWindow {
        match self.window {
            Some(dur) => {
                RetentionWindow::Span(u64::try_from(dur.as_millis()).unwrap_or(u64::MAX))
            }
            None => RetentionWindow::Unbounded,
        }
    }

    pub fn build(&self) -> Result<BiasedHistogram, HistogramError> {
        BiasedHistogram::new(self.bias, self.bars, self.retention_window())
    }

    pub fn build_spawned(
        &self,
        handle: Option<Handle>,
    ) -> Result<(HistogramRecorder, Arc<HistogramStats>), HistogramError> {
        let (h, r) = WindowedHistogram::new(self.build()?, self.refresh_interval);
        let stats = if self.quantile_list.is_empty() {
            Arc::new(HistogramStats::default())
        } else {
            Arc::new(HistogramStats::with_quantiles(&self.quantile_list))
        };
        h.spawn_refresh(Arc::clone(&stats), handle);
        Ok((r, stats))
    }
}

impl Default for HistogramMetricsConfig {
    fn default() -> Self {
        HistogramMetricsConfig {
            bias: 1.0,
            bars: 100,
            window: Some(Duration::from_secs(60)),
            quantile_list: BTreeSet::new(),
            refresh_interval: Duration::from_secs(4),
        }
    }
}
