/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::time::Instant;

use log::warn;
use statkit_histogram::SharedHistogram;

use crate::SamplerError;

/// Receives latencies, in nanoseconds, of sampled operations.
pub trait LatencyObserver: Send + Sync {
    fn event(&self, latency: u64);
}

/// Start of one sampled operation.
#[derive(Debug)]
pub struct LatencyToken {
    start: Instant,
}

/// Measures the latency of a random share of the operations ending with a
/// target outcome.
pub struct LatencySampler<T> {
    target: T,
    probability: f64,
    observers: Vec<Arc<dyn LatencyObserver>>,
}

impl<T: PartialEq> LatencySampler<T> {
    pub fn new(target: T, probability: f64) -> Result<Self, SamplerError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(SamplerError::InvalidProbability(probability));
        }
        Ok(LatencySampler {
            target,
            probability,
            observers: Vec::new(),
        })
    }

    #[inline]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn add_observer(&mut self, observer: Arc<dyn LatencyObserver>) {
        self.observers.push(observer);
    }

    /// Start an operation, returning `None` if it is not sampled.
    pub fn begin(&self) -> Option<LatencyToken> {
        if fastrand::f64() < self.probability {
            Some(LatencyToken {
                start: Instant::now(),
            })
        } else {
            None
        }
    }

    pub fn end(&self, token: Option<LatencyToken>, outcome: T) {
        let Some(token) = token else {
            return;
        };
        if outcome != self.target {
            return;
        }
        let latency = u64::try_from(token.start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        for observer in &self.observers {
            observer.event(latency);
        }
    }

    pub fn end_with_parameter(&self, token: Option<LatencyToken>, outcome: T, _parameter: u64) {
        self.end(token, outcome);
    }
}

/// Records latencies into a histogram, stamped with milliseconds since
/// creation.
pub struct HistogramLatencyObserver {
    histogram: SharedHistogram,
    origin: Instant,
}

impl HistogramLatencyObserver {
    pub fn new(histogram: SharedHistogram) -> Self {
        HistogramLatencyObserver {
            histogram,
            origin: Instant::now(),
        }
    }
}

impl LatencyObserver for HistogramLatencyObserver {
    fn event(&self, latency: u64) {
        let time = u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX);
        if let Err(e) = self.histogram.record(latency as f64, time) {
            warn!("failed to record latency {latency}ns: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use statkit_histogram::BiasedHistogram;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Outcome {
        Hit,
        Miss,
    }

    #[derive(Default)]
    struct Collect {
        events: Mutex<Vec<u64>>,
    }

    impl LatencyObserver for Collect {
        fn event(&self, latency: u64) {
            self.events.lock().unwrap().push(latency);
        }
    }

    #[test]
    fn invalid_probability() {
        assert!(matches!(
            LatencySampler::new(Outcome::Hit, 1.5),
            Err(SamplerError::InvalidProbability(_))
        ));
        assert!(LatencySampler::new(Outcome::Hit, -0.1).is_err());
        assert!(LatencySampler::new(Outcome::Hit, f64::NAN).is_err());
    }

    #[test]
    fn always_sampled() {
        let collect = Arc::new(Collect::default());
        let mut sampler = LatencySampler::new(Outcome::Hit, 1.0).unwrap();
        sampler.add_observer(collect.clone());

        for _ in 0..10 {
            let token = sampler.begin();
            assert!(token.is_some());
            sampler.end(token, Outcome::Hit);
        }
        sampler.end(sampler.begin(), Outcome::Miss);
        sampler.end_with_parameter(sampler.begin(), Outcome::Hit, 99);
        assert_eq!(collect.events.lock().unwrap().len(), 11);
    }

    #[test]
    fn never_sampled() {
        let collect = Arc::new(Collect::default());
        let mut sampler = LatencySampler::new(Outcome::Hit, 0.0).unwrap();
        sampler.add_observer(collect.clone());
        for _ in 0..100 {
            let token = sampler.begin();
            assert!(token.is_none());
            sampler.end(token, Outcome::Hit);
        }
        assert!(collect.events.lock().unwrap().is_empty());
    }

    #[test]
    fn partly_sampled() {
        let collect = Arc::new(Collect::default());
        let mut sampler = LatencySampler::new(Outcome::Hit, 0.5).unwrap();
        sampler.add_observer(collect.clone());
        for _ in 0..10000 {
            sampler.end(sampler.begin(), Outcome::Hit);
        }
        let n = collect.events.lock().unwrap().len();
        assert!(n > 4000 && n < 6000, "sampled {n}");
    }

    #[test]
    fn into_histogram() {
        let h = SharedHistogram::new(BiasedHistogram::unbounded(1.0, 10).unwrap());
        let mut sampler = LatencySampler::new(Outcome::Hit, 1.0).unwrap();
        sampler.add_observer(Arc::new(HistogramLatencyObserver::new(h.clone())));
        for _ in 0..5 {
            let token = sampler.begin();
            std::thread::sleep(std::time::Duration::from_millis(1));
            sampler.end(token, Outcome::Hit);
        }
        assert_eq!(h.count(), 5);
        assert!(h.quantile_bounds(0.0).unwrap().lower() >= 1_000_000.0);
    }

    #[test]
    fn extreme_latencies_recorded() {
        let h = SharedHistogram::new(BiasedHistogram::unbounded(1.0, 10).unwrap());
        let observer = HistogramLatencyObserver::new(h.clone());
        observer.event(0);
        observer.event(u64::MAX);
        assert_eq!(h.count(), 2);
        let b = h.quantile_bounds(1.0).unwrap();
        assert!(b.upper().is_finite());
        assert!(b.upper() > u64::MAX as f64);
    }
}
