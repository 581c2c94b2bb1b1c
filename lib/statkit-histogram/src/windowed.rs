/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::recorder::Observation;
use crate::{BiasedHistogram, HistogramError, HistogramRecorder, HistogramStats};

/// Receiving side of a histogram fed through [`HistogramRecorder`]s.
pub struct WindowedHistogram {
    refresh_interval: Duration,
    inner: BiasedHistogram,
    receiver: mpsc::UnboundedReceiver<Observation>,
    origin: Instant,
    rejected: u64,
}

impl WindowedHistogram {
    /// The retention window of `inner` is taken to be in milliseconds.
    pub fn new(inner: BiasedHistogram, refresh_interval: Duration) -> (Self, HistogramRecorder) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let origin = Instant::now();
        (
            WindowedHistogram {
                refresh_interval,
                inner,
                receiver,
                origin,
                rejected: 0,
            },
            HistogramRecorder::new(sender, origin),
        )
    }

    #[inline]
    pub fn inner(&self) -> &BiasedHistogram {
        &self.inner
    }

    /// Number of observations dropped for being NaN or infinite.
    #[inline]
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    fn record(&mut self, o: Observation) {
        if let Err(HistogramError::NonFiniteValue(v)) = self.inner.record(o.value, o.time) {
            self.rejected += 1;
            if self.rejected == 1 {
                warn!("dropped non-finite observation {v}");
            }
        }
    }

    /// Record all pending observations and expire as of now, returning how
    /// many were received.
    pub fn refresh(&mut self) -> usize {
        use mpsc::error::TryRecvError;

        let mut received = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(o) => {
                    self.record(o);
                    received += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.inner.expire(crate::elapsed_millis(self.origin));
        received
    }

    pub fn spawn_refresh(mut self, stats: Arc<HistogramStats>, handle: Option<Handle>) {
        let handle = handle.unwrap_or_else(Handle::current);
        handle.spawn(async move {
            const BATCH_SIZE: usize = 16;
            let mut buf = Vec::with_capacity(BATCH_SIZE);
            let mut refresh_interval = tokio::time::interval(self.refresh_interval);

            loop {
                tokio::select! {
                    biased;

                    n = self.receiver.recv_many(&mut buf, BATCH_SIZE) => {
                        if n == 0 {
                            break;
                        }
                        for o in buf.drain(..) {
                            self.record(o);
                        }
                    }
                    _ = refresh_interval.tick() => {
                        self.inner.expire(crate::elapsed_millis(self.origin));
                        stats.update(&self.inner);
                    }
                }
            }

            stats.update(&self.inner);
            debug!(
                "all recorders dropped, histogram refresh quit after {} rejected observations",
                self.rejected
            );
        });
    }
}
