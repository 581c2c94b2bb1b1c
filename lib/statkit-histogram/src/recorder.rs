/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::Instant;

use tokio::sync::mpsc;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    pub value: f64,
    pub time: u64,
}

/// Sending side of a [`WindowedHistogram`](crate::WindowedHistogram).
///
/// Timestamps are milliseconds since the histogram was created.
#[derive(Clone)]
pub struct HistogramRecorder {
    sender: mpsc::UnboundedSender<Observation>,
    origin: Instant,
}

impl HistogramRecorder {
    pub(crate) fn new(sender: mpsc::UnboundedSender<Observation>, origin: Instant) -> Self {
        HistogramRecorder { sender, origin }
    }

    /// Record `value` stamped with the current time.
    pub fn record(&self, value: f64) -> Result<(), mpsc::error::SendError<Observation>> {
        let time = crate::elapsed_millis(self.origin);
        self.record_at(value, time)
    }

    pub fn record_at(
        &self,
        value: f64,
        time: u64,
    ) -> Result<(), mpsc::error::SendError<Observation>> {
        self.sender.send(Observation { value, time })
    }
}
