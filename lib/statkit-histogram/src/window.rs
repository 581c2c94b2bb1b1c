/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::VecDeque;
use std::fmt;

/// Number of epochs a bounded window is divided into.
pub const EPOCH_SLOTS: usize = 8;

/// How long recorded samples are retained, in the caller's time unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetentionWindow {
    Unbounded,
    Span(u64),
}

impl RetentionWindow {
    /// Samples recorded before the returned time are expired at `now`.
    pub fn cutoff(&self, now: u64) -> Option<u64> {
        match self {
            RetentionWindow::Unbounded => None,
            RetentionWindow::Span(span) => Some(now.saturating_sub(*span)),
        }
    }

    fn epoch_width(&self) -> u64 {
        match self {
            RetentionWindow::Unbounded => u64::MAX,
            RetentionWindow::Span(span) => span.div_ceil(EPOCH_SLOTS as u64).max(1),
        }
    }
}

impl fmt::Display for RetentionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionWindow::Unbounded => f.write_str("unbounded"),
            RetentionWindow::Span(span) => write!(f, "{span}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Epoch {
    id: u64,
    latest: u64,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    At(usize),
    Append,
}

/// Ring of live epochs, oldest first.
///
/// Every bar keeps one count per live epoch, in the same order, so dropping
/// an epoch here removes the same samples from all bars.
#[derive(Debug)]
pub(crate) struct EpochTracker {
    window: RetentionWindow,
    width: u64,
    epochs: VecDeque<Epoch>,
}

impl EpochTracker {
    pub(crate) fn new(window: RetentionWindow) -> Self {
        EpochTracker {
            window,
            width: window.epoch_width(),
            epochs: VecDeque::with_capacity(EPOCH_SLOTS + 1),
        }
    }

    #[inline]
    pub(crate) fn window(&self) -> RetentionWindow {
        self.window
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.epochs.len()
    }

    pub(crate) fn clear(&mut self) {
        self.epochs.clear();
    }

    /// Whether a sample taken at `time` is already behind the cutoff set by
    /// the newest live sample.
    pub(crate) fn is_stale(&self, time: u64) -> bool {
        let Some(newest) = self.epochs.back() else {
            return false;
        };
        self.window
            .cutoff(newest.latest)
            .is_some_and(|cutoff| time < cutoff)
    }

    /// Find the epoch a sample taken at `time` belongs to.
    ///
    /// A sample that matches no live epoch but is older than the newest one
    /// is folded into the next newer epoch, which delays its expiry by at
    /// most one epoch width. Stale samples must be filtered out first.
    pub(crate) fn place(&mut self, time: u64) -> Placement {
        let id = time / self.width;
        let Some(newest) = self.epochs.back() else {
            self.epochs.push_back(Epoch { id, latest: time });
            return Placement::Append;
        };
        if id > newest.id {
            self.epochs.push_back(Epoch { id, latest: time });
            return Placement::Append;
        }

        let index = self.epochs.partition_point(|e| e.id < id);
        let epoch = &mut self.epochs[index];
        epoch.latest = epoch.latest.max(time);
        Placement::At(index)
    }

    #[inline]
    pub(crate) fn overflowing(&self) -> bool {
        self.epochs.len() > EPOCH_SLOTS + 1
    }

    /// Join the two oldest epochs into one.
    pub(crate) fn coalesce_oldest(&mut self) {
        if self.epochs.len() < 2 {
            return;
        }
        if let Some(oldest) = self.epochs.pop_front() {
            let next = &mut self.epochs[0];
            next.latest = next.latest.max(oldest.latest);
        }
    }

    /// Drop the epochs whose samples are all older than the cutoff at `now`,
    /// returning how many were dropped from the front of the ring.
    pub(crate) fn expire(&mut self, now: u64) -> usize {
        let Some(cutoff) = self.window.cutoff(now) else {
            return 0;
        };
        let mut dropped = 0;
        while let Some(epoch) = self.epochs.front() {
            if epoch.latest >= cutoff {
                break;
            }
            self.epochs.pop_front();
            dropped += 1;
        }
        dropped
    }
}
