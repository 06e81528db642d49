// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Scoped wall-clock profiling.
//!
//! A [`ProfilingFrame`] collects [`ScopeRecord`]s from any number of threads
//! through a multi-producer channel. [`ProfilingFrame::finish`] drains the
//! records into a [`FrameReport`] and starts a new frame.
//!
//! Nesting depth is tracked per frame, not per thread, so scopes recorded
//! concurrently from several threads get interleaved depths. `finish` must
//! only be called by one collector at a time.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex};
use std::time::{Duration, Instant};

/// One finished scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeRecord {
    pub name: &'static str,
    pub depth: usize,
    pub start: Instant,
    pub duration: Duration,
}

/// Records the lifetime of a scope into its frame when dropped.
#[must_use = "a profile scope records nothing unless it is held until the end of the scope"]
pub struct ProfileScope<'a> {
    frame: &'a ProfilingFrame,
    name: &'static str,
    depth: usize,
    start: Instant,
}

impl Drop for ProfileScope<'_> {
    fn drop(&mut self) {
        self.frame.end_scope(ScopeRecord {
            name: self.name,
            depth: self.depth,
            start: self.start,
            duration: self.start.elapsed(),
        });
    }
}

/// Collects scope records for one frame at a time.
#[derive(Debug)]
pub struct ProfilingFrame {
    name: String,
    depth: AtomicUsize,
    sender: mpsc::Sender<ScopeRecord>,
    receiver: Mutex<mpsc::Receiver<ScopeRecord>>,
    started: Mutex<Instant>,
}

impl ProfilingFrame {
    pub fn new(name: impl Into<String>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            name: name.into(),
            depth: AtomicUsize::new(0),
            sender,
            receiver: Mutex::new(receiver),
            started: Mutex::new(Instant::now()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opens a scope that is recorded when the returned guard drops.
    pub fn scope(&self, name: &'static str) -> ProfileScope<'_> {
        let depth = self.depth.fetch_add(1, Ordering::Relaxed);
        ProfileScope {
            frame: self,
            name,
            depth,
            start: Instant::now(),
        }
    }

    fn end_scope(&self, record: ScopeRecord) {
        // The receiver lives as long as the frame, so sending cannot fail.
        let _ = self.sender.send(record);
        // A scope still open across `finish` must not wrap the reset counter.
        let _ = self
            .depth
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |d| Some(d.saturating_sub(1)));
    }

    /// Drains every recorded scope and starts a new frame.
    pub fn finish(&self) -> FrameReport {
        let end = Instant::now();
        let mut scopes: Vec<ScopeRecord> = match self.receiver.lock() {
            Ok(receiver) => receiver.try_iter().collect(),
            Err(poisoned) => poisoned.into_inner().try_iter().collect(),
        };
        scopes.sort_by_key(|s| (s.start, s.depth));

        let mut started = match self.started.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let duration = end.saturating_duration_since(*started);
        *started = Instant::now();
        self.depth.store(0, Ordering::Relaxed);

        FrameReport {
            name: self.name.clone(),
            duration,
            scopes,
        }
    }
}

/// The scopes of one finished frame, ordered by start time.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub name: String,
    pub duration: Duration,
    pub scopes: Vec<ScopeRecord>,
}

impl FrameReport {
    /// Frames per second implied by the frame duration.
    pub fn fps(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            1.0 / secs
        } else {
            0.0
        }
    }

    /// Total time of all scopes with the given name.
    pub fn total(&self, name: &str) -> Duration {
        self.scopes
            .iter()
            .filter(|s| s.name == name)
            .map(|s| s.duration)
            .sum()
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} frame: {:.2} fps ({:.2} ms)",
            self.name,
            self.fps(),
            millis(self.duration)
        )?;
        for scope in &self.scopes {
            writeln!(
                f,
                "    {}{}: {:.2} ms",
                "    ".repeat(scope.depth),
                scope.name,
                millis(scope.duration)
            )?;
        }
        Ok(())
    }
}
