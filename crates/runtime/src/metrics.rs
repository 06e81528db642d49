// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Inference timing metrics.
//!
//! [`InferenceMetrics`] keeps the stage timings of the last successful call
//! and running totals across calls. It is always collected, independently of
//! the optional [`ProfilingFrame`](crate::ProfilingFrame).

use std::time::Duration;

/// Wall-clock time spent in each stage of one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct StageTimings {
    /// Input operators.
    pub preprocess: Duration,
    /// Copying or quantizing into the input tensor.
    pub load_input: Duration,
    /// Engine execution.
    pub invoke: Duration,
    /// Copying or dequantizing out of the output tensor.
    pub read_output: Duration,
    /// Output operators.
    pub postprocess: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.preprocess + self.load_input + self.invoke + self.read_output + self.postprocess
    }
}

/// Aggregate metrics for a runtime.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct InferenceMetrics {
    /// Successful calls.
    pub runs: u64,
    /// Failed calls.
    pub failures: u64,
    /// Stage timings of the most recent successful call.
    pub last: Option<StageTimings>,
    /// Sum of all successful calls' total time.
    pub total_duration: Duration,
    /// Sum of all successful calls' invoke time.
    pub total_invoke_duration: Duration,
}

impl InferenceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful call.
    pub fn record_success(&mut self, timings: StageTimings) {
        self.runs += 1;
        self.total_duration += timings.total();
        self.total_invoke_duration += timings.invoke;
        self.last = Some(timings);
    }

    /// Records a failed call.
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Mean total time per successful call.
    pub fn mean_duration(&self) -> Duration {
        match u32::try_from(self.runs) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.total_duration / n,
        }
    }

    /// Successful calls per second of accumulated call time.
    pub fn runs_per_second(&self) -> f64 {
        let secs = self.total_duration.as_secs_f64();
        if secs <= 0.0 || self.runs == 0 {
            return 0.0;
        }
        self.runs as f64 / secs
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        let ms = |d: Duration| d.as_secs_f64() * 1000.0;
        let invoke_pct = if self.total_duration.as_secs_f64() > 0.0 {
            (self.total_invoke_duration.as_secs_f64() / self.total_duration.as_secs_f64()) * 100.0
        } else {
            0.0
        };

        let mut s = format!(
            "Inference: {} runs ({} failed), {:.2}ms mean, {:.2}ms invoke ({:.0}%), {:.1} runs/s",
            self.runs,
            self.failures,
            ms(self.mean_duration()),
            ms(self.total_invoke_duration),
            invoke_pct,
            self.runs_per_second(),
        );
        if let Some(last) = &self.last {
            s.push_str(&format!(
                "\nLast run: preprocess {:.2}ms, load {:.2}ms, invoke {:.2}ms, read {:.2}ms, postprocess {:.2}ms",
                ms(last.preprocess),
                ms(last.load_input),
                ms(last.invoke),
                ms(last.read_output),
                ms(last.postprocess),
            ));
        }
        s
    }
}
