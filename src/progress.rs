/*
progress.rs

Copyright 2025 Hervé Quatremain

This file is part of Impostori.

Impostori is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Impostori is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Impostori. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Report the progress of long operations.
//!
//! The generator and the pruner report the number of operations completed (seeding attempts,
//! edges evaluated) to a [`Progress`] object. They do not depend on how the progress is shown.

use chrono::{DateTime, Local};
use log::info;
use std::time::{Duration, Instant, SystemTime};

/// Receiver of progress counters.
pub trait Progress {
    /// Start a new operation that should take `expected_ops` steps.
    fn start(&mut self, description: &str, expected_ops: usize);

    /// Record that `ops` more steps are done. Return `true` when the progress has been reported.
    fn increment(&mut self, ops: usize) -> bool;

    /// Close the current operation.
    fn finish(&mut self);
}

/// Ignore the progress.
#[derive(Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&mut self, _description: &str, _expected_ops: usize) {}

    fn increment(&mut self, _ops: usize) -> bool {
        false
    }

    fn finish(&mut self) {}
}

/// Log the progress, at most once per update interval.
pub struct ProgressReporter {
    /// Number of steps done.
    pub current_ops: usize,

    /// Number of steps expected.
    pub end_ops: usize,

    pub description: String,

    /// Wall clock time when the operation started.
    pub start_time: SystemTime,

    /// Minimum duration between two reports.
    update_interval: Duration,

    start: Instant,
    last_report: Option<Instant>,
}

impl ProgressReporter {
    /// Create a [`ProgressReporter`] object.
    pub fn new(update_interval: Duration) -> Self {
        Self {
            current_ops: 0,
            end_ops: 0,
            description: String::new(),
            start_time: SystemTime::now(),
            update_interval,
            start: Instant::now(),
            last_report: None,
        }
    }

    /// Milliseconds since the operation started.
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Average duration of a step, in milliseconds.
    pub fn average_ms(&self) -> f64 {
        if self.current_ops == 0 {
            return 0.0;
        }
        self.elapsed_ms() as f64 / self.current_ops as f64
    }

    /// Estimated milliseconds before the operation completes.
    pub fn remaining_ms(&self) -> u64 {
        let remaining: usize = self.end_ops.saturating_sub(self.current_ops);
        (self.average_ms() * remaining as f64).round() as u64
    }

    /// Ratio of the steps done, between 0.0 and 1.0.
    pub fn progress(&self) -> f64 {
        if self.end_ops == 0 {
            return 1.0;
        }
        (self.current_ops as f64 / self.end_ops as f64).min(1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.current_ops >= self.end_ops
    }

    /// Format a duration in milliseconds as `HH:MM:SS.mmm`.
    pub fn format_ms(ms: u64) -> String {
        let hours: u64 = ms / 3_600_000;
        let minutes: u64 = ms / 60_000 % 60;
        let seconds: u64 = ms / 1000 % 60;
        format!("{hours:02}:{minutes:02}:{seconds:02}.{:03}", ms % 1000)
    }

    /// Format a point in time in the local time zone.
    pub fn format_date(date: SystemTime) -> String {
        let dt: DateTime<Local> = DateTime::from(date);
        format!("{}", dt.format("%Y-%m-%d %H:%M:%S"))
    }

    fn report(&mut self) {
        self.last_report = Some(Instant::now());
        info!(
            "{}: {}/{} ({:.1}%)  elapsed {}  remaining {}",
            self.description,
            self.current_ops,
            self.end_ops,
            self.progress() * 100.0,
            Self::format_ms(self.elapsed_ms()),
            Self::format_ms(self.remaining_ms())
        );
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl Progress for ProgressReporter {
    fn start(&mut self, description: &str, expected_ops: usize) {
        self.description = description.to_string();
        self.current_ops = 0;
        self.end_ops = expected_ops;
        self.start_time = SystemTime::now();
        self.start = Instant::now();
        self.last_report = None;
        info!(
            "{}: started at {}",
            self.description,
            Self::format_date(self.start_time)
        );
    }

    fn increment(&mut self, ops: usize) -> bool {
        self.current_ops += ops;
        let due: bool = self
            .last_report
            .is_none_or(|t| t.elapsed() >= self.update_interval);
        if due || self.is_complete() {
            self.report();
            return true;
        }
        false
    }

    fn finish(&mut self) {
        info!(
            "{}: done in {}",
            self.description,
            Self::format_ms(self.elapsed_ms())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_milliseconds() {
        assert_eq!(ProgressReporter::format_ms(0), "00:00:00.000");
        assert_eq!(ProgressReporter::format_ms(61_001), "00:01:01.001");
        assert_eq!(ProgressReporter::format_ms(3_723_456), "01:02:03.456");
    }

    #[test]
    fn ratio_and_completion() {
        let mut p: ProgressReporter = ProgressReporter::new(Duration::from_secs(3600));
        p.start("test", 4);
        assert_eq!(p.progress(), 0.0);
        assert!(!p.is_complete());
        // The first increment is always reported
        assert!(p.increment(1));
        assert!(!p.increment(1));
        assert_eq!(p.progress(), 0.5);
        // Reaching the end is always reported
        assert!(p.increment(2));
        assert!(p.is_complete());
        assert_eq!(p.remaining_ms(), 0);
        p.finish();
    }

    #[test]
    fn empty_operation_is_complete() {
        let mut p: ProgressReporter = ProgressReporter::default();
        p.start("nothing", 0);
        assert!(p.is_complete());
        assert_eq!(p.progress(), 1.0);
        assert_eq!(p.average_ms(), 0.0);
    }

    #[test]
    fn format_date_has_date_and_time() {
        let s: String = ProgressReporter::format_date(SystemTime::now());
        assert_eq!(s.len(), 19);
    }
}
