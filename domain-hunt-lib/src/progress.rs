//! Percent-complete and ETA estimation.
//!
//! The estimate is a plain running average over this run: elapsed time
//! divided by candidates processed since start-up, multiplied by what is
//! left. It is recomputed from scratch after every batch and never persisted.

use serde::Serialize;
use std::time::{Duration, Instant};

/// Tracks one run's progress through the candidate set.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: usize,
    start_index: usize,
    started: Instant,
}

/// Point-in-time view of a run's progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    /// Candidates done overall, including those skipped by resuming
    pub completed: usize,
    pub total: usize,
    pub percent: f64,

    /// `None` until at least one candidate has been processed in this run
    pub eta: Option<Duration>,

    /// Last candidate of the batch that just finished
    pub current: String,
}

impl ProgressTracker {
    pub fn new(total: usize, start_index: usize) -> Self {
        Self {
            total,
            start_index,
            started: Instant::now(),
        }
    }

    /// Snapshot after `completed` candidates, timed from construction.
    pub fn snapshot(&self, completed: usize, current: &str) -> ProgressSnapshot {
        self.snapshot_at(completed, self.started.elapsed(), current)
    }

    /// Snapshot after `completed` candidates with an explicit elapsed time.
    pub fn snapshot_at(
        &self,
        completed: usize,
        elapsed: Duration,
        current: &str,
    ) -> ProgressSnapshot {
        let completed = completed.min(self.total);
        let percent = if self.total == 0 {
            100.0
        } else {
            completed as f64 / self.total as f64 * 100.0
        };

        let processed = completed.saturating_sub(self.start_index);
        let eta = if processed == 0 {
            None
        } else {
            let remaining = (self.total - completed) as f64;
            Some(elapsed.mul_f64(remaining / processed as f64))
        };

        ProgressSnapshot {
            completed,
            total: self.total,
            percent,
            eta,
            current: current.to_string(),
        }
    }
}

/// Render a duration as `H:MM:SS`, with a day prefix past 24 hours.
pub fn format_eta(eta: Duration) -> String {
    let secs = eta.as_secs();
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    match days {
        0 => format!("{}:{:02}:{:02}", hours, minutes, seconds),
        1 => format!("1 day, {}:{:02}:{:02}", hours, minutes, seconds),
        n => format!("{} days, {}:{:02}:{:02}", n, hours, minutes, seconds),
    }
}
