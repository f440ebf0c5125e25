//! Per-run configuration and progress.

use std::time::Duration;

use super::RunPhase;
use crate::Result;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured maximum number of presses was reached.
    MaxPressesReached,
    /// A stop was requested, usually by the operator pressing Ctrl+C.
    Interrupted,
    /// Too many press attempts failed in a row.
    TooManyFailures,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::MaxPressesReached => f.write_str("reached max presses"),
            StopReason::Interrupted => f.write_str("stopped by user"),
            StopReason::TooManyFailures => f.write_str("too many consecutive failures"),
        }
    }
}

/// Final outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Chords delivered successfully.
    pub press_count: u64,
    /// Chord attempts that failed.
    pub failed_count: u64,
    /// `None` while the run has not stopped.
    pub reason: Option<StopReason>,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Total presses: {}", self.press_count)?;
        if let Some(reason) = self.reason {
            write!(f, " ({})", reason)?;
        }
        if self.failed_count > 0 {
            write!(f, ", failed attempts: {}", self.failed_count)?;
        }
        Ok(())
    }
}

/// In-memory record of one run.
#[derive(Debug, Clone)]
pub struct SessionState {
    interval: Duration,
    max_presses: Option<u64>,
    press_count: u64,
    failed_count: u64,
    consecutive_failures: u32,
    running: bool,
    phase: RunPhase,
    stop_reason: Option<StopReason>,
}

impl SessionState {
    /// Create an idle session with zeroed counters.
    pub fn new(interval: Duration, max_presses: Option<u64>) -> Self {
        Self {
            interval,
            max_presses,
            press_count: 0,
            failed_count: 0,
            consecutive_failures: 0,
            running: false,
            phase: RunPhase::Idle,
            stop_reason: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_presses(&self) -> Option<u64> {
        self.max_presses
    }

    pub fn press_count(&self) -> u64 {
        self.press_count
    }

    pub fn failed_count(&self) -> u64 {
        self.failed_count
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Whether the press limit has been hit. Always false when unbounded.
    pub fn limit_reached(&self) -> bool {
        matches!(self.max_presses, Some(max) if self.press_count >= max)
    }

    /// Enter the startup delay.
    pub fn begin_delay(&mut self) -> Result<()> {
        self.phase.transition_to(RunPhase::Delaying)
    }

    /// Enter the press loop and mark the session running.
    pub fn begin_loop(&mut self) -> Result<()> {
        self.phase.transition_to(RunPhase::Looping)?;
        self.running = true;
        Ok(())
    }

    /// Count a delivered chord.
    pub fn record_success(&mut self) {
        self.press_count += 1;
        self.consecutive_failures = 0;
    }

    /// Count a failed chord attempt. It does not count toward the limit.
    pub fn record_failure(&mut self) {
        self.failed_count += 1;
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    /// Stop the session.
    ///
    /// Returns `false` without changing anything if it had already stopped,
    /// so the first reason sticks.
    pub fn finish(&mut self, reason: StopReason) -> bool {
        if self.phase.transition_to(RunPhase::Stopped).is_err() {
            return false;
        }
        self.running = false;
        self.stop_reason = Some(reason);
        true
    }

    pub fn summary(&self) -> Summary {
        Summary {
            press_count: self.press_count,
            failed_count: self.failed_count,
            reason: self.stop_reason,
        }
    }
}
