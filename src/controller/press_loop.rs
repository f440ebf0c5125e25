//! The timed key-press loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::session::{SessionState, StopReason, Summary};
use crate::chord::{Chord, KeyInjector, KeySpec};
use crate::Result;

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSettings {
    /// Pause after each chord.
    pub interval: Duration,
    /// Stop after this many delivered chords. `None` runs until stopped.
    pub max_presses: Option<u64>,
    /// Chord to press.
    pub chord: Chord,
    /// Give up after this many failed attempts in a row. `None` never gives up.
    pub max_consecutive_failures: Option<u32>,
}

impl LoopSettings {
    /// Settings for the default chord with no failure limit.
    pub fn new(interval: Duration, max_presses: Option<u64>) -> Self {
        Self {
            interval,
            max_presses,
            chord: Chord::default(),
            max_consecutive_failures: None,
        }
    }

    pub fn with_chord(mut self, chord: Chord) -> Self {
        self.chord = chord;
        self
    }

    pub fn with_max_consecutive_failures(mut self, limit: u32) -> Self {
        self.max_consecutive_failures = Some(limit);
        self
    }
}

/// Requests a running controller to stop.
///
/// Cheap to clone and safe to trigger from another task, e.g. a signal
/// listener. Triggering more than once has no further effect.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Presses a chord on a fixed interval until a limit or a stop request.
pub struct Controller<I> {
    injector: I,
    chord: Chord,
    max_consecutive_failures: Option<u32>,
    session: SessionState,
    stop_tx: Arc<watch::Sender<bool>>,
    stop_rx: watch::Receiver<bool>,
}

impl<I: KeyInjector> Controller<I> {
    /// Create an idle controller. Nothing is injected until [`start`](Self::start).
    pub fn new(settings: LoopSettings, injector: I) -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            injector,
            chord: settings.chord,
            max_consecutive_failures: settings.max_consecutive_failures,
            session: SessionState::new(settings.interval, settings.max_presses),
            stop_tx: Arc::new(tx),
            stop_rx: rx,
        }
    }

    /// Handle for stopping the run from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            tx: Arc::clone(&self.stop_tx),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn injector(&self) -> &I {
        &self.injector
    }

    /// Wait `delay`, then press the chord every interval until the press
    /// limit is reached, too many attempts fail in a row, or a stop is
    /// requested.
    ///
    /// A controller runs once. Calling this again after it has started
    /// returns the current summary without injecting anything.
    pub async fn start(&mut self, delay: Duration) -> Summary {
        if let Err(e) = self.session.begin_delay() {
            warn!("controller already started: {}", e);
            return self.session.summary();
        }

        info!("Chord: {}", self.chord);
        if !self.chord.modifier.is_modifier() {
            warn!(
                "'{}' is not a modifier key; the chord will press two ordinary keys",
                self.chord.modifier
            );
        }
        info!("Interval: {:?}", self.session.interval());
        match self.session.max_presses() {
            Some(max) => info!("Max presses: {}", max),
            None => info!("Max presses: unlimited"),
        }
        info!("Starting in {:?}, focus the target window now", delay);

        if !self.wait(delay).await {
            return self.finish(StopReason::Interrupted);
        }

        // Delaying -> Looping is always valid here.
        if let Err(e) = self.session.begin_loop() {
            error!("could not enter press loop: {}", e);
            return self.finish(StopReason::Interrupted);
        }
        info!("Started");

        while self.session.is_running() {
            if self.session.limit_reached() {
                return self.finish(StopReason::MaxPressesReached);
            }

            self.press_chord().await;

            if let Some(limit) = self.max_consecutive_failures {
                if self.session.consecutive_failures() >= limit {
                    return self.finish(StopReason::TooManyFailures);
                }
            }

            if !self.wait(self.session.interval()).await {
                return self.finish(StopReason::Interrupted);
            }
        }

        self.session.summary()
    }

    /// Press and release the chord once.
    ///
    /// Returns `true` if every key event was delivered. A failure is logged
    /// and counted but never aborts the caller. Returns `false` without
    /// injecting when the press limit has already been reached.
    pub async fn press_chord(&mut self) -> bool {
        if self.session.limit_reached() {
            debug!("press limit reached, chord not sent");
            return false;
        }

        match self.send_chord().await {
            Ok(()) => {
                self.session.record_success();
                info!("Pressed {} ({})", self.chord, self.session.press_count());
                true
            }
            Err(e) => {
                self.session.record_failure();
                error!(
                    failures = self.session.failed_count(),
                    "Error pressing {}: {}", self.chord, e
                );
                false
            }
        }
    }

    /// Stop the run and report the final counts.
    ///
    /// Idempotent: later calls return the same summary.
    pub fn stop(&mut self) -> Summary {
        self.stop_tx.send_replace(true);
        if self.session.phase().is_terminal() {
            return self.session.summary();
        }
        self.finish(StopReason::Interrupted)
    }

    async fn send_chord(&mut self) -> Result<()> {
        let Chord {
            modifier,
            action,
            hold,
        } = self.chord;

        self.injector.key_down(modifier)?;
        if let Err(e) = self.injector.key_down(action) {
            self.release(modifier);
            return Err(e);
        }

        sleep(hold).await;

        let action_up = self.injector.key_up(action);
        if action_up.is_err() {
            self.release(modifier);
            return action_up;
        }
        self.injector.key_up(modifier)
    }

    /// Best-effort release so a failed chord does not leave a key held.
    fn release(&mut self, key: KeySpec) {
        if let Err(e) = self.injector.key_up(key) {
            warn!("could not release {}: {}", key, e);
        }
    }

    /// Sleep for `duration` unless a stop is requested first.
    ///
    /// Returns `false` if the wait was cut short by a stop request.
    async fn wait(&mut self, duration: Duration) -> bool {
        let rx = &mut self.stop_rx;
        tokio::select! {
            biased;
            _ = rx.wait_for(|stopped| *stopped) => false,
            _ = sleep(duration) => true,
        }
    }

    fn finish(&mut self, reason: StopReason) -> Summary {
        if self.session.finish(reason) {
            let count = self.session.press_count();
            match reason {
                StopReason::TooManyFailures => error!(
                    consecutive = self.session.consecutive_failures(),
                    "Stopping: {} ({} presses)", reason, count
                ),
                _ => info!("Stopping: {} ({} presses)", reason, count),
            }
        }
        self.session.summary()
    }
}
