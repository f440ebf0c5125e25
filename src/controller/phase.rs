//! Run phase state machine.

/// Lifecycle phase of a key-press run.
///
/// Phases only move forward; a stopped run is never restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    /// Configured but not started.
    #[default]
    Idle,
    /// Waiting out the startup delay.
    Delaying,
    /// Pressing the chord on every interval.
    Looping,
    /// Finished; counts are final.
    Stopped,
}

impl RunPhase {
    /// Check if transition to target phase is valid.
    ///
    /// Valid transitions:
    /// - Idle -> Delaying
    /// - Delaying -> Looping
    /// - Idle | Delaying | Looping -> Stopped
    pub fn can_transition_to(&self, target: RunPhase) -> bool {
        use RunPhase::*;
        matches!(
            (*self, target),
            (Idle, Delaying) | (Delaying, Looping) | (Idle | Delaying | Looping, Stopped)
        )
    }

    /// Attempt to transition to a new phase.
    ///
    /// Returns `Ok(())` if the transition is valid, or an error otherwise.
    pub fn transition_to(&mut self, target: RunPhase) -> crate::Result<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(crate::error::KeypulseError::InvalidTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if this is the terminal phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Stopped)
    }
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunPhase::Idle => "idle",
            RunPhase::Delaying => "delaying",
            RunPhase::Looping => "looping",
            RunPhase::Stopped => "stopped",
        };
        f.write_str(name)
    }
}
