//! Error types for keypulse.

use thiserror::Error;

use crate::chord::KeySpec;

/// Main error type for keypulse operations.
#[derive(Error, Debug)]
pub enum KeypulseError {
    /// The platform input-injection facility could not be opened.
    #[error("input injection unavailable: {0}")]
    CapabilityMissing(String),

    /// A single synthetic key event was rejected.
    #[error("failed to inject {key}: {reason}")]
    Injection {
        /// Key the event was issued for.
        key: KeySpec,
        /// Reason reported by the backend.
        reason: String,
    },

    /// Invalid run phase transition attempted.
    #[error("invalid phase transition from {from} to {to}")]
    InvalidTransition {
        from: crate::controller::RunPhase,
        to: crate::controller::RunPhase,
    },
}

/// Convenience Result type for keypulse operations.
pub type Result<T> = std::result::Result<T, KeypulseError>;
