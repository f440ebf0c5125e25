//! Keyboard chord model and the input-injection seam.
//!
//! The controller never talks to the operating system directly. It drives a
//! [`KeyInjector`], which the binary backs with the native backend and tests
//! back with a recording double.

mod key;
#[cfg(feature = "native")]
mod native;

pub use key::{KeySpec, UnknownKey};
#[cfg(feature = "native")]
pub use native::NativeInjector;

use std::time::Duration;

use crate::Result;

/// How long the action key is held down by default.
pub const DEFAULT_HOLD: Duration = Duration::from_millis(50);

/// A modifier key held while an action key is tapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    /// Key pressed first and released last.
    pub modifier: KeySpec,
    /// Key tapped while the modifier is down.
    pub action: KeySpec,
    /// Time between action key down and action key up.
    pub hold: Duration,
}

impl Chord {
    /// Create a chord with the default hold time.
    pub fn new(modifier: KeySpec, action: KeySpec) -> Self {
        Self {
            modifier,
            action,
            hold: DEFAULT_HOLD,
        }
    }

    /// Set the hold time.
    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }
}

impl Default for Chord {
    /// Meta+Return, i.e. Command+Return on macOS.
    fn default() -> Self {
        Self::new(KeySpec::Meta, KeySpec::Return)
    }
}

impl std::fmt::Display for Chord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{}", self.modifier, self.action)
    }
}

/// A synchronous source of synthetic key events.
///
/// Calls are assumed to take effect immediately on the foreground
/// application.
pub trait KeyInjector {
    /// Press `key` and keep it down.
    fn key_down(&mut self, key: KeySpec) -> Result<()>;

    /// Release `key`.
    fn key_up(&mut self, key: KeySpec) -> Result<()>;
}

impl<T: KeyInjector + ?Sized> KeyInjector for Box<T> {
    fn key_down(&mut self, key: KeySpec) -> Result<()> {
        (**self).key_down(key)
    }

    fn key_up(&mut self, key: KeySpec) -> Result<()> {
        (**self).key_up(key)
    }
}
