//! Native input injection backed by `enigo`.

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use tracing::debug;

use super::{KeyInjector, KeySpec};
use crate::error::KeypulseError;
use crate::Result;

/// Injects key events into the current desktop session.
pub struct NativeInjector {
    enigo: Enigo,
}

impl NativeInjector {
    /// Open a connection to the platform input facility.
    ///
    /// Fails with [`KeypulseError::CapabilityMissing`] when no display server
    /// is reachable or the process lacks permission to synthesize input.
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| KeypulseError::CapabilityMissing(e.to_string()))?;
        debug!("native input backend opened");
        Ok(Self { enigo })
    }

    fn send(&mut self, key: KeySpec, direction: Direction) -> Result<()> {
        self.enigo
            .key(to_enigo(key), direction)
            .map_err(|e| KeypulseError::Injection {
                key,
                reason: e.to_string(),
            })
    }
}

impl KeyInjector for NativeInjector {
    fn key_down(&mut self, key: KeySpec) -> Result<()> {
        self.send(key, Direction::Press)
    }

    fn key_up(&mut self, key: KeySpec) -> Result<()> {
        self.send(key, Direction::Release)
    }
}

fn to_enigo(key: KeySpec) -> Key {
    match key {
        KeySpec::Meta => Key::Meta,
        KeySpec::Control => Key::Control,
        KeySpec::Alt => Key::Alt,
        KeySpec::Shift => Key::Shift,
        KeySpec::Return => Key::Return,
        KeySpec::Space => Key::Space,
        KeySpec::Tab => Key::Tab,
        KeySpec::Escape => Key::Escape,
        KeySpec::Backspace => Key::Backspace,
        KeySpec::Char(c) => Key::Unicode(c),
    }
}
