//! Configuration management for keypulse.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chord::{Chord, KeySpec};
use crate::cli::Args;
use crate::controller::LoopSettings;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timing configuration.
    pub timing: TimingSection,
    /// Chord configuration.
    pub chord: ChordSection,
    /// Failure handling.
    pub failures: FailureSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Timing configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSection {
    /// Seconds between presses.
    pub interval_secs: f64,
    /// Seconds to wait before the first press.
    pub delay_secs: f64,
    /// Maximum number of presses. `null` means unlimited.
    pub max_presses: Option<u64>,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            interval_secs: 2.0,
            delay_secs: 3.0,
            max_presses: None,
        }
    }
}

/// Chord configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordSection {
    /// Key held for the whole chord.
    pub modifier: KeySpec,
    /// Key tapped while the modifier is held.
    pub action: KeySpec,
    /// Milliseconds the action key stays down.
    pub hold_ms: u64,
}

impl Default for ChordSection {
    fn default() -> Self {
        let chord = Chord::default();
        Self {
            modifier: chord.modifier,
            action: chord.action,
            hold_ms: chord.hold.as_millis() as u64,
        }
    }
}

/// Failure handling section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureSection {
    /// Stop after this many failed presses in a row. `null` never stops.
    pub max_consecutive: Option<u32>,
}

/// Logging configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace). Unset defers to `RUST_LOG`.
    pub level: Option<String>,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    ///
    /// Values that do not parse are ignored.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |name: &str| lookup(name).map(|v| v.trim().to_string());

        if let Some(secs) = parse("KEYPULSE_INTERVAL").and_then(|v| v.parse().ok()) {
            self.timing.interval_secs = secs;
        }

        if let Some(secs) = parse("KEYPULSE_DELAY").and_then(|v| v.parse().ok()) {
            self.timing.delay_secs = secs;
        }

        if let Some(max) = parse("KEYPULSE_MAX_PRESSES").and_then(|v| v.parse().ok()) {
            self.timing.max_presses = Some(max);
        }

        if let Some(key) = parse("KEYPULSE_MODIFIER").and_then(|v| v.parse().ok()) {
            self.chord.modifier = key;
        }

        if let Some(key) = parse("KEYPULSE_KEY").and_then(|v| v.parse().ok()) {
            self.chord.action = key;
        }

        if let Some(level) = lookup("KEYPULSE_LOG_LEVEL") {
            self.logging.level = Some(level);
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(interval) = args.interval {
            self.timing.interval_secs = interval;
        }

        if let Some(delay) = args.delay {
            self.timing.delay_secs = delay;
        }

        if let Some(max) = args.max_presses {
            self.timing.max_presses = Some(max);
        }

        if let Some(modifier) = args.modifier {
            self.chord.modifier = modifier;
        }

        if let Some(key) = args.key {
            self.chord.action = key;
        }

        if let Some(hold) = args.hold_ms {
            self.chord.hold_ms = hold;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = Some(level.clone());
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        Self::load_with_env(args, |name| std::env::var(name).ok())
    }

    /// Like [`load`](Self::load), reading variables through `lookup`.
    pub fn load_with_env<F>(args: &Args, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env_from(lookup);
        config.apply_args(args);
        config.validate()?;

        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let interval = seconds("interval", self.timing.interval_secs)?;
        if interval.is_zero() {
            return Err(ConfigError::Invalid(format!(
                "interval must be a positive number of seconds, got {}",
                self.timing.interval_secs
            )));
        }

        seconds("delay", self.timing.delay_secs)?;

        if self.chord.modifier == self.chord.action {
            return Err(ConfigError::Invalid(format!(
                "modifier and action key are both '{}'",
                self.chord.modifier
            )));
        }

        Ok(())
    }

    /// Startup delay before the first press.
    ///
    /// Out-of-range values saturate; [`validate`](Self::validate) rejects them.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.timing.delay_secs).unwrap_or(Duration::MAX)
    }

    /// Convert to settings for the press loop.
    pub fn loop_settings(&self) -> LoopSettings {
        let chord = Chord::new(self.chord.modifier, self.chord.action)
            .with_hold(Duration::from_millis(self.chord.hold_ms));

        let interval =
            Duration::try_from_secs_f64(self.timing.interval_secs).unwrap_or(Duration::MAX);
        let settings = LoopSettings::new(interval, self.timing.max_presses).with_chord(chord);

        match self.failures.max_consecutive {
            Some(limit) => settings.with_max_consecutive_failures(limit),
            None => settings,
        }
    }

    /// Get the log level filter string, if one was configured.
    pub fn log_filter(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }
}

/// Convert a seconds value, rejecting negative, non-finite and overlong ones.
fn seconds(name: &str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        ConfigError::Invalid(format!(
            "{name} must be zero or more seconds within range, got {value}"
        ))
    })
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// A value is out of range.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::Invalid(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
