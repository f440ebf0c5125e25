//! # keypulse
//!
//! Press a keyboard shortcut on a fixed interval.
//!
//! keypulse waits a moment so the operator can focus the target window,
//! then synthesizes a two-key chord (a modifier plus an action key) every
//! interval until a press limit is reached or it is stopped. The input
//! backend sits behind the [`KeyInjector`] trait, so the loop can be driven
//! by anything that accepts key-down and key-up events.
//!
//! ## Quick Start
//!
//! The binary drives the platform backend (`NativeInjector`, behind the
//! default `native` feature). Any other [`KeyInjector`] works the same way:
//!
//! ```
//! use std::time::Duration;
//! use keypulse::{Controller, KeyInjector, KeySpec, LoopSettings, StopReason};
//!
//! struct Print;
//!
//! impl KeyInjector for Print {
//!     fn key_down(&mut self, key: KeySpec) -> keypulse::Result<()> {
//!         println!("down {key}");
//!         Ok(())
//!     }
//!
//!     fn key_up(&mut self, key: KeySpec) -> keypulse::Result<()> {
//!         println!("up {key}");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // Meta+Return three times, 10ms apart, no startup delay
//!     let settings = LoopSettings::new(Duration::from_millis(10), Some(3));
//!     let mut controller = Controller::new(settings, Print);
//!
//!     let summary = controller.start(Duration::ZERO).await;
//!     assert_eq!(summary.press_count, 3);
//!     assert_eq!(summary.reason, Some(StopReason::MaxPressesReached));
//! }
//! ```

pub mod chord;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;

// Re-export commonly used types
#[cfg(feature = "native")]
pub use chord::NativeInjector;
pub use chord::{Chord, KeyInjector, KeySpec};
pub use controller::{
    Controller, LoopSettings, RunPhase, SessionState, StopHandle, StopReason, Summary,
};
pub use error::{KeypulseError, Result};
