//! Key-press loop controller.
//!
//! A [`Controller`] owns the [`SessionState`] of a single run: it waits out
//! the startup delay, presses the configured chord on every interval and
//! stops on its press limit or on request through a [`StopHandle`].

mod phase;
mod press_loop;
mod session;

pub use phase::RunPhase;
pub use press_loop::{Controller, LoopSettings, StopHandle};
pub use session::{SessionState, StopReason, Summary};
