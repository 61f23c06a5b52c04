//! Time subsystem.
//!
//! Provides testable timing utilities without coupling to the runtime:
//! - `IntervalTimer` decides when the periodic tick fires (owned by the runtime)
//! - `ElapsedTimer` measures time between ticks (owned by the application)

mod elapsed;
mod interval;

pub use elapsed::ElapsedTimer;
pub use interval::{IntervalTimer, TickTime};
