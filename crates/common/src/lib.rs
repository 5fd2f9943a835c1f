//! Shared types for the loading screen subsystem: widget identity, world
//! context snapshots, the runtime environment and frame clocks.

mod clock;
mod types;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use types::{RuntimeEnvironment, WidgetClassPath, WidgetHandle, WorldContext, WorldInfo};
