//! Host adapter: the engine-facing collaborators the loading screen drives.
//!
//! # Invariants
//! - The loading screen never renders; it only asks a host to attach,
//!   detach and pump overlay widgets and to toggle render/streaming flags.
//! - All calls are synchronous and happen on the host's main thread.
//!
//! # Workaround
//! Ships a headless host that records every call instead of drawing. The
//! traits are stable; an engine backend implements them without changing
//! consumers.

mod headless;
mod notifier;
mod traits;

pub use headless::{HeadlessViewport, SimulatedGame, ViewportCall};
pub use notifier::{ListenerId, MapLoadListener, MapLoadNotifier};
pub use traits::{GameInstance, HostError, OverlayWidget, RenderHost, UiHost, Viewport};
