//! Loading screen settings.
//!
//! # Invariants
//! - Settings are read-only once handed to the subsystem.
//! - Missing fields in a settings file fall back to their defaults.

mod settings;

pub use settings::{ConfigError, LoadingScreenSettings};
