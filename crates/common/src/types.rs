use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a widget instance living on a UI host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetHandle(pub Uuid);

impl WidgetHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WidgetHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Asset path of the widget class a UI host instantiates for the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetClassPath(pub String);

impl WidgetClassPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for WidgetClassPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The world object held by a world context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldInfo {
    pub map_name: String,
    /// False while the world is still initializing or streaming in.
    pub has_begun_play: bool,
}

impl WorldInfo {
    pub fn new(map_name: impl Into<String>) -> Self {
        Self {
            map_name: map_name.into(),
            has_begun_play: false,
        }
    }

    pub fn playing(map_name: impl Into<String>) -> Self {
        Self {
            map_name: map_name.into(),
            has_begun_play: true,
        }
    }
}

/// A game instance's active world context.
///
/// A context can exist without a world, e.g. between unloading one map and
/// creating the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldContext {
    pub world: Option<WorldInfo>,
}

impl WorldContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_world(world: WorldInfo) -> Self {
        Self { world: Some(world) }
    }
}

/// Where the host runtime is executing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeEnvironment {
    /// Running inside an interactive editor session.
    pub editor: bool,
    /// Running as a dedicated server with no local viewport.
    pub dedicated_server: bool,
}

impl RuntimeEnvironment {
    pub fn game() -> Self {
        Self::default()
    }

    pub fn editor() -> Self {
        Self {
            editor: true,
            dedicated_server: false,
        }
    }

    pub fn dedicated_server() -> Self {
        Self {
            editor: false,
            dedicated_server: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_handle_uniqueness() {
        let a = WidgetHandle::new();
        let b = WidgetHandle::new();
        assert_ne!(a, b);
    }

    #[test]
    fn blank_class_path_is_empty() {
        assert!(WidgetClassPath::new("   ").is_empty());
        assert!(!WidgetClassPath::new("/Game/UI/W_Loading").is_empty());
    }

    #[test]
    fn world_info_constructors() {
        assert!(!WorldInfo::new("Lobby").has_begun_play);
        assert!(WorldInfo::playing("Lobby").has_begun_play);
        assert_eq!(WorldContext::empty().world, None);
    }

    #[test]
    fn default_environment_is_game() {
        let env = RuntimeEnvironment::default();
        assert_eq!(env, RuntimeEnvironment::game());
        assert!(!env.editor);
        assert!(!env.dedicated_server);
    }
}
