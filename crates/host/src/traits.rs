use loadscreen_common::{WidgetClassPath, WidgetHandle, WorldContext};

/// Errors a host reports back to the loading screen.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("widget class not found: {0}")]
    WidgetClassNotFound(WidgetClassPath),
    #[error("failed to instantiate widget {class}: {reason}")]
    WidgetCreation {
        class: WidgetClassPath,
        reason: String,
    },
}

/// An overlay ready to be attached to a viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayWidget {
    /// Instance of the configured widget class.
    Widget {
        handle: WidgetHandle,
        class: WidgetClassPath,
    },
    /// Built-in throbber used when the configured widget cannot be created.
    Placeholder { handle: WidgetHandle },
}

impl OverlayWidget {
    pub fn placeholder() -> Self {
        Self::Placeholder {
            handle: WidgetHandle::new(),
        }
    }

    pub fn handle(&self) -> WidgetHandle {
        match self {
            Self::Widget { handle, .. } | Self::Placeholder { handle } => *handle,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// The game instance that owns the world the loading screen watches.
pub trait GameInstance {
    /// The active world context, if the instance has one.
    fn world_context(&self) -> Option<&WorldContext>;
}

/// UI side of the viewport.
pub trait UiHost {
    /// Instantiate a widget of the given class.
    fn create_widget(&mut self, class: &WidgetClassPath) -> Result<WidgetHandle, HostError>;

    /// Attach an overlay to the viewport at the given layer.
    fn add_to_viewport(&mut self, overlay: &OverlayWidget, z_order: i32);

    /// Detach an overlay from the viewport and release it.
    fn remove_from_viewport(&mut self, overlay: &OverlayWidget);

    /// Run one UI frame immediately, without waiting for the next render.
    fn pump_frame(&mut self);
}

/// Render and streaming side of the viewport.
pub trait RenderHost {
    /// Toggle drawing of the 3D world.
    fn set_world_rendering_enabled(&mut self, enabled: bool);

    /// Mark or unmark the current level as high priority for streaming.
    fn set_level_high_priority_streaming(&mut self, high_priority: bool);
}

/// A viewport provides both the UI and render surfaces.
pub trait Viewport: UiHost + RenderHost {}

impl<T: UiHost + RenderHost + ?Sized> Viewport for T {}
