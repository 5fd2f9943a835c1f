use crate::traits::{GameInstance, HostError, OverlayWidget, RenderHost, UiHost};
use loadscreen_common::{WidgetClassPath, WidgetHandle, WorldContext, WorldInfo};
use std::collections::HashSet;

/// A call made against a [`HeadlessViewport`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportCall {
    CreateWidget(WidgetClassPath),
    AddToViewport {
        handle: WidgetHandle,
        z_order: i32,
        placeholder: bool,
    },
    RemoveFromViewport(WidgetHandle),
    PumpFrame,
    WorldRendering(bool),
    LevelHighPriority(bool),
}

/// Viewport that draws nothing and records every call.
///
/// Widget classes resolve unless marked missing with
/// [`HeadlessViewport::mark_class_missing`]. Paths that are not rooted asset
/// paths (`/Game/...`) fail to instantiate.
#[derive(Debug)]
pub struct HeadlessViewport {
    missing_classes: HashSet<WidgetClassPath>,
    attached: Vec<(OverlayWidget, i32)>,
    world_rendering: bool,
    level_high_priority: bool,
    frames_pumped: usize,
    calls: Vec<ViewportCall>,
}

impl HeadlessViewport {
    pub fn new() -> Self {
        Self {
            missing_classes: HashSet::new(),
            attached: Vec::new(),
            world_rendering: true,
            level_high_priority: false,
            frames_pumped: 0,
            calls: Vec::new(),
        }
    }

    /// Make `create_widget` fail for this class.
    pub fn mark_class_missing(&mut self, class: WidgetClassPath) {
        self.missing_classes.insert(class);
    }

    /// Overlays currently attached, with their z-order.
    pub fn attached(&self) -> &[(OverlayWidget, i32)] {
        &self.attached
    }

    pub fn is_world_rendering(&self) -> bool {
        self.world_rendering
    }

    pub fn is_level_high_priority(&self) -> bool {
        self.level_high_priority
    }

    pub fn frames_pumped(&self) -> usize {
        self.frames_pumped
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> &[ViewportCall] {
        &self.calls
    }

    /// Number of recorded calls matching `pred`.
    pub fn count_calls(&self, pred: impl Fn(&ViewportCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Drop the call log, keeping the current viewport state.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Human-readable summary of the viewport state.
    pub fn describe(&self) -> String {
        let mut out = format!(
            "world_rendering={} level_high_priority={} frames_pumped={} overlays={}",
            self.world_rendering,
            self.level_high_priority,
            self.frames_pumped,
            self.attached.len()
        );
        for (overlay, z_order) in &self.attached {
            let kind = match overlay {
                OverlayWidget::Widget { class, .. } => class.to_string(),
                OverlayWidget::Placeholder { .. } => "<placeholder>".to_string(),
            };
            out.push_str(&format!(
                "\n  [{:.8}] {} z={}",
                &overlay.handle().0.to_string()[..8],
                kind,
                z_order
            ));
        }
        out
    }
}

impl Default for HeadlessViewport {
    fn default() -> Self {
        Self::new()
    }
}

impl UiHost for HeadlessViewport {
    fn create_widget(&mut self, class: &WidgetClassPath) -> Result<WidgetHandle, HostError> {
        self.calls.push(ViewportCall::CreateWidget(class.clone()));
        if self.missing_classes.contains(class) {
            return Err(HostError::WidgetClassNotFound(class.clone()));
        }
        if !class.as_str().starts_with('/') {
            return Err(HostError::WidgetCreation {
                class: class.clone(),
                reason: "not a rooted asset path".to_string(),
            });
        }
        Ok(WidgetHandle::new())
    }

    fn add_to_viewport(&mut self, overlay: &OverlayWidget, z_order: i32) {
        self.calls.push(ViewportCall::AddToViewport {
            handle: overlay.handle(),
            z_order,
            placeholder: overlay.is_placeholder(),
        });
        self.attached.push((overlay.clone(), z_order));
    }

    fn remove_from_viewport(&mut self, overlay: &OverlayWidget) {
        let handle = overlay.handle();
        self.calls.push(ViewportCall::RemoveFromViewport(handle));
        let before = self.attached.len();
        self.attached.retain(|(o, _)| o.handle() != handle);
        if self.attached.len() == before {
            tracing::warn!(?handle, "removing an overlay that is not attached");
        }
    }

    fn pump_frame(&mut self) {
        self.calls.push(ViewportCall::PumpFrame);
        self.frames_pumped += 1;
    }
}

impl RenderHost for HeadlessViewport {
    fn set_world_rendering_enabled(&mut self, enabled: bool) {
        self.calls.push(ViewportCall::WorldRendering(enabled));
        self.world_rendering = enabled;
    }

    fn set_level_high_priority_streaming(&mut self, high_priority: bool) {
        self.calls.push(ViewportCall::LevelHighPriority(high_priority));
        self.level_high_priority = high_priority;
    }
}

/// Game instance whose world lifecycle is driven by hand.
#[derive(Debug, Clone, Default)]
pub struct SimulatedGame {
    context: Option<WorldContext>,
}

impl SimulatedGame {
    /// A game instance with no world context yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A game instance already playing `map_name`.
    pub fn playing(map_name: &str) -> Self {
        Self {
            context: Some(WorldContext::with_world(WorldInfo::playing(map_name))),
        }
    }

    /// Drop the world context entirely.
    pub fn clear_context(&mut self) {
        self.context = None;
    }

    /// Keep the context but tear down its world.
    pub fn unload_world(&mut self) {
        self.context = Some(WorldContext::empty());
    }

    /// Create a world for `map_name` that has not begun play.
    pub fn load_world(&mut self, map_name: &str) {
        self.context = Some(WorldContext::with_world(WorldInfo::new(map_name)));
    }

    /// Mark the current world as playing. No-op without a world.
    pub fn begin_play(&mut self) {
        if let Some(world) = self.context.as_mut().and_then(|c| c.world.as_mut()) {
            world.has_begun_play = true;
        }
    }

    pub fn world(&self) -> Option<&WorldInfo> {
        self.context.as_ref().and_then(|c| c.world.as_ref())
    }
}

impl GameInstance for SimulatedGame {
    fn world_context(&self) -> Option<&WorldContext> {
        self.context.as_ref()
    }
}
