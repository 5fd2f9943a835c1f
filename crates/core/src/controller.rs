//! Transition controller: owns the displayed state and the attached overlay,
//! and runs the enter/exit side effects on state edges only.

use crate::delegate::Delegate;
use loadscreen_common::RuntimeEnvironment;
use loadscreen_config::LoadingScreenSettings;
use loadscreen_host::{OverlayWidget, Viewport};

/// The edge taken by [`TransitionController::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Shown,
    Hidden,
}

/// Everything a transition touches outside the controller.
pub struct TransitionContext<'a, V: Viewport + ?Sized> {
    pub viewport: &'a mut V,
    pub settings: &'a LoadingScreenSettings,
    pub env: RuntimeEnvironment,
    pub on_visibility_changed: &'a mut Delegate<bool>,
}

#[derive(Debug, Default)]
pub struct TransitionController {
    displayed: bool,
    overlay: Option<OverlayWidget>,
}

impl TransitionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// The overlay currently attached, if any.
    pub fn overlay(&self) -> Option<&OverlayWidget> {
        self.overlay.as_ref()
    }

    /// Move to the requested state. Returns the edge taken, or `None` when
    /// already there.
    pub fn apply<V: Viewport + ?Sized>(
        &mut self,
        show: bool,
        ctx: TransitionContext<'_, V>,
    ) -> Option<Transition> {
        match (self.displayed, show) {
            (false, true) => {
                self.show(ctx);
                Some(Transition::Shown)
            }
            (true, false) => {
                self.hide(ctx);
                Some(Transition::Hidden)
            }
            _ => None,
        }
    }

    fn show<V: Viewport + ?Sized>(&mut self, ctx: TransitionContext<'_, V>) {
        self.displayed = true;
        ctx.on_visibility_changed.broadcast(true);

        let class = &ctx.settings.widget;
        let overlay = match ctx.viewport.create_widget(class) {
            Ok(handle) => OverlayWidget::Widget {
                handle,
                class: class.clone(),
            },
            Err(err) => {
                tracing::error!(%class, %err, "failed to load the loading screen widget, falling back to placeholder");
                OverlayWidget::placeholder()
            }
        };
        ctx.viewport.add_to_viewport(&overlay, ctx.settings.z_order);
        self.overlay = Some(overlay);

        set_loading_performance(ctx.viewport, true);

        // The editor drives its own UI loop.
        if !ctx.env.editor {
            ctx.viewport.pump_frame();
        }
        tracing::info!(z_order = ctx.settings.z_order, "loading screen shown");
    }

    fn hide<V: Viewport + ?Sized>(&mut self, ctx: TransitionContext<'_, V>) {
        self.remove_overlay(ctx.viewport);
        set_loading_performance(ctx.viewport, false);

        self.displayed = false;
        ctx.on_visibility_changed.broadcast(false);
        tracing::info!("loading screen hidden");
    }

    /// Detach the overlay, if one is attached, without touching the
    /// displayed state. Safe to call more than once.
    pub fn teardown<V: Viewport + ?Sized>(&mut self, viewport: &mut V) {
        self.remove_overlay(viewport);
    }

    fn remove_overlay<V: Viewport + ?Sized>(&mut self, viewport: &mut V) {
        if let Some(overlay) = self.overlay.take() {
            viewport.remove_from_viewport(&overlay);
        }
    }
}

/// Skip drawing the world and favour level streaming while the screen is up.
fn set_loading_performance<V: Viewport + ?Sized>(viewport: &mut V, loading: bool) {
    viewport.set_world_rendering_enabled(!loading);
    viewport.set_level_high_priority_streaming(loading);
}
