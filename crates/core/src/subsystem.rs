use crate::aggregator::{self, GameLogicOverride};
use crate::controller::{TransitionContext, TransitionController};
use crate::delegate::Delegate;
use crate::gate::HoldTimeGate;
use crate::reason::DisplayReason;
use loadscreen_common::{Clock, RuntimeEnvironment, WorldInfo};
use loadscreen_config::LoadingScreenSettings;
use loadscreen_host::{GameInstance, ListenerId, MapLoadListener, MapLoadNotifier, Viewport};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Shows a loading screen during level transitions, or when game logic asks
/// for one.
///
/// One instance lives per game session. The host calls [`tick`] once per
/// frame; everything else is queries, the game logic override, and the two
/// notification delegates.
///
/// [`tick`]: LoadingScreenSubsystem::tick
pub struct LoadingScreenSubsystem<G: GameInstance, V: Viewport> {
    settings: LoadingScreenSettings,
    env: RuntimeEnvironment,
    clock: Box<dyn Clock>,
    game: Option<G>,
    viewport: V,
    game_override: GameLogicOverride,
    gate: HoldTimeGate,
    controller: TransitionController,
    last_reason: DisplayReason,
    map_load_listener: Option<ListenerId>,
    on_hold_time_triggered: Delegate<f32>,
    on_visibility_changed: Delegate<bool>,
}

impl<G: GameInstance, V: Viewport> LoadingScreenSubsystem<G, V> {
    /// Dedicated servers have no viewport to cover.
    pub fn should_create(env: RuntimeEnvironment) -> bool {
        !env.dedicated_server
    }

    /// Create the subsystem in the hidden state.
    ///
    /// A missing game instance is not fatal: the screen stays up until one is
    /// attached with [`attach_game_instance`](Self::attach_game_instance).
    pub fn initialize(
        settings: LoadingScreenSettings,
        env: RuntimeEnvironment,
        clock: impl Clock + 'static,
        game: Option<G>,
        viewport: V,
    ) -> Self {
        if game.is_none() {
            tracing::error!("no game instance available on loading screen init");
        }
        tracing::debug!(?settings, ?env, "loading screen subsystem initialized");

        Self {
            settings,
            env,
            clock: Box::new(clock),
            game,
            viewport,
            game_override: GameLogicOverride::default(),
            gate: HoldTimeGate::new(),
            controller: TransitionController::new(),
            last_reason: DisplayReason::default(),
            map_load_listener: None,
            on_hold_time_triggered: Delegate::new(),
            on_visibility_changed: Delegate::new(),
        }
    }

    /// Subscribe a shared subsystem to map-load notifications.
    pub fn register_map_load(this: &Rc<RefCell<Self>>, notifier: &mut MapLoadNotifier)
    where
        G: 'static,
        V: 'static,
    {
        let id = notifier.subscribe(this);
        let previous = this.borrow_mut().map_load_listener.replace(id);
        if let Some(previous) = previous {
            notifier.unsubscribe(previous);
        }
    }

    pub fn unregister_map_load(&mut self, notifier: &mut MapLoadNotifier) {
        if let Some(id) = self.map_load_listener.take() {
            notifier.unsubscribe(id);
        }
    }

    /// Shut down: detach any attached overlay and stop listening for map loads.
    pub fn deinitialize(&mut self, notifier: &mut MapLoadNotifier) {
        self.controller.teardown(&mut self.viewport);
        self.unregister_map_load(notifier);
        tracing::debug!("loading screen subsystem deinitialized");
    }

    pub fn tick(&mut self, _delta: Duration) {
        self.update();
    }

    /// Run one full evaluation: aggregate, gate, transition.
    pub fn update(&mut self) {
        let _span = tracing::info_span!("loading_screen_update").entered();
        let now = self.clock.now();

        let verdict = aggregator::evaluate(&self.settings, self.game.as_ref(), &self.game_override);
        let hold_seconds = self.settings.effective_hold_seconds(self.env);
        let decision = self.gate.decide(verdict, now, hold_seconds);

        if let Some(hold) = decision.hold_triggered {
            self.on_hold_time_triggered.broadcast(hold);
        }
        self.last_reason = decision.verdict.reason;

        self.controller.apply(
            decision.verdict.show,
            TransitionContext {
                viewport: &mut self.viewport,
                settings: &self.settings,
                env: self.env,
                on_visibility_changed: &mut self.on_visibility_changed,
            },
        );

        // After the transition, so a show on this same tick cannot switch
        // rendering back off. Textures only stream in for what is rendered.
        if decision.render_world {
            self.viewport.set_world_rendering_enabled(true);
        }

        let displayed = self.controller.is_displayed();
        if self.settings.log_reason {
            tracing::info!(displayed, reason = %self.last_reason, "loading screen display status");
        } else {
            tracing::trace!(displayed, reason = %self.last_reason, "loading screen display status");
        }
    }

    pub fn is_displayed(&self) -> bool {
        self.controller.is_displayed()
    }

    /// Ask for the screen to be shown (or stop asking). Stays in effect until
    /// changed; world readiness checks still apply on top of it.
    pub fn set_game_logic_override(&mut self, active: bool, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::debug!(active, %reason, "game logic override set");
        self.game_override = GameLogicOverride { active, reason };
    }

    pub fn clear_game_logic_override(&mut self) {
        self.set_game_logic_override(false, String::new());
    }

    pub fn game_logic_override(&self) -> &GameLogicOverride {
        &self.game_override
    }

    /// True while the screen is only up because of the post-load hold.
    pub fn is_waiting_for_additional_time(&self) -> bool {
        self.is_displayed()
            && self.hold_seconds() > 0.0
            && self.gate.dismissed_at().is_some()
    }

    /// Seconds left in the hold window, or `None` when none is open.
    pub fn additional_time_remaining(&self) -> Option<f64> {
        self.gate.remaining(self.clock.now(), self.hold_seconds())
    }

    /// The reason behind the latest evaluation.
    pub fn last_reason(&self) -> &DisplayReason {
        &self.last_reason
    }

    pub fn on_hold_time_triggered(&mut self) -> &mut Delegate<f32> {
        &mut self.on_hold_time_triggered
    }

    pub fn on_visibility_changed(&mut self) -> &mut Delegate<bool> {
        &mut self.on_visibility_changed
    }

    /// Provide a game instance that was not available at init.
    pub fn attach_game_instance(&mut self, game: G) {
        self.game = Some(game);
    }

    pub fn game(&self) -> Option<&G> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut G> {
        self.game.as_mut()
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn settings(&self) -> &LoadingScreenSettings {
        &self.settings
    }

    fn hold_seconds(&self) -> f32 {
        self.settings.effective_hold_seconds(self.env)
    }
}

impl<G: GameInstance, V: Viewport> MapLoadListener for LoadingScreenSubsystem<G, V> {
    fn on_pre_load_map(&mut self, map_name: &str) {
        tracing::debug!(map_name, "map load starting, updating loading screen");
        self.update();
    }

    fn on_post_load_map(&mut self, world: Option<&WorldInfo>) {
        tracing::debug!(map = ?world.map(|w| &w.map_name), "map load finished");
    }
}

impl<G: GameInstance, V: Viewport> Drop for LoadingScreenSubsystem<G, V> {
    fn drop(&mut self) {
        self.controller.teardown(&mut self.viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadscreen_common::ManualClock;
    use loadscreen_host::{HeadlessViewport, SimulatedGame};

    type Subsystem = LoadingScreenSubsystem<SimulatedGame, HeadlessViewport>;

    fn subsystem(game: Option<SimulatedGame>) -> (Subsystem, ManualClock) {
        let clock = ManualClock::new();
        let s = Subsystem::initialize(
            LoadingScreenSettings::default(),
            RuntimeEnvironment::game(),
            clock.clone(),
            game,
            HeadlessViewport::new(),
        );
        (s, clock)
    }

    #[test]
    fn starts_hidden_and_unevaluated() {
        let (s, _) = subsystem(None);
        assert!(!s.is_displayed());
        assert_eq!(*s.last_reason(), DisplayReason::Unevaluated);
        assert_eq!(s.last_reason().to_string(), "");
        assert_eq!(*s.game_logic_override(), GameLogicOverride::default());
        assert_eq!(s.additional_time_remaining(), None);
    }

    #[test]
    fn dedicated_server_is_skipped() {
        assert!(Subsystem::should_create(RuntimeEnvironment::game()));
        assert!(Subsystem::should_create(RuntimeEnvironment::editor()));
        assert!(!Subsystem::should_create(RuntimeEnvironment::dedicated_server()));
    }

    #[test]
    fn missing_game_instance_keeps_screen_up_until_attached() {
        let (mut s, clock) = subsystem(None);
        s.update();
        assert!(s.is_displayed());
        assert_eq!(*s.last_reason(), DisplayReason::NoWorldContext);

        s.attach_game_instance(SimulatedGame::playing("Arena"));
        s.update();
        assert!(s.is_waiting_for_additional_time());

        clock.advance_secs(2.0);
        s.update();
        assert!(!s.is_displayed());
        assert_eq!(*s.last_reason(), DisplayReason::NoReason);
    }

    #[test]
    fn remaining_time_counts_down() {
        let (mut s, clock) = subsystem(Some(SimulatedGame::playing("Arena")));
        s.update();
        clock.advance_secs(0.5);
        assert_eq!(s.additional_time_remaining(), Some(1.5));
        assert!(s.is_waiting_for_additional_time());
    }

    #[test]
    fn override_reason_survives_until_cleared() {
        let (mut s, _) = subsystem(Some(SimulatedGame::playing("Arena")));
        s.set_game_logic_override(true, "cutscene");
        s.update();
        s.update();
        assert!(s.is_displayed());
        assert_eq!(s.last_reason().to_string(), "cutscene");
        assert!(!s.is_waiting_for_additional_time());

        s.clear_game_logic_override();
        assert!(!s.game_logic_override().active);
    }
}
