//! Signal aggregation: collapses configuration, world state and game logic
//! requests into one show/hide verdict.

use crate::reason::DisplayReason;
use loadscreen_config::LoadingScreenSettings;
use loadscreen_host::GameInstance;

/// A show/hide decision together with the rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub show: bool,
    pub reason: DisplayReason,
}

impl Verdict {
    pub fn show(reason: DisplayReason) -> Self {
        Self { show: true, reason }
    }

    pub fn hide(reason: DisplayReason) -> Self {
        Self {
            show: false,
            reason,
        }
    }
}

/// Explicit request from game logic. Stays in effect until changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameLogicOverride {
    pub active: bool,
    pub reason: String,
}

/// Run the display checks in priority order. The first rule that matches wins.
///
/// A missing game instance is treated the same as a missing world context.
pub fn evaluate<G: GameInstance + ?Sized>(
    settings: &LoadingScreenSettings,
    game: Option<&G>,
    game_override: &GameLogicOverride,
) -> Verdict {
    if settings.force_display {
        return Verdict::show(DisplayReason::ForcedByConfig);
    }

    let Some(context) = game.and_then(|g| g.world_context()) else {
        return Verdict::show(DisplayReason::NoWorldContext);
    };

    let Some(world) = context.world.as_ref() else {
        return Verdict::show(DisplayReason::NoWorld);
    };

    if !world.has_begun_play {
        return Verdict::show(DisplayReason::WorldNotBegunPlay);
    }

    if game_override.active {
        return Verdict::show(DisplayReason::GameLogic(game_override.reason.clone()));
    }

    Verdict::hide(DisplayReason::NoReason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadscreen_host::SimulatedGame;

    fn active(reason: &str) -> GameLogicOverride {
        GameLogicOverride {
            active: true,
            reason: reason.into(),
        }
    }

    #[test]
    fn playing_world_has_no_reason() {
        let game = SimulatedGame::playing("Arena");
        let v = evaluate(
            &LoadingScreenSettings::default(),
            Some(&game),
            &GameLogicOverride::default(),
        );
        assert_eq!(v, Verdict::hide(DisplayReason::NoReason));
    }

    #[test]
    fn force_display_wins_over_everything() {
        let settings = LoadingScreenSettings {
            force_display: true,
            ..LoadingScreenSettings::default()
        };
        let v = evaluate(&settings, None::<&SimulatedGame>, &active("cutscene"));
        assert_eq!(v, Verdict::show(DisplayReason::ForcedByConfig));
    }

    #[test]
    fn missing_game_instance_means_no_context() {
        let v = evaluate(
            &LoadingScreenSettings::default(),
            None::<&SimulatedGame>,
            &GameLogicOverride::default(),
        );
        assert_eq!(v, Verdict::show(DisplayReason::NoWorldContext));
    }

    #[test]
    fn world_lifecycle_rules_in_order() {
        let settings = LoadingScreenSettings::default();
        let cutscene = active("cutscene");
        let mut game = SimulatedGame::new();

        // World checks come before the override.
        let v = evaluate(&settings, Some(&game), &cutscene);
        assert_eq!(v.reason, DisplayReason::NoWorldContext);

        game.unload_world();
        let v = evaluate(&settings, Some(&game), &cutscene);
        assert_eq!(v.reason, DisplayReason::NoWorld);

        game.load_world("Arena");
        let v = evaluate(&settings, Some(&game), &cutscene);
        assert_eq!(v.reason, DisplayReason::WorldNotBegunPlay);

        game.begin_play();
        let v = evaluate(&settings, Some(&game), &cutscene);
        assert!(v.show);
        assert_eq!(v.reason.to_string(), "cutscene");
    }

    #[test]
    fn override_without_reason_uses_default_text() {
        let game = SimulatedGame::playing("Arena");
        let v = evaluate(&LoadingScreenSettings::default(), Some(&game), &active(""));
        assert!(v.show);
        assert_eq!(v.reason.to_string(), "requested by game logic");
    }

    #[test]
    fn inactive_override_is_ignored() {
        let game = SimulatedGame::playing("Arena");
        let inactive = GameLogicOverride {
            active: false,
            reason: "stale".into(),
        };
        let v = evaluate(&LoadingScreenSettings::default(), Some(&game), &inactive);
        assert!(!v.show);
    }
}
