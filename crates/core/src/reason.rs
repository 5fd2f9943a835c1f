use std::fmt;

/// Why the screen is (or is not) displayed, for diagnostics.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DisplayReason {
    /// Nothing has been evaluated yet.
    #[default]
    Unevaluated,
    ForcedByConfig,
    NoWorldContext,
    NoWorld,
    WorldNotBegunPlay,
    /// Requested by game logic. An empty string means no reason was given.
    GameLogic(String),
    /// Loading is done; the screen stays up for the rest of the hold window.
    Holding { remaining_secs: f64 },
    NoReason,
}

impl fmt::Display for DisplayReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unevaluated => Ok(()),
            Self::ForcedByConfig => f.write_str("forced by configuration"),
            Self::NoWorldContext => f.write_str("no world context"),
            Self::NoWorld => f.write_str("world is null"),
            Self::WorldNotBegunPlay => f.write_str("world has not begun play"),
            Self::GameLogic(reason) if reason.is_empty() => f.write_str("requested by game logic"),
            Self::GameLogic(reason) => f.write_str(reason),
            Self::Holding { remaining_secs } => {
                write!(f, "holding screen for remaining {remaining_secs:.2}s")
            }
            Self::NoReason => f.write_str("no reason to display"),
        }
    }
}
