//! Hold-time gate: keeps the screen up for a grace period after the last
//! reason to show it went away, so streamed assets can settle.

use crate::aggregator::Verdict;
use crate::reason::DisplayReason;
use std::time::Duration;

/// Result of one gate evaluation. Side effects are left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct GateDecision {
    pub verdict: Verdict,
    /// Set on the tick a hold window opens, carrying its length in seconds.
    pub hold_triggered: Option<f32>,
    /// The world must be rendered this tick so textures can stream in.
    pub render_world: bool,
}

/// Tracks when the aggregator last stopped asking for the screen.
#[derive(Debug, Clone, Default)]
pub struct HoldTimeGate {
    dismissed_at: Option<Duration>,
}

impl HoldTimeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide the final verdict for this tick.
    ///
    /// `hold_seconds <= 0` disables the hold entirely.
    pub fn decide(&mut self, verdict: Verdict, now: Duration, hold_seconds: f32) -> GateDecision {
        if verdict.show {
            self.dismissed_at = None;
            return GateDecision {
                verdict,
                hold_triggered: None,
                render_world: false,
            };
        }

        let mut hold_triggered = None;
        let dismissed_at = *self.dismissed_at.get_or_insert_with(|| {
            hold_triggered = Some(hold_seconds);
            now
        });
        if hold_triggered.is_some() {
            tracing::debug!(hold_seconds, "hold window opened");
        }

        let elapsed = now.saturating_sub(dismissed_at).as_secs_f64();
        let hold = f64::from(hold_seconds);
        if hold > 0.0 && elapsed < hold {
            return GateDecision {
                verdict: Verdict::show(DisplayReason::Holding {
                    remaining_secs: hold - elapsed,
                }),
                hold_triggered,
                render_world: true,
            };
        }

        GateDecision {
            verdict,
            hold_triggered,
            render_world: false,
        }
    }

    /// When the current hold window opened, if one is open.
    pub fn dismissed_at(&self) -> Option<Duration> {
        self.dismissed_at
    }

    /// Seconds left in the hold window at `now`. Negative once it has run
    /// out; `None` when no window is open.
    pub fn remaining(&self, now: Duration, hold_seconds: f32) -> Option<f64> {
        self.dismissed_at
            .map(|t| f64::from(hold_seconds) - now.saturating_sub(t).as_secs_f64())
    }
}
