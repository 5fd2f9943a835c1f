//! Loading screen decision engine.
//!
//! Once per frame the subsystem asks three questions in a fixed order:
//!
//! 1. [`aggregator`]: is there any reason to show the screen right now?
//! 2. [`gate`]: if not, has the post-load hold window run out yet?
//! 3. [`controller`]: does the overlay need to be attached or detached?
//!
//! # Invariants
//! - Every change of the displayed state runs exactly one complete enter or
//!   exit sequence.
//! - The dismiss timestamp is cleared whenever a reason to show reappears.
//! - Evaluation is synchronous and single-threaded; observers must not
//!   re-enter the subsystem.

pub mod aggregator;
pub mod controller;
pub mod delegate;
pub mod gate;
mod reason;
mod subsystem;

pub use aggregator::{GameLogicOverride, Verdict};
pub use controller::{Transition, TransitionController};
pub use delegate::{Delegate, DelegateHandle};
pub use gate::{GateDecision, HoldTimeGate};
pub use reason::DisplayReason;
pub use subsystem::LoadingScreenSubsystem;
