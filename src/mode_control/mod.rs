//! This module provides the coordination layer around the flight state machine:
//! the process wide game phase, level and score, the per-frame context handed
//! to the controller, and the signals a frame ends with.

mod game_mode_state;
mod mode_context;
mod signal;

pub use game_mode_state::{GameModeState, GamePhase};
pub use mode_context::ModeContext;
pub use signal::FrameSignal;
