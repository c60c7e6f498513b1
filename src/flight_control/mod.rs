//! The glider itself: the beat clock, the airframe body, collision probing and
//! the per-frame state machine that moves it from the intro approach to the end of a run.

mod airframe;
mod beat_clock;
mod collaborators;
mod collision;
mod flight_controller;
mod flight_mode;
#[cfg(test)]
mod tests;

pub use airframe::{Airframe, look_rotation};
pub use beat_clock::{BeatClock, GameTime};
pub use collaborators::{Collaborators, InstructionDisplay, ReferenceTone, SceneManager};
pub use collision::{CollisionProbe, CollisionTag};
pub use flight_controller::{FlightController, FlightParams};
pub use flight_mode::{ControlMode, FlightMode, FlyingState, IntroAnimation, ModeKind};
