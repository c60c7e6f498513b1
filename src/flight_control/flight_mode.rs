use super::airframe::{Airframe, look_rotation};
use crate::level::PathFunction;
use glam::Vec3;
use std::sync::Arc;
use strum_macros::Display;

/// Discriminant of [`FlightMode`] for logging and signalling.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ModeKind {
    Intro,
    WaitingForStartPitch,
    Flying,
    Ended,
}

/// Who moves the glider vertically while flying.
#[derive(Debug, Display, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ControlMode {
    /// Lip trill held: gravity off, height follows the sung pitch.
    Trill,
    /// No trill: gravity on, only x/z follow the path.
    FreeFall,
}

/// Linear approach from the first to the second intro anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct IntroAnimation {
    start: Vec3,
    end: Vec3,
    elapsed: f32,
    duration: f32,
}

impl IntroAnimation {
    /// Blend factor per second when turning towards the travel direction.
    const TURN_RATE: f32 = 5.0;

    pub fn new(start: Vec3, end: Vec3, duration: f32) -> Self {
        Self { start, end, elapsed: 0.0, duration }
    }

    pub fn start(&self) -> Vec3 { self.start }
    pub fn end(&self) -> Vec3 { self.end }
    pub fn elapsed(&self) -> f32 { self.elapsed }

    /// Advances the approach, returns `true` once the duration is used up.
    pub fn step(&mut self, dt: f32, airframe: &mut Airframe) -> bool {
        self.elapsed += dt;
        let t = if self.duration > 0.0 { (self.elapsed / self.duration).min(1.0) } else { 1.0 };
        airframe.set_position(self.start.lerp(self.end, t));
        if let Some(target) = look_rotation(self.end - airframe.position()) {
            let blend = (dt * Self::TURN_RATE).clamp(0.0, 1.0);
            airframe.set_rotation(airframe.rotation().slerp(target, blend));
        }
        self.elapsed >= self.duration
    }
}

/// State carried through the flying phase.
#[derive(Clone)]
pub struct FlyingState {
    level: Option<usize>,
    path: Option<Arc<dyn PathFunction>>,
    control: ControlMode,
}

impl Default for FlyingState {
    fn default() -> Self { Self { level: None, path: None, control: ControlMode::FreeFall } }
}

impl FlyingState {
    pub fn level(&self) -> Option<usize> { self.level }
    pub fn path(&self) -> Option<&Arc<dyn PathFunction>> { self.path.as_ref() }
    pub fn control(&self) -> ControlMode { self.control }

    pub(super) fn enter_level(&mut self, level: usize, path: Option<Arc<dyn PathFunction>>) {
        self.level = Some(level);
        self.path = path;
    }

    pub(super) fn set_control(&mut self, control: ControlMode) { self.control = control; }
}

/// The glider's state machine.
#[derive(Clone)]
pub enum FlightMode {
    Intro(IntroAnimation),
    WaitingForStartPitch { start_note: f32 },
    Flying(FlyingState),
    Ended,
}

impl FlightMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            FlightMode::Intro(_) => ModeKind::Intro,
            FlightMode::WaitingForStartPitch { .. } => ModeKind::WaitingForStartPitch,
            FlightMode::Flying(_) => ModeKind::Flying,
            FlightMode::Ended => ModeKind::Ended,
        }
    }
}
